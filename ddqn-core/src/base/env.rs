//! Environment.
use super::{Act, Info, Obs, Step};
use crate::record::Record;
use anyhow::Result;

/// Represents an environment, typically an MDP.
///
/// Frame preprocessing (grayscale conversion, resizing, frame stacking,
/// reward clipping) is the business of the implementor. Observations handed
/// out by [`Env::reset`] and [`Env::step`] are consumed as they are.
pub trait Env {
    /// Configurations.
    type Config: Clone;

    /// Observation of the environment.
    type Obs: Obs;

    /// Action of the environment.
    type Act: Act;

    /// Information in the [`Step`] object.
    type Info: Info;

    /// Builds an environment with a given random seed.
    fn build(config: &Self::Config, seed: i64) -> Result<Self>
    where
        Self: Sized;

    /// Performes an environment step.
    ///
    /// The returned [`Record`] carries environment-specific values to be logged.
    fn step(&mut self, a: &Self::Act) -> Result<(Step<Self>, Record)>
    where
        Self: Sized;

    /// Starts a new episode and returns its initial observation.
    fn reset(&mut self) -> Result<Self::Obs>;

    /// Shape of the observations, `[channels, height, width]` for pixel environments.
    fn observation_shape(&self) -> Vec<usize>;

    /// The number of discrete actions.
    fn num_actions(&self) -> usize;
}
