//! Core functionalities.
mod agent;
mod env;
mod policy;
mod replay_buffer;
mod step;
pub use agent::Agent;
pub use env::Env;
pub use policy::Policy;
pub use replay_buffer::{ExperienceBufferBase, ReplayBufferBase};
use std::fmt::Debug;
pub use step::{Info, Step};

/// An observation of an environment.
///
/// For pixel environments this is a stack of consecutive frames with shape
/// `[channels, height, width]`.
pub trait Obs: Clone + Debug {
    /// Returns the shape of the observation.
    fn shape(&self) -> &[usize];
}

/// An action of an environment.
pub trait Act: Clone + Debug {}
