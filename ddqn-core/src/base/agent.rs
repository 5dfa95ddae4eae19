//! Agent.
use super::{Env, Policy, ReplayBufferBase};
use crate::record::Record;
use anyhow::Result;

/// Represents a trainable policy on an environment.
///
/// An agent owns an online network, updated by [`Agent::opt`], and a target
/// network, overwritten only by [`Agent::sync_target`].
pub trait Agent<E: Env, R: ReplayBufferBase>: Policy<E> {
    /// Set the policy to training mode.
    fn train(&mut self);

    /// Set the policy to evaluation mode.
    fn eval(&mut self);

    /// Return if it is in training mode.
    fn is_train(&self) -> bool;

    /// Performs an optimization step with a batch taken from `buffer`.
    ///
    /// The returned record holds the loss under the key `"loss"`.
    fn opt(&mut self, buffer: &mut R) -> Result<Record>;

    /// Copies the parameters of the online network into the target network.
    fn sync_target(&mut self) -> Result<()>;

    /// Number of transitions [`Agent::opt`] takes from the buffer.
    fn batch_size(&self) -> usize;

    /// Shape of the observations the agent was built for.
    fn input_shape(&self) -> Vec<usize>;
}
