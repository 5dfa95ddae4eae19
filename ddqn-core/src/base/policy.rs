//! Policy.
use super::Env;
use anyhow::Result;

/// A policy on an environment.
///
/// Policy is a mapping from an observation to an action.
pub trait Policy<E: Env> {
    /// Sample an action given an observation.
    ///
    /// `epsilon` is the exploration rate for the current frame, computed by the
    /// caller (see [`EpsilonSchedule`](crate::EpsilonSchedule)). A policy
    /// keeps no exploration counter of its own.
    fn sample(&mut self, obs: &E::Obs, epsilon: f64) -> Result<E::Act>;
}
