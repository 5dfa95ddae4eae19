//! Double DQN agent.
mod base;
mod config;
mod explorer;
mod model;
pub use base::{double_q_target, Dqn};
pub use config::DqnConfig;
pub use explorer::{argmax_first, EpsilonGreedy};
pub use model::{DqnModel, DqnModelConfig};
