#![warn(missing_docs)]
//! Core of a Double DQN trainer.
//!
//! This crate knows nothing about neural networks. It defines the interfaces
//! between an environment ([`Env`]), a trainable policy ([`Agent`]) and an
//! experience replay buffer ([`ReplayBufferBase`]), and provides
//!
//! * [`replay_buffer::SimpleReplayBuffer`], a fixed-capacity ring of transitions
//!   sampled uniformly without replacement,
//! * [`EpsilonSchedule`], the exponential exploration schedule,
//! * [`Trainer`], the online training loop,
//! * [`record`], key-value records used to log training curves.
pub mod error;
pub mod record;
pub mod replay_buffer;

mod base;
pub use base::{
    Act, Agent, Env, ExperienceBufferBase, Info, Obs, Policy, ReplayBufferBase, Step,
};

mod epsilon;
pub use epsilon::EpsilonSchedule;

mod trainer;
pub use trainer::{TrainHistory, Trainer, TrainerConfig, TrainerState};

#[cfg(test)]
mod dummy;
