//! Experience replay.
//!
//! [`SimpleReplayBuffer`] keeps the most recent `capacity` transitions in a ring.
//! Batches are drawn uniformly at random without replacement and handed out
//! column-wise as a [`TransitionBatch`].
//!
//! ```rust
//! use ddqn_core::{
//!     replay_buffer::{SimpleReplayBuffer, SimpleReplayBufferConfig, Transition},
//!     ExperienceBufferBase, ReplayBufferBase,
//! };
//!
//! let config = SimpleReplayBufferConfig::default().capacity(3);
//! let mut buffer = SimpleReplayBuffer::<u8, i64>::build(&config);
//! for i in 0..5u8 {
//!     buffer.push(Transition::new(i, 0, 0.0, i + 1, false)).unwrap();
//! }
//! assert_eq!(buffer.len(), 3);
//! let batch = buffer.batch(2).unwrap();
//! assert_eq!(batch.len(), 2);
//! ```
mod base;
mod batch;
mod config;
pub use base::SimpleReplayBuffer;
pub use batch::{Transition, TransitionBatch};
pub use config::SimpleReplayBufferConfig;
