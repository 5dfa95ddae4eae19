//! Convolutional neural network for pixel observations.
//!
//! The architecture is the same in the DQN Nature paper. The size of the
//! features fed to the first linear layer is derived from the input shape,
//! so any input large enough for the kernels can be used.
mod base;
mod config;
pub use base::Cnn;
pub use config::CnnConfig;
