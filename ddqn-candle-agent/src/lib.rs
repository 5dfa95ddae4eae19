//! Double DQN agent implemented with [candle](https://crates.io/crates/candle-core).
//!
//! * [`cnn::Cnn`] is the convolutional action-value network.
//! * [`dqn::Dqn`] holds an online and a target copy of the network and
//!   implements [`ddqn_core::Agent`] with the double-Q update.
//! * [`opt`] provides the optimizers, including an Adam whose per-parameter
//!   step counters can be clamped.
pub mod cnn;
pub mod dqn;
pub mod model;
pub mod opt;
pub mod util;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Copy, Deserialize, Serialize, PartialEq, Default)]
/// Device for using candle.
///
/// This enum is added because [`candle_core::Device`] does not support serialization.
pub enum Device {
    /// The main CPU device.
    #[default]
    Cpu,

    /// The GPU device with the given ordinal.
    Cuda(usize),
}

impl TryFrom<Device> for candle_core::Device {
    type Error = candle_core::Error;

    fn try_from(device: Device) -> Result<Self, Self::Error> {
        match device {
            Device::Cpu => Ok(candle_core::Device::Cpu),
            Device::Cuda(n) => candle_core::Device::new_cuda(n),
        }
    }
}
