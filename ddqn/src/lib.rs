//! Double DQN on pixel observations.
//!
//! The workspace consists of the following crates:
//!
//! * `ddqn-core` provides the interfaces between environments, agents and
//!   replay buffers, the replay buffer itself, the exploration schedule and
//!   the training loop.
//! * `ddqn-candle-agent` implements the convolutional action-value network
//!   and the double DQN agent with [candle](https://crates.io/crates/candle-core).
//! * `ddqn-tensorboard` has `TensorboardRecorder` to write training curves
//!   which can be shown in TensorBoard.
//! * `ddqn` (this crate) has a small pixel game, [`catch::CatchEnv`], and the
//!   `ddqn` binary which trains an agent on it.
pub mod catch;
mod config;
pub use config::DdqnCatchConfig;

use anyhow::Result;
use catch::{CatchAct, CatchEnv, CatchObs};
use ddqn_candle_agent::{cnn::Cnn, dqn::Dqn};
use ddqn_core::{
    record::AggregateRecorder,
    replay_buffer::SimpleReplayBuffer,
    Env as _, ReplayBufferBase as _, TrainHistory, Trainer,
};
use log::info;

/// Replay buffer of the catch game.
pub type ReplayBuffer = SimpleReplayBuffer<CatchObs, CatchAct>;

/// Double DQN agent for the catch game.
pub type CatchDqn = Dqn<CatchEnv, Cnn, ReplayBuffer>;

/// Trains a double DQN agent on the catch game.
pub fn train(
    config: &DdqnCatchConfig,
    recorder: &mut dyn AggregateRecorder,
) -> Result<TrainHistory> {
    let mut env = CatchEnv::build(&config.env_config, config.env_seed)?;
    let mut agent = CatchDqn::build(config.agent_config.clone())?;
    let mut buffer = ReplayBuffer::build(&config.replay_buffer_config);
    let mut trainer = Trainer::build(config.trainer_config.clone());

    let history = trainer.train(&mut env, &mut agent, &mut buffer, recorder)?;

    let n = history.episode_rewards.len().min(100);
    if n > 0 {
        let recent = &history.episode_rewards[history.episode_rewards.len() - n..];
        info!(
            "Mean reward of the last {} episodes: {:.3}",
            n,
            recent.iter().sum::<f32>() / n as f32
        );
    }

    Ok(history)
}
