use crate::catch::{CatchAct, CatchEnvConfig};
use anyhow::Result;
use ddqn_candle_agent::{
    cnn::{Cnn, CnnConfig},
    dqn::DqnConfig,
    opt::OptimizerConfig,
    Device,
};
use ddqn_core::{replay_buffer::SimpleReplayBufferConfig, EpsilonSchedule, TrainerConfig};
use log::info;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Configuration of training on the catch game.
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct DdqnCatchConfig {
    pub env_config: CatchEnvConfig,
    pub env_seed: i64,
    pub agent_config: DqnConfig<Cnn>,
    pub replay_buffer_config: SimpleReplayBufferConfig,
    pub trainer_config: TrainerConfig,
}

impl Default for DdqnCatchConfig {
    fn default() -> Self {
        Self::new(CatchEnvConfig::default(), Device::Cpu)
    }
}

impl DdqnCatchConfig {
    /// Creates a configuration whose network matches `env_config`.
    pub fn new(env_config: CatchEnvConfig, device: Device) -> Self {
        let cnn_config = CnnConfig::new(env_config.observation_shape(), CatchAct::N as _)
            .input_scale(1.0 / 255.0);
        let agent_config = DqnConfig::default()
            .q_config(cnn_config)
            .opt_config(OptimizerConfig::default())
            .batch_size(32)
            .discount_factor(0.99)
            .device(device);
        let trainer_config = TrainerConfig::default()
            .max_frames(50_000)
            .warmup_period(1000)
            .target_update_interval(1000)
            .log_interval(1000)
            .flush_record_interval(1000)
            .epsilon(EpsilonSchedule::default().eps_decay(5000.0));
        Self {
            env_config,
            env_seed: 0,
            agent_config,
            replay_buffer_config: SimpleReplayBufferConfig::default().capacity(10_000),
            trainer_config,
        }
    }

    /// Constructs [`DdqnCatchConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path_ = path.as_ref().to_owned();
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b: Self = serde_yaml::from_reader(rdr)?;
        b.trainer_config.check()?;
        info!("Load config from {}", path_.display());
        Ok(b)
    }

    /// Saves [`DdqnCatchConfig`] as a YAML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path_ = path.as_ref().to_owned();
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        info!("Save config into {}", path_.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempdir::TempDir;

    #[test]
    fn test_serde_catch_config() -> Result<()> {
        let config = DdqnCatchConfig::default();
        let dir = TempDir::new("catch_config")?;
        let path = dir.path().join("config.yaml");
        config.save(&path)?;
        let config_ = DdqnCatchConfig::load(&path)?;
        assert_eq!(config, config_);
        Ok(())
    }
}
