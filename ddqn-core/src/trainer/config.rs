//! Configuration of [`Trainer`](super::Trainer).
use crate::EpsilonSchedule;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Configuration of [`Trainer`](super::Trainer).
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct TrainerConfig {
    /// The number of environment frames to train for.
    pub max_frames: usize,

    /// The buffer must hold more than this many transitions before
    /// optimization starts.
    pub warmup_period: usize,

    /// Interval of target network synchronization in frames.
    pub target_update_interval: usize,

    /// Interval of progress logging in frames.
    pub log_interval: usize,

    /// Interval of flushing records in frames.
    pub flush_record_interval: usize,

    /// Exploration schedule.
    pub epsilon: EpsilonSchedule,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            max_frames: 1_000_000,
            warmup_period: 10_000,
            target_update_interval: 1000,
            log_interval: 1000,
            flush_record_interval: 1000,
            epsilon: EpsilonSchedule::default(),
        }
    }
}

impl TrainerConfig {
    /// Sets the number of frames.
    pub fn max_frames(mut self, v: usize) -> Self {
        self.max_frames = v;
        self
    }

    /// Sets warmup period in frames.
    pub fn warmup_period(mut self, v: usize) -> Self {
        self.warmup_period = v;
        self
    }

    /// Sets the interval of target network synchronization in frames.
    pub fn target_update_interval(mut self, v: usize) -> Self {
        self.target_update_interval = v;
        self
    }

    /// Sets the interval of progress logging in frames.
    pub fn log_interval(mut self, v: usize) -> Self {
        self.log_interval = v;
        self
    }

    /// Sets the interval of flushing records in frames.
    pub fn flush_record_interval(mut self, v: usize) -> Self {
        self.flush_record_interval = v;
        self
    }

    /// Sets the exploration schedule.
    pub fn epsilon(mut self, v: EpsilonSchedule) -> Self {
        self.epsilon = v;
        self
    }

    /// Fails if a value cannot drive a training run.
    pub fn check(&self) -> Result<()> {
        self.epsilon.check()?;
        Ok(())
    }

    /// Constructs [`TrainerConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b: Self = serde_yaml::from_reader(rdr)?;
        b.check()?;
        Ok(b)
    }

    /// Saves [`TrainerConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}
