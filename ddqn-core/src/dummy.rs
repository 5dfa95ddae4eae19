//! Environment and agent used in tests.
use crate::{
    record::Record, replay_buffer::SimpleReplayBuffer, Act, Agent, Env, Obs, Policy,
    ReplayBufferBase, Step,
};
use anyhow::Result;

/// Observation carrying the index of the frame within its episode.
#[derive(Clone, Debug, PartialEq)]
pub struct DummyObs {
    pub t: usize,
    shape: Vec<usize>,
}

impl Obs for DummyObs {
    fn shape(&self) -> &[usize] {
        &self.shape
    }
}

impl Act for usize {}

#[derive(Clone, Debug)]
pub struct DummyEnvConfig {
    pub shape: Vec<usize>,
    pub episode_len: usize,

    /// Emits observations of a wrong shape from this step on.
    pub bad_shape_from: Option<usize>,
}

impl Default for DummyEnvConfig {
    fn default() -> Self {
        Self {
            shape: vec![2, 8, 8],
            episode_len: 10,
            bad_shape_from: None,
        }
    }
}

impl DummyEnvConfig {
    pub fn episode_len(mut self, v: usize) -> Self {
        self.episode_len = v;
        self
    }

    pub fn bad_shape_from(mut self, v: usize) -> Self {
        self.bad_shape_from = Some(v);
        self
    }
}

/// Gives reward 1 every step and ends an episode after `episode_len` steps.
pub struct DummyEnv {
    config: DummyEnvConfig,
    t: usize,
    n_steps: usize,
}

impl Env for DummyEnv {
    type Config = DummyEnvConfig;
    type Obs = DummyObs;
    type Act = usize;
    type Info = ();

    fn build(config: &Self::Config, _seed: i64) -> Result<Self> {
        Ok(Self {
            config: config.clone(),
            t: 0,
            n_steps: 0,
        })
    }

    fn step(&mut self, a: &Self::Act) -> Result<(Step<Self>, Record)> {
        self.t += 1;
        self.n_steps += 1;
        let shape = match self.config.bad_shape_from {
            Some(n) if self.n_steps >= n => vec![1, 1, 1],
            _ => self.config.shape.clone(),
        };
        let obs = DummyObs { t: self.t, shape };
        let is_done = self.t == self.config.episode_len;
        Ok((Step::new(obs, *a, 1.0, is_done, ()), Record::empty()))
    }

    fn reset(&mut self) -> Result<Self::Obs> {
        self.t = 0;
        Ok(DummyObs {
            t: 0,
            shape: self.config.shape.clone(),
        })
    }

    fn observation_shape(&self) -> Vec<usize> {
        self.config.shape.clone()
    }

    fn num_actions(&self) -> usize {
        3
    }
}

/// Counts the calls made by the trainer.
pub struct DummyAgent {
    shape: Vec<usize>,
    n_actions: usize,
    train: bool,
    pub n_opts: usize,
    pub n_syncs: usize,
    pub epsilons: Vec<f64>,
}

impl DummyAgent {
    pub fn new(shape: Vec<usize>, n_actions: usize) -> Self {
        Self {
            shape,
            n_actions,
            train: false,
            n_opts: 0,
            n_syncs: 0,
            epsilons: vec![],
        }
    }
}

impl Policy<DummyEnv> for DummyAgent {
    fn sample(&mut self, obs: &DummyObs, epsilon: f64) -> Result<usize> {
        self.epsilons.push(epsilon);
        Ok(obs.t % self.n_actions)
    }
}

pub type DummyBuffer = SimpleReplayBuffer<DummyObs, usize>;

impl Agent<DummyEnv, DummyBuffer> for DummyAgent {
    fn train(&mut self) {
        self.train = true;
    }

    fn eval(&mut self) {
        self.train = false;
    }

    fn is_train(&self) -> bool {
        self.train
    }

    fn opt(&mut self, buffer: &mut DummyBuffer) -> Result<Record> {
        let _ = buffer.batch(self.batch_size())?;
        self.n_opts += 1;
        Ok(Record::from_scalar("loss", 1.0 / self.n_opts as f32))
    }

    fn sync_target(&mut self) -> Result<()> {
        self.n_syncs += 1;
        Ok(())
    }

    fn batch_size(&self) -> usize {
        4
    }

    fn input_shape(&self) -> Vec<usize> {
        self.shape.clone()
    }
}
