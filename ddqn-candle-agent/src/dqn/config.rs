//! Configuration of DQN agent.
use super::DqnModelConfig;
use crate::{
    model::SubModel1,
    opt::OptimizerConfig,
    util::{CriticLoss, InShape, OutDim},
    Device,
};
use anyhow::Result;
use candle_core::Tensor;
use log::info;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::{
    default::Default,
    fs::File,
    io::{BufReader, Write},
    marker::PhantomData,
    path::Path,
};

/// Constructs [`Dqn`](super::Dqn).
#[derive(Deserialize, Serialize)]
pub struct DqnConfig<Q>
where
    Q: SubModel1<Output = Tensor>,
    Q::Config: DeserializeOwned + Serialize + OutDim + InShape + std::fmt::Debug + PartialEq + Clone,
{
    pub(super) model_config: DqnModelConfig<Q::Config>,
    pub(super) batch_size: usize,
    pub(super) discount_factor: f64,
    #[serde(default)]
    pub(super) critic_loss: CriticLoss,
    #[serde(default)]
    pub(super) train: bool,
    pub(super) seed: u64,
    pub device: Option<Device>,
    #[serde(skip)]
    phantom: PhantomData<Q>,
}

impl<Q> Clone for DqnConfig<Q>
where
    Q: SubModel1<Output = Tensor>,
    Q::Config: DeserializeOwned + Serialize + OutDim + InShape + std::fmt::Debug + PartialEq + Clone,
{
    fn clone(&self) -> Self {
        Self {
            model_config: self.model_config.clone(),
            batch_size: self.batch_size,
            discount_factor: self.discount_factor,
            critic_loss: self.critic_loss.clone(),
            train: self.train,
            seed: self.seed,
            device: self.device,
            phantom: PhantomData,
        }
    }
}

impl<Q> PartialEq for DqnConfig<Q>
where
    Q: SubModel1<Output = Tensor>,
    Q::Config: DeserializeOwned + Serialize + OutDim + InShape + std::fmt::Debug + PartialEq + Clone,
{
    fn eq(&self, other: &Self) -> bool {
        self.model_config == other.model_config
            && self.batch_size == other.batch_size
            && self.discount_factor == other.discount_factor
            && self.critic_loss == other.critic_loss
            && self.train == other.train
            && self.seed == other.seed
            && self.device == other.device
    }
}

impl<Q> std::fmt::Debug for DqnConfig<Q>
where
    Q: SubModel1<Output = Tensor>,
    Q::Config: DeserializeOwned + Serialize + OutDim + InShape + std::fmt::Debug + PartialEq + Clone,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DqnConfig")
            .field("model_config", &self.model_config)
            .field("batch_size", &self.batch_size)
            .field("discount_factor", &self.discount_factor)
            .field("critic_loss", &self.critic_loss)
            .field("train", &self.train)
            .field("seed", &self.seed)
            .field("device", &self.device)
            .finish()
    }
}

impl<Q> Default for DqnConfig<Q>
where
    Q: SubModel1<Output = Tensor>,
    Q::Config: DeserializeOwned + Serialize + OutDim + InShape + std::fmt::Debug + PartialEq + Clone,
{
    /// Constructs DQN builder with default parameters.
    fn default() -> Self {
        Self {
            model_config: Default::default(),
            batch_size: 32,
            discount_factor: 0.99,
            critic_loss: CriticLoss::Mse,
            train: false,
            seed: 42,
            device: None,
            phantom: PhantomData,
        }
    }
}

impl<Q> DqnConfig<Q>
where
    Q: SubModel1<Output = Tensor>,
    Q::Config: DeserializeOwned + Serialize + OutDim + InShape + std::fmt::Debug + PartialEq + Clone,
{
    /// Batch size.
    pub fn batch_size(mut self, v: usize) -> Self {
        self.batch_size = v;
        self
    }

    /// Discount factor.
    pub fn discount_factor(mut self, v: f64) -> Self {
        self.discount_factor = v;
        self
    }

    /// Sets the configuration of the model.
    pub fn model_config(mut self, model_config: DqnModelConfig<Q::Config>) -> Self {
        self.model_config = model_config;
        self
    }

    /// Sets the configuration of the action-value function.
    pub fn q_config(mut self, q_config: Q::Config) -> Self {
        self.model_config = self.model_config.q_config(q_config);
        self
    }

    /// Sets the optimizer of the online network.
    pub fn opt_config(mut self, opt_config: OptimizerConfig) -> Self {
        self.model_config = self.model_config.opt_config(opt_config);
        self
    }

    /// Sets the output dimention of the dqn model of the DQN agent.
    pub fn out_dim(mut self, out_dim: i64) -> Self {
        self.model_config = self.model_config.out_dim(out_dim);
        self
    }

    /// Critic loss.
    pub fn critic_loss(mut self, v: CriticLoss) -> Self {
        self.critic_loss = v;
        self
    }

    /// Whether the agent starts in training mode.
    pub fn train(mut self, v: bool) -> Self {
        self.train = v;
        self
    }

    /// Random seed of exploration.
    pub fn seed(mut self, v: u64) -> Self {
        self.seed = v;
        self
    }

    /// Device.
    pub fn device(mut self, device: Device) -> Self {
        self.device = Some(device);
        self
    }

    /// Loads [`DqnConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path_ = path.as_ref().to_owned();
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        info!("Load config of DQN agent from {}", path_.display());
        Ok(b)
    }

    /// Saves [`DqnConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path_ = path.as_ref().to_owned();
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        info!("Save config of DQN agent into {}", path_.display());
        Ok(())
    }
}
