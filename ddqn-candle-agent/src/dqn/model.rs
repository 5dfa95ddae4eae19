use crate::{
    model::SubModel1,
    opt::{Optimizer, OptimizerConfig},
    util::{synchronize, OutDim},
};
use anyhow::{Context, Result};
use candle_core::{DType, Device, Tensor};
use candle_nn::{VarBuilder, VarMap};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
/// Configuration of [`DqnModel`].
pub struct DqnModelConfig<Q>
where
    Q: OutDim,
{
    pub(super) q_config: Option<Q>,
    pub(super) opt_config: OptimizerConfig,
}

impl<Q> Default for DqnModelConfig<Q>
where
    Q: OutDim,
{
    fn default() -> Self {
        Self {
            q_config: None,
            opt_config: OptimizerConfig::default(),
        }
    }
}

impl<Q> DqnModelConfig<Q>
where
    Q: DeserializeOwned + Serialize + OutDim,
{
    /// Sets configurations for action-value function.
    pub fn q_config(mut self, v: Q) -> Self {
        self.q_config = Some(v);
        self
    }

    /// Sets output dimension of the model.
    pub fn out_dim(mut self, v: i64) -> Self {
        match &mut self.q_config {
            None => {}
            Some(q_config) => q_config.set_out_dim(v),
        };
        self
    }

    /// Sets optimizer configuration.
    pub fn opt_config(mut self, v: OptimizerConfig) -> Self {
        self.opt_config = v;
        self
    }

    /// Configuration of the action-value function, if set.
    pub fn get_q_config(&self) -> Option<&Q> {
        self.q_config.as_ref()
    }

    /// Constructs [`DqnModelConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`DqnModelConfig`] to as a YAML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}

/// Action-value function with its parameters and optimizer.
pub struct DqnModel<Q>
where
    Q: SubModel1<Output = Tensor>,
    Q::Config: DeserializeOwned + Serialize + OutDim,
{
    varmap: VarMap,

    // Action-value function
    q: Q,

    // Optimizer
    opt: Optimizer,
}

impl<Q> DqnModel<Q>
where
    Q: SubModel1<Output = Tensor>,
    Q::Config: DeserializeOwned + Serialize + OutDim + Clone,
{
    /// Constructs [`DqnModel`] with freshly initialized parameters.
    pub fn build(config: DqnModelConfig<Q::Config>, device: Device) -> Result<Self> {
        let q_config = config.q_config.context("q_config is not set.")?;
        let varmap = VarMap::new();
        let q = {
            let vb = VarBuilder::from_varmap(&varmap, DType::F32, &device);
            Q::build(vb, q_config)?
        };
        let opt = config.opt_config.build(varmap.all_vars())?;

        Ok(Self {
            varmap,
            q,
            opt,
        })
    }

    /// Outputs the action-value given observation(s).
    pub fn forward(&self, obs: &Q::Input) -> Result<Tensor> {
        self.q.forward(obs)
    }

    /// Computes the gradients of `loss` and updates the parameters.
    pub fn backward_step(&mut self, loss: &Tensor) -> Result<()> {
        self.opt.backward_step(loss)
    }

    /// Overwrites the parameters of this model with those of `src`.
    pub fn synchronize_from(&self, src: &Self) -> Result<()> {
        synchronize(&self.varmap, &src.varmap)
    }

    pub fn get_varmap(&self) -> &VarMap {
        &self.varmap
    }

    pub fn get_opt(&self) -> &Optimizer {
        &self.opt
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cnn::{Cnn, CnnConfig};
    use tempdir::TempDir;

    fn config() -> DqnModelConfig<CnnConfig> {
        DqnModelConfig::default().q_config(CnnConfig::new(vec![2, 36, 36], 3))
    }

    fn params(model: &DqnModel<Cnn>) -> Result<Vec<(String, Vec<f32>)>> {
        let data = model.get_varmap().data().lock().unwrap();
        let mut params = data
            .iter()
            .map(|(k, v)| -> Result<(String, Vec<f32>)> {
                Ok((k.clone(), v.as_tensor().flatten_all()?.to_vec1::<f32>()?))
            })
            .collect::<Result<Vec<_>>>()?;
        params.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(params)
    }

    #[test]
    fn test_fresh_models_differ_then_match_after_sync() -> Result<()> {
        let online = DqnModel::<Cnn>::build(config(), Device::Cpu)?;
        let target = DqnModel::<Cnn>::build(config(), Device::Cpu)?;
        assert_ne!(params(&online)?, params(&target)?);

        let xs = Tensor::ones((1, 2, 36, 36), DType::F32, &Device::Cpu)?;
        assert_ne!(
            online.forward(&xs)?.to_vec2::<f32>()?,
            target.forward(&xs)?.to_vec2::<f32>()?
        );

        target.synchronize_from(&online)?;
        assert_eq!(params(&online)?, params(&target)?);
        assert_eq!(
            online.forward(&xs)?.to_vec2::<f32>()?,
            target.forward(&xs)?.to_vec2::<f32>()?
        );
        Ok(())
    }

    #[test]
    fn test_synchronize_architecture_mismatch() -> Result<()> {
        let online = DqnModel::<Cnn>::build(config(), Device::Cpu)?;
        let other = DqnModel::<Cnn>::build(config().out_dim(4), Device::Cpu)?;
        let err = other.synchronize_from(&online).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ddqn_core::error::DdqnError>(),
            Some(ddqn_core::error::DdqnError::ArchitectureMismatch(_))
        ));
        Ok(())
    }

    #[test]
    fn test_missing_q_config() {
        let config = DqnModelConfig::<CnnConfig>::default();
        assert!(DqnModel::<Cnn>::build(config, Device::Cpu).is_err());
    }

    #[test]
    fn test_serde_model_config() -> Result<()> {
        let config = config().opt_config(OptimizerConfig::default().learning_rate(1e-3));
        let dir = TempDir::new("dqn_model_config")?;
        let path = dir.path().join("model.yaml");
        config.save(&path)?;
        let config_ = DqnModelConfig::<CnnConfig>::load(&path)?;
        assert_eq!(config, config_);
        Ok(())
    }
}
