//! Optimizers.
mod adam;
pub use adam::{Adam, ParamsAdam, StepClamp};
use anyhow::Result;
use candle_core::{backprop::GradStore, Tensor, Var};
use candle_nn::{AdamW, Optimizer as _, ParamsAdamW};
use log::trace;
use serde::{Deserialize, Serialize};

/// Configuration of optimizer for training neural networks in an RL agent.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub enum OptimizerConfig {
    /// Adam optimizer with per-parameter step counters.
    Adam {
        /// Learning rate.
        lr: f64,
        #[serde(default = "default_beta1")]
        /// Decay rate of the first moment.
        beta1: f64,
        #[serde(default = "default_beta2")]
        /// Decay rate of the second moment.
        beta2: f64,
        #[serde(default = "default_eps")]
        /// Term added to the denominator.
        eps: f64,
        #[serde(default)]
        /// Clamp applied to the step counters before every step.
        step_clamp: Option<StepClamp>,
    },

    /// AdamW optimizer of candle.
    ///
    /// It keeps a single step counter, which is not clamped.
    AdamW {
        /// Learning rate.
        lr: f64,
        #[serde(default = "default_beta1")]
        /// Decay rate of the first moment.
        beta1: f64,
        #[serde(default = "default_beta2")]
        /// Decay rate of the second moment.
        beta2: f64,
        #[serde(default = "default_eps")]
        /// Term added to the denominator.
        eps: f64,
        #[serde(default = "default_weight_decay")]
        /// Weight decay.
        weight_decay: f64,
    },
}

fn default_beta1() -> f64 {
    ParamsAdam::default().beta1
}

fn default_beta2() -> f64 {
    ParamsAdam::default().beta2
}

fn default_eps() -> f64 {
    ParamsAdam::default().eps
}

fn default_weight_decay() -> f64 {
    ParamsAdamW::default().weight_decay
}

impl OptimizerConfig {
    /// Constructs an optimizer over `vars`.
    pub fn build(&self, vars: Vec<Var>) -> Result<Optimizer> {
        match &self {
            OptimizerConfig::Adam {
                lr,
                beta1,
                beta2,
                eps,
                step_clamp,
            } => {
                let params = ParamsAdam {
                    lr: *lr,
                    beta1: *beta1,
                    beta2: *beta2,
                    eps: *eps,
                };
                let opt = Adam::new(vars, params)?;
                Ok(Optimizer::Adam(opt, *step_clamp))
            }
            OptimizerConfig::AdamW {
                lr,
                beta1,
                beta2,
                eps,
                weight_decay,
            } => {
                let params = ParamsAdamW {
                    lr: *lr,
                    beta1: *beta1,
                    beta2: *beta2,
                    eps: *eps,
                    weight_decay: *weight_decay,
                };
                let opt = AdamW::new(vars, params)?;
                Ok(Optimizer::AdamW(opt))
            }
        }
    }

    /// Override learning rate.
    pub fn learning_rate(self, lr: f64) -> Self {
        match self {
            Self::Adam {
                lr: _,
                beta1,
                beta2,
                eps,
                step_clamp,
            } => Self::Adam {
                lr,
                beta1,
                beta2,
                eps,
                step_clamp,
            },
            Self::AdamW {
                lr: _,
                beta1,
                beta2,
                eps,
                weight_decay,
            } => Self::AdamW {
                lr,
                beta1,
                beta2,
                eps,
                weight_decay,
            },
        }
    }
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        let params = ParamsAdam::default();
        Self::Adam {
            lr: params.lr,
            beta1: params.beta1,
            beta2: params.beta2,
            eps: params.eps,
            step_clamp: Some(StepClamp::default()),
        }
    }
}

/// Optimizers.
pub enum Optimizer {
    /// Adam optimizer and the clamp of its step counters.
    Adam(Adam, Option<StepClamp>),

    /// AdamW optimizer.
    AdamW(AdamW),
}

impl Optimizer {
    /// Computes the gradients of `loss` and applies an optimization step.
    ///
    /// For [`Optimizer::Adam`] the step counters are clamped between the
    /// backward pass and the step.
    pub fn backward_step(&mut self, loss: &Tensor) -> Result<()> {
        let grads = loss.backward()?;
        if let Self::Adam(opt, Some(clamp)) = self {
            opt.clamp_steps(clamp);
            trace!("Adam steps after clamp: {:?}", opt.steps());
        }
        self.step(&grads)
    }

    /// Applies an optimization step with precomputed gradients.
    pub fn step(&mut self, grads: &GradStore) -> Result<()> {
        match self {
            Self::Adam(opt, _) => Ok(opt.step(grads)?),
            Self::AdamW(opt) => Ok(opt.step(grads)?),
        }
    }

    /// Step counters of the parameters, `None` for optimizers without
    /// per-parameter counters.
    pub fn steps(&self) -> Option<Vec<usize>> {
        match self {
            Self::Adam(opt, _) => Some(opt.steps()),
            Self::AdamW(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempdir::TempDir;

    #[test]
    fn test_serde_optimizer_config() -> Result<()> {
        let config = OptimizerConfig::default().learning_rate(3e-4);

        let dir = TempDir::new("optimizer_config")?;
        let path = dir.path().join("opt.yaml");
        std::fs::write(&path, serde_yaml::to_string(&config)?)?;
        let config_: OptimizerConfig = serde_yaml::from_str(&std::fs::read_to_string(&path)?)?;
        assert_eq!(config, config_);
        Ok(())
    }

    #[test]
    fn test_adam_defaults_from_yaml() -> Result<()> {
        let config: OptimizerConfig = serde_yaml::from_str("Adam:\n  lr: 0.0001\n")?;
        match config {
            OptimizerConfig::Adam {
                lr,
                beta1,
                beta2,
                step_clamp,
                ..
            } => {
                assert_eq!(lr, 1e-4);
                assert_eq!(beta1, 0.9);
                assert_eq!(beta2, 0.999);
                assert_eq!(step_clamp, None);
            }
            _ => panic!("expected Adam"),
        }
        Ok(())
    }
}
