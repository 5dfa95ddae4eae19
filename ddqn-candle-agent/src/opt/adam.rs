//! Adam optimizer with per-parameter step counters.
use candle_core::{backprop::GradStore, Result, Var};
use candle_nn::Optimizer;
use serde::{Deserialize, Serialize};

/// Parameters of [`Adam`].
#[derive(Clone, Debug, PartialEq)]
pub struct ParamsAdam {
    /// Learning rate.
    pub lr: f64,

    /// Decay rate of the first moment.
    pub beta1: f64,

    /// Decay rate of the second moment.
    pub beta2: f64,

    /// Term added to the denominator.
    pub eps: f64,
}

impl Default for ParamsAdam {
    fn default() -> Self {
        Self {
            lr: 1e-4,
            beta1: 0.9,
            beta2: 0.999,
            eps: 1e-8,
        }
    }
}

/// Rewinds step counters that reached `threshold` to `reset_to`.
///
/// The bias corrections of Adam are computed from the step counter, so the
/// clamp keeps `beta2^step` away from underflow in long runs.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq)]
pub struct StepClamp {
    /// Counters at or above this value are rewound.
    pub threshold: usize,

    /// Value the counters are rewound to.
    pub reset_to: usize,
}

impl Default for StepClamp {
    fn default() -> Self {
        Self {
            threshold: 1024,
            reset_to: 1000,
        }
    }
}

struct VarAdam {
    var: Var,
    first_moment: Var,
    second_moment: Var,
    step: usize,
}

/// Adam optimizer.
///
/// Unlike [`candle_nn::AdamW`], every parameter carries its own step counter,
/// which is advanced only when the parameter receives a gradient and can be
/// inspected with [`Adam::steps`] and rewound with [`Adam::clamp_steps`].
pub struct Adam {
    vars: Vec<VarAdam>,
    params: ParamsAdam,
}

impl Adam {
    /// Step counters of the parameters, in the order given to [`Adam::new`].
    pub fn steps(&self) -> Vec<usize> {
        self.vars.iter().map(|v| v.step).collect()
    }

    /// Rewinds the step counters as described in [`StepClamp`].
    pub fn clamp_steps(&mut self, clamp: &StepClamp) {
        for var in self.vars.iter_mut() {
            if var.step >= clamp.threshold {
                var.step = clamp.reset_to;
            }
        }
    }
}

impl Optimizer for Adam {
    type Config = ParamsAdam;

    fn new(vars: Vec<Var>, params: ParamsAdam) -> Result<Self> {
        let vars = vars
            .into_iter()
            .filter(|var| var.dtype().is_float())
            .map(|var| {
                let dtype = var.dtype();
                let shape = var.shape();
                let device = var.device();
                let first_moment = Var::zeros(shape, dtype, device)?;
                let second_moment = Var::zeros(shape, dtype, device)?;
                Ok(VarAdam {
                    var,
                    first_moment,
                    second_moment,
                    step: 0,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { vars, params })
    }

    fn step(&mut self, grads: &GradStore) -> Result<()> {
        let lr = self.params.lr;
        let beta1 = self.params.beta1;
        let beta2 = self.params.beta2;
        let eps = self.params.eps;

        for var in self.vars.iter_mut() {
            let theta = &var.var;
            let Some(g) = grads.get(theta) else {
                continue;
            };
            var.step += 1;
            let scale_m = 1f64 / (1f64 - beta1.powi(var.step as i32));
            let scale_v = 1f64 / (1f64 - beta2.powi(var.step as i32));

            let m = &var.first_moment;
            let v = &var.second_moment;
            let next_m = ((m.as_tensor() * beta1)? + (g * (1.0 - beta1))?)?;
            let next_v = ((v.as_tensor() * beta2)? + (g.sqr()? * (1.0 - beta2))?)?;
            let m_hat = (&next_m * scale_m)?;
            let v_hat = (&next_v * scale_v)?;
            let adjusted_grad = (m_hat / (v_hat.sqrt()? + eps)?)?;
            let next_theta = (theta.as_tensor() - (adjusted_grad * lr)?)?;
            m.set(&next_m)?;
            v.set(&next_v)?;
            theta.set(&next_theta)?;
        }
        Ok(())
    }

    fn learning_rate(&self) -> f64 {
        self.params.lr
    }

    fn set_learning_rate(&mut self, lr: f64) {
        self.params.lr = lr;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use candle_core::{DType, Device, Tensor};

    fn quadratic_loss(x: &Var) -> Result<Tensor> {
        x.as_tensor().sqr()?.sum_all()
    }

    #[test]
    fn test_adam_decreases_loss() -> Result<()> {
        let x = Var::from_slice(&[1.0f32, -2.0, 3.0], (3,), &Device::Cpu)?;
        let params = ParamsAdam {
            lr: 0.1,
            ..ParamsAdam::default()
        };
        let mut opt = Adam::new(vec![x.clone()], params)?;

        let loss0 = quadratic_loss(&x)?.to_scalar::<f32>()?;
        for _ in 0..50 {
            opt.backward_step(&quadratic_loss(&x)?)?;
        }
        let loss1 = quadratic_loss(&x)?.to_scalar::<f32>()?;
        assert!(loss1 < loss0);
        assert_eq!(opt.steps(), vec![50]);
        Ok(())
    }

    #[test]
    fn test_step_counters_only_advance_with_gradients() -> Result<()> {
        let x = Var::zeros((2,), DType::F32, &Device::Cpu)?;
        let y = Var::zeros((2,), DType::F32, &Device::Cpu)?;
        let mut opt = Adam::new(vec![x.clone(), y.clone()], ParamsAdam::default())?;

        for _ in 0..3 {
            opt.backward_step(&quadratic_loss(&x)?)?;
        }
        assert_eq!(opt.steps(), vec![3, 0]);
        Ok(())
    }

    #[test]
    fn test_clamp_steps() -> Result<()> {
        let x = Var::from_slice(&[0.5f32, 0.5], (2,), &Device::Cpu)?;
        let mut opt = Adam::new(vec![x.clone()], ParamsAdam::default())?;
        let clamp = StepClamp::default();

        for _ in 0..1100 {
            let grads = quadratic_loss(&x)?.backward()?;
            opt.clamp_steps(&clamp);
            opt.step(&grads)?;
            assert!(opt.steps()[0] <= clamp.threshold);
        }

        // Rewound at steps 1025, 1049, 1073 and 1097.
        assert_eq!(opt.steps(), vec![1004]);
        Ok(())
    }
}
