//! Utilities.
use anyhow::{anyhow, Result};
use candle_core::{DType, Tensor};
use candle_nn::VarMap;
use ddqn_core::error::DdqnError;
use log::trace;
use serde::{Deserialize, Serialize};

/// Critic loss type.
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone, Default)]
pub enum CriticLoss {
    /// Mean squared error.
    #[default]
    Mse,

    /// Smooth L1 loss.
    SmoothL1,
}

/// Overwrites every variable of `dest` with the variable of `src` of the
/// same name.
///
/// Data is copied, so the two maps never share storage. Fails with
/// [`DdqnError::ArchitectureMismatch`] if the names or shapes of the
/// variables differ; `dest` is left untouched in that case.
pub fn synchronize(dest: &VarMap, src: &VarMap) -> Result<()> {
    let dest = dest
        .data()
        .lock()
        .map_err(|_| anyhow!("lock of destination VarMap is poisoned"))?;
    let src = src
        .data()
        .lock()
        .map_err(|_| anyhow!("lock of source VarMap is poisoned"))?;

    for k in src.keys() {
        if !dest.contains_key(k) {
            return Err(DdqnError::ArchitectureMismatch(format!(
                "parameter {} is missing in the destination",
                k
            ))
            .into());
        }
    }

    for (k, v_dest) in dest.iter() {
        let v_src = src.get(k).ok_or_else(|| {
            DdqnError::ArchitectureMismatch(format!("parameter {} is missing in the source", k))
        })?;
        if v_src.shape() != v_dest.shape() {
            return Err(DdqnError::ArchitectureMismatch(format!(
                "parameter {} has shape {:?} in the source and {:?} in the destination",
                k,
                v_src.dims(),
                v_dest.dims()
            ))
            .into());
        }
    }

    for (k, v_dest) in dest.iter() {
        trace!("synchronize {}", k);
        if let Some(v_src) = src.get(k) {
            v_dest.set(v_src.as_tensor())?;
        }
    }

    Ok(())
}

/// Interface for handling output dimensions.
pub trait OutDim {
    /// Returns the output dimension.
    fn get_out_dim(&self) -> i64;

    /// Sets the  output dimension.
    fn set_out_dim(&mut self, v: i64);
}

/// Interface for handling input shapes.
pub trait InShape {
    /// Returns the shape of a single input, without the batch dimension.
    fn get_in_shape(&self) -> Vec<usize>;
}

/// See <https://pytorch.org/docs/stable/generated/torch.nn.SmoothL1Loss.html>.
pub fn smooth_l1_loss(x: &Tensor, y: &Tensor) -> Result<Tensor, candle_core::Error> {
    let device = x.device();
    let d = (x - y)?.abs()?;
    let m1 = d.lt(1.0)?.to_dtype(DType::F32)?.to_device(device)?;
    let m2 = Tensor::try_from(1f32)?
        .to_device(device)?
        .broadcast_sub(&m1)?;
    (((0.5 * m1)? * d.powf(2.0))? + m2 * (d - 0.5))?.mean_all()
}
