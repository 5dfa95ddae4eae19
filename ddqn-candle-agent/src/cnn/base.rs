use super::CnnConfig;
use crate::model::SubModel1;
use anyhow::{bail, Result};
use candle_core::{DType::F32, Device, Tensor};
use candle_nn::{
    conv::Conv2dConfig,
    conv2d, linear,
    sequential::{seq, Sequential},
    Module, VarBuilder,
};
use log::debug;

/// (out channels, kernel size, stride) of the convolutional layers.
const CONV_LAYERS: [(usize, usize, usize); 3] = [(32, 8, 4), (64, 4, 2), (64, 3, 1)];

#[allow(clippy::upper_case_acronyms)]
/// Convolutional neural network, which has the same architecture of the DQN paper.
///
/// The input is a batch of shape `(N, C, H, W)` of any dtype. It is cast to
/// `f32` and multiplied by `input_scale` before the first convolution.
pub struct Cnn {
    device: Device,
    features: Sequential,
    head: Sequential,
    n_features: usize,
}

impl Cnn {
    fn stride(s: usize) -> Conv2dConfig {
        Conv2dConfig {
            stride: s,
            ..Default::default()
        }
    }

    fn check_in_shape(in_shape: &[usize]) -> Result<()> {
        if in_shape.len() != 3 {
            bail!("input shape must be [channels, height, width], got {:?}", in_shape);
        }
        let (mut h, mut w) = (in_shape[1], in_shape[2]);
        for (_, k, s) in CONV_LAYERS {
            if h < k || w < k {
                bail!("input shape {:?} is too small for the convolutions", in_shape);
            }
            h = (h - k) / s + 1;
            w = (w - k) / s + 1;
        }
        Ok(())
    }

    fn create_features(vb: &VarBuilder, n_channels: usize, input_scale: f64) -> Result<Sequential> {
        let [(c1, k1, s1), (c2, k2, s2), (c3, k3, s3)] = CONV_LAYERS;
        let seq = seq()
            .add_fn(move |xs| xs.to_dtype(F32)? * input_scale)
            .add(conv2d(n_channels, c1, k1, Self::stride(s1), vb.pp("c1"))?)
            .add_fn(|xs| xs.relu())
            .add(conv2d(c1, c2, k2, Self::stride(s2), vb.pp("c2"))?)
            .add_fn(|xs| xs.relu())
            .add(conv2d(c2, c3, k3, Self::stride(s3), vb.pp("c3"))?)
            .add_fn(|xs| xs.relu()?.flatten_from(1));

        Ok(seq)
    }

    fn create_head(vb: &VarBuilder, n_features: usize, out_dim: usize) -> Result<Sequential> {
        let seq = seq()
            .add(linear(n_features, 512, vb.pp("l1"))?)
            .add_fn(|xs| xs.relu())
            .add(linear(512, out_dim, vb.pp("l2"))?);

        Ok(seq)
    }

    /// Length of the flattened output of the convolutional layers.
    pub fn n_features(&self) -> usize {
        self.n_features
    }
}

impl SubModel1 for Cnn {
    type Config = CnnConfig;
    type Input = Tensor;
    type Output = Tensor;

    fn forward(&self, x: &Self::Input) -> Result<Tensor> {
        let xs = self.features.forward(&x.to_device(&self.device)?)?;
        Ok(self.head.forward(&xs)?)
    }

    fn build(vb: VarBuilder, config: Self::Config) -> Result<Self> {
        Self::check_in_shape(&config.in_shape)?;
        let device = vb.device().clone();
        let features = Self::create_features(&vb, config.in_shape[0], config.input_scale)?;

        // Dummy forward pass to get the size of the features
        let n_features = {
            let mut shape = vec![1];
            shape.extend_from_slice(&config.in_shape);
            let xs = Tensor::zeros(shape, F32, &device)?;
            features.forward(&xs)?.dims()[1]
        };
        debug!(
            "Cnn with input shape {:?} has {} features",
            config.in_shape, n_features
        );

        let head = Self::create_head(&vb, n_features, config.out_dim as usize)?;

        Ok(Self {
            device,
            features,
            head,
            n_features,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use candle_core::DType;
    use candle_nn::VarMap;

    fn build(in_shape: Vec<usize>, out_dim: i64) -> Result<(Cnn, VarMap)> {
        let varmap = VarMap::new();
        let vb = VarBuilder::from_varmap(&varmap, DType::F32, &Device::Cpu);
        let cnn = Cnn::build(vb, CnnConfig::new(in_shape, out_dim))?;
        Ok((cnn, varmap))
    }

    #[test]
    fn test_atari_input() -> Result<()> {
        let (cnn, varmap) = build(vec![4, 84, 84], 6)?;
        assert_eq!(cnn.n_features(), 3136);

        let mut names = varmap.data().lock().unwrap().keys().cloned().collect::<Vec<_>>();
        names.sort();
        assert_eq!(
            names,
            vec![
                "c1.bias", "c1.weight", "c2.bias", "c2.weight", "c3.bias", "c3.weight", "l1.bias",
                "l1.weight", "l2.bias", "l2.weight"
            ]
        );

        let xs = Tensor::zeros((2, 4, 84, 84), DType::U8, &Device::Cpu)?;
        assert_eq!(cnn.forward(&xs)?.dims(), &[2, 6]);
        Ok(())
    }

    #[test]
    fn test_small_input() -> Result<()> {
        let (cnn, _varmap) = build(vec![2, 36, 36], 3)?;
        assert_eq!(cnn.n_features(), 64);

        let xs = Tensor::ones((3, 2, 36, 36), DType::F32, &Device::Cpu)?;
        assert_eq!(cnn.forward(&xs)?.dims(), &[3, 3]);
        Ok(())
    }

    #[test]
    fn test_too_small_input() {
        assert!(build(vec![4, 30, 30], 3).is_err());
        assert!(build(vec![84, 84], 3).is_err());
    }
}
