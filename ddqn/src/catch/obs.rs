use anyhow::Result;
use candle_core::{Device, Tensor};
use ddqn_core::Obs;
use ndarray::{s, Array2, Array3};

/// Stacked frames, the oldest first.
#[derive(Debug, Clone, PartialEq)]
pub struct CatchObs {
    frames: Array3<u8>,
}

impl CatchObs {
    /// Stack filled with copies of `frame`.
    pub(super) fn new(n_stack: usize, frame: &Array2<u8>) -> Self {
        let (h, w) = frame.dim();
        let mut frames = Array3::zeros((n_stack, h, w));
        for i in 0..n_stack {
            frames.slice_mut(s![i, .., ..]).assign(frame);
        }
        Self { frames }
    }

    /// Drops the oldest frame and appends `frame`.
    pub(super) fn push(&mut self, frame: &Array2<u8>) {
        let n = self.frames.dim().0;
        let shifted = self.frames.slice(s![1.., .., ..]).to_owned();
        self.frames.slice_mut(s![..n - 1, .., ..]).assign(&shifted);
        self.frames.slice_mut(s![n - 1, .., ..]).assign(frame);
    }

    /// The stacked frames.
    pub fn frames(&self) -> &Array3<u8> {
        &self.frames
    }
}

impl Obs for CatchObs {
    fn shape(&self) -> &[usize] {
        self.frames.shape()
    }
}

impl TryFrom<CatchObs> for Tensor {
    type Error = anyhow::Error;

    /// `u8` tensor of shape `[n_stack, height, width]` on the CPU.
    fn try_from(obs: CatchObs) -> Result<Tensor> {
        let shape = obs.frames.shape().to_vec();
        let data = obs.frames.as_standard_layout().iter().copied().collect::<Vec<_>>();
        Ok(Tensor::from_vec(data, shape, &Device::Cpu)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_shifts_frames() -> Result<()> {
        let f0 = Array2::from_elem((2, 3), 0u8);
        let f1 = Array2::from_elem((2, 3), 1u8);
        let f2 = Array2::from_elem((2, 3), 2u8);
        let mut obs = CatchObs::new(2, &f0);
        assert_eq!(obs.shape(), &[2, 2, 3]);

        obs.push(&f1);
        obs.push(&f2);
        assert_eq!(obs.frames().slice(s![0, .., ..]), f1);
        assert_eq!(obs.frames().slice(s![1, .., ..]), f2);

        let t: Tensor = obs.try_into()?;
        assert_eq!(t.dims(), &[2, 2, 3]);
        assert_eq!(t.flatten_all()?.to_vec1::<u8>()?, vec![1, 1, 1, 1, 1, 1, 2, 2, 2, 2, 2, 2]);
        Ok(())
    }
}
