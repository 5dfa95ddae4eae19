//! Configuration of [`CatchEnv`](super::CatchEnv).
use serde::{Deserialize, Serialize};

/// Configuration of [`CatchEnv`](super::CatchEnv).
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct CatchEnvConfig {
    /// Height of the field in cells.
    pub height: usize,

    /// Width of the field in cells.
    pub width: usize,

    /// Side of a cell in pixels.
    pub cell_px: usize,

    /// Width of the paddle in cells.
    pub paddle_width: usize,

    /// The number of stacked frames.
    pub n_stack: usize,
}

impl Default for CatchEnvConfig {
    fn default() -> Self {
        Self {
            height: 12,
            width: 12,
            cell_px: 3,
            paddle_width: 3,
            n_stack: 2,
        }
    }
}

impl CatchEnvConfig {
    /// Sets the size of the field in cells.
    pub fn field(mut self, height: usize, width: usize) -> Self {
        self.height = height;
        self.width = width;
        self
    }

    /// Sets the side of a cell in pixels.
    pub fn cell_px(mut self, v: usize) -> Self {
        self.cell_px = v;
        self
    }

    /// Sets the width of the paddle in cells.
    pub fn paddle_width(mut self, v: usize) -> Self {
        self.paddle_width = v;
        self
    }

    /// Sets the number of stacked frames.
    pub fn n_stack(mut self, v: usize) -> Self {
        self.n_stack = v;
        self
    }

    /// Shape of the observations, `[n_stack, height, width]` in pixels.
    pub fn observation_shape(&self) -> Vec<usize> {
        vec![
            self.n_stack,
            self.height * self.cell_px,
            self.width * self.cell_px,
        ]
    }
}
