//! A pixel catch game.
//!
//! A ball falls from a random column at the top of the screen, one cell per
//! step. The agent moves a paddle along the bottom row. The episode ends when
//! the ball reaches the bottom row, with reward 1 if the paddle is under the
//! ball and -1 otherwise.
//!
//! Observations are the last `n_stack` grayscale frames, of shape
//! `[n_stack, height, width]` in pixels.
mod act;
mod env;
mod obs;
pub use act::CatchAct;
pub use env::{CatchEnv, CatchEnvConfig};
pub use obs::CatchObs;
