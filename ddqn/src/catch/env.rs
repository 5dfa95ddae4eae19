mod config;
use super::{CatchAct, CatchObs};
use anyhow::{bail, Result};
pub use config::CatchEnvConfig;
use ddqn_core::{record::Record, Env, Step};
use log::trace;
use ndarray::{s, Array2};
use rand::{rngs::StdRng, Rng, SeedableRng};

/// The catch game.
pub struct CatchEnv {
    config: CatchEnvConfig,
    rng: StdRng,
    ball_row: usize,
    ball_col: usize,
    paddle_col: usize,
    obs: CatchObs,
}

impl CatchEnv {
    fn render(&self) -> Array2<u8> {
        let px = self.config.cell_px;
        let mut frame = Array2::zeros((self.config.height * px, self.config.width * px));
        let mut fill = |row: usize, col: usize| {
            frame
                .slice_mut(s![row * px..(row + 1) * px, col * px..(col + 1) * px])
                .fill(255u8);
        };

        fill(self.ball_row, self.ball_col);
        let bottom = self.config.height - 1;
        for col in self.paddle_col..self.paddle_col + self.config.paddle_width {
            fill(bottom, col);
        }
        frame
    }

    fn is_caught(&self) -> bool {
        self.paddle_col <= self.ball_col
            && self.ball_col < self.paddle_col + self.config.paddle_width
    }

    /// Column of the ball, counted in cells from the left.
    pub fn ball_col(&self) -> usize {
        self.ball_col
    }

    /// Leftmost column of the paddle.
    pub fn paddle_col(&self) -> usize {
        self.paddle_col
    }
}

impl Env for CatchEnv {
    type Config = CatchEnvConfig;
    type Obs = CatchObs;
    type Act = CatchAct;
    type Info = ();

    fn build(config: &Self::Config, seed: i64) -> Result<Self> {
        if config.height < 2 || config.paddle_width == 0 || config.paddle_width > config.width {
            bail!("invalid configuration of the catch game: {:?}", config);
        }
        if config.n_stack == 0 || config.cell_px == 0 {
            bail!("invalid configuration of the catch game: {:?}", config);
        }

        let mut env = Self {
            config: config.clone(),
            rng: StdRng::seed_from_u64(seed as u64),
            ball_row: 0,
            ball_col: 0,
            paddle_col: 0,
            obs: CatchObs::new(
                config.n_stack,
                &Array2::zeros((config.height * config.cell_px, config.width * config.cell_px)),
            ),
        };
        env.reset()?;
        Ok(env)
    }

    fn step(&mut self, a: &Self::Act) -> Result<(Step<Self>, Record)> {
        let max_col = self.config.width - self.config.paddle_width;
        self.paddle_col = match *a {
            CatchAct::LEFT => self.paddle_col.saturating_sub(1),
            CatchAct::STAY => self.paddle_col,
            CatchAct::RIGHT => (self.paddle_col + 1).min(max_col),
            CatchAct(a) => bail!("invalid action {}", a),
        };
        self.ball_row += 1;

        let is_done = self.ball_row == self.config.height - 1;
        let reward = match (is_done, self.is_caught()) {
            (false, _) => 0.0,
            (true, true) => 1.0,
            (true, false) => -1.0,
        };
        trace!(
            "ball: ({}, {}), paddle: {}, reward: {}",
            self.ball_row,
            self.ball_col,
            self.paddle_col,
            reward
        );

        let frame = self.render();
        self.obs.push(&frame);
        let step = Step::new(self.obs.clone(), *a, reward, is_done, ());
        Ok((step, Record::empty()))
    }

    fn reset(&mut self) -> Result<Self::Obs> {
        self.ball_row = 0;
        self.ball_col = self.rng.gen_range(0..self.config.width);
        self.paddle_col = (self.config.width - self.config.paddle_width) / 2;
        self.obs = CatchObs::new(self.config.n_stack, &self.render());
        Ok(self.obs.clone())
    }

    fn observation_shape(&self) -> Vec<usize> {
        self.config.observation_shape()
    }

    fn num_actions(&self) -> usize {
        CatchAct::N
    }
}
