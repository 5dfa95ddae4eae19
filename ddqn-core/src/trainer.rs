//! Train [`Agent`].
mod config;
use crate::{
    error::DdqnError,
    record::{AggregateRecorder, Record, RecordValue::Scalar},
    replay_buffer::Transition,
    Agent, Env, ExperienceBufferBase, Obs, ReplayBufferBase,
};
use anyhow::Result;
pub use config::TrainerConfig;
use log::{debug, info};
use std::time::{Duration, SystemTime};

/// Per-run state of the training loop.
pub struct TrainerState<O> {
    /// Index of the last frame played, starting from 1.
    pub frame: usize,

    /// Observation the next action is taken on.
    pub obs: O,

    /// Sum of rewards in the running episode.
    pub episode_reward: f32,

    /// Exploration rate used at `frame`.
    pub epsilon: f64,
}

/// Training curves collected by [`Trainer::train`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrainHistory {
    /// Total reward of each completed episode, in order of completion.
    pub episode_rewards: Vec<f32>,

    /// Loss of each optimization step, in order.
    pub losses: Vec<f32>,
}

fn check_shape(expected: &[usize], actual: &[usize]) -> Result<()> {
    if expected != actual {
        return Err(DdqnError::ShapeMismatch {
            expected: expected.to_vec(),
            actual: actual.to_vec(),
        }
        .into());
    }
    Ok(())
}

#[inline]
fn is_due(frame: usize, interval: usize) -> bool {
    interval > 0 && frame % interval == 0
}

#[cfg_attr(doc, aquamarine::aquamarine)]
/// Manages the training loop.
///
/// # Training loop
///
/// Given an environment, an agent, a replay buffer and a recorder,
/// [`Trainer::train()`] does the following for `frame` in `1..=max_frames`:
///
/// 1. `epsilon = schedule.epsilon(frame)`.
/// 2. The agent samples an action on the current observation with `epsilon`.
/// 3. The environment is stepped with the action. The shape of the returned
///    observation must be that of the agent's input.
/// 4. The transition `(obs, act, reward, next_obs, is_done)` is pushed into
///    the buffer.
/// 5. `obs = next_obs`, `episode_reward += reward`.
/// 6. If the episode ended, the environment is reset and the episode reward is
///    recorded as `"episode_reward"`.
/// 7. If the buffer holds more than `warmup_period` transitions, the agent
///    does an optimization step and the loss is recorded as `"loss"`.
/// 8. If `frame % target_update_interval == 0`, the target network is synced.
/// 9. If `frame % log_interval == 0`, progress is logged.
/// 10. If `frame % flush_record_interval == 0`, `"epsilon"` and `"fps"` are
///     recorded and the recorder is flushed.
///
/// # Interaction of objects
///
/// ```mermaid
/// graph LR
///     A[Agent]-->|Env::Act|B[Env]
///     B -->|Env::Obs|A
///     B -->|"Step&lt;E: Env&gt;"|T[Trainer]
///     T -->|Transition|D[ReplayBufferBase]
///     D -->|TransitionBatch|A
/// ```
///
/// [`Trainer::train()`]: Trainer::train
pub struct Trainer {
    config: TrainerConfig,

    /// Frames played since the last flush, for computing frames per second.
    frames_for_fps: usize,

    /// Time spent since the last flush.
    timer_for_fps: Duration,
}

impl Trainer {
    /// Constructs a trainer.
    pub fn build(config: TrainerConfig) -> Self {
        Self {
            config,
            frames_for_fps: 0,
            timer_for_fps: Duration::new(0, 0),
        }
    }

    /// Configuration of the trainer.
    pub fn config(&self) -> &TrainerConfig {
        &self.config
    }

    /// Returns frames per second, then resets the internal counter.
    fn fps(&mut self) -> f32 {
        let millis = self.timer_for_fps.as_millis() as f32;
        let fps = if millis > 0.0 {
            1000. * self.frames_for_fps as f32 / millis
        } else {
            0.0
        };
        self.frames_for_fps = 0;
        self.timer_for_fps = Duration::new(0, 0);
        fps
    }

    /// Performs a single frame of the training loop.
    ///
    /// `state.frame` must already be the index of the frame to be played.
    /// The returned record holds the values to be stored in the recorder.
    pub fn train_step<E, A, R>(
        &mut self,
        env: &mut E,
        agent: &mut A,
        buffer: &mut R,
        state: &mut TrainerState<E::Obs>,
        history: &mut TrainHistory,
    ) -> Result<Record>
    where
        E: Env,
        A: Agent<E, R>,
        R: ReplayBufferBase + ExperienceBufferBase<Item = Transition<E::Obs, E::Act>>,
    {
        let timer = SystemTime::now();
        let frame = state.frame;
        let input_shape = agent.input_shape();

        state.epsilon = self.config.epsilon.epsilon(frame);
        let act = agent.sample(&state.obs, state.epsilon)?;
        let (step, mut record) = env.step(&act)?;
        check_shape(&input_shape, step.obs.shape())?;

        let next_obs = step.obs;
        let obs = std::mem::replace(&mut state.obs, next_obs.clone());
        buffer.push(Transition::new(obs, act, step.reward, next_obs, step.is_done))?;
        state.episode_reward += step.reward;

        if step.is_done {
            let obs = env.reset()?;
            check_shape(&input_shape, obs.shape())?;
            state.obs = obs;
            debug!(
                "Episode ended at frame {} with reward {}",
                frame, state.episode_reward
            );
            record.insert("episode_reward", Scalar(state.episode_reward));
            history.episode_rewards.push(state.episode_reward);
            state.episode_reward = 0.0;
        }

        if buffer.len() > self.config.warmup_period {
            let record_agent = agent.opt(buffer)?;
            history.losses.push(record_agent.get_scalar("loss")?);
            record.merge_inplace(record_agent);
        }

        if is_due(frame, self.config.target_update_interval) {
            agent.sync_target()?;
        }

        if is_due(frame, self.config.log_interval) {
            info!(
                "frame: {}, epsilon: {:.4}, episodes: {}, buffer: {}",
                frame,
                state.epsilon,
                history.episode_rewards.len(),
                buffer.len()
            );
        }

        self.timer_for_fps += timer.elapsed()?;
        self.frames_for_fps += 1;

        Ok(record)
    }

    /// Trains the agent on the environment.
    ///
    /// Fails before the first frame if `warmup_period` is smaller than the
    /// agent's batch size or the exploration schedule is invalid.
    /// The agent is put into training mode. Records are stored in `recorder`
    /// every frame and flushed every `flush_record_interval` frames with the
    /// frame index as the step.
    pub fn train<E, A, R>(
        &mut self,
        env: &mut E,
        agent: &mut A,
        buffer: &mut R,
        recorder: &mut dyn AggregateRecorder,
    ) -> Result<TrainHistory>
    where
        E: Env,
        A: Agent<E, R>,
        R: ReplayBufferBase + ExperienceBufferBase<Item = Transition<E::Obs, E::Act>>,
    {
        self.config.check()?;
        let batch_size = agent.batch_size();
        if self.config.warmup_period < batch_size {
            return Err(DdqnError::InvalidConfig(format!(
                "warmup_period ({}) must be at least the batch size ({})",
                self.config.warmup_period, batch_size
            ))
            .into());
        }

        let input_shape = agent.input_shape();
        check_shape(&input_shape, &env.observation_shape())?;

        let obs = env.reset()?;
        check_shape(&input_shape, obs.shape())?;

        let mut state = TrainerState {
            frame: 0,
            obs,
            episode_reward: 0.0,
            epsilon: self.config.epsilon.epsilon(0),
        };
        let mut history = TrainHistory::default();
        self.frames_for_fps = 0;
        self.timer_for_fps = Duration::new(0, 0);
        agent.train();

        for frame in 1..=self.config.max_frames {
            state.frame = frame;
            let mut record = self.train_step(env, agent, buffer, &mut state, &mut history)?;

            if is_due(frame, self.config.flush_record_interval) {
                record.insert("epsilon", Scalar(state.epsilon as f32));
                record.insert("fps", Scalar(self.fps()));
            }

            if !record.is_empty() {
                recorder.store(record);
            }

            if is_due(frame, self.config.flush_record_interval) {
                recorder.flush(frame as _);
            }
        }

        info!(
            "Finished {} frames, {} episodes",
            self.config.max_frames,
            history.episode_rewards.len()
        );

        Ok(history)
    }
}
