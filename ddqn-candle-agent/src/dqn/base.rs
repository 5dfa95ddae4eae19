//! Double DQN agent implemented with candle.
use super::{config::DqnConfig, explorer::EpsilonGreedy, model::DqnModel};
use crate::{
    model::SubModel1,
    util::{smooth_l1_loss, CriticLoss, InShape, OutDim},
};
use anyhow::{Context, Result};
use candle_core::{shape::D, Device, Tensor};
use candle_nn::loss::mse;
use ddqn_core::{
    record::{Record, RecordValue},
    replay_buffer::TransitionBatch,
    Agent, Env, Policy, ReplayBufferBase,
};
use log::{info, trace};
use rand::{rngs::SmallRng, SeedableRng};
use serde::{de::DeserializeOwned, Serialize};
use std::marker::PhantomData;

/// Computes the double-Q TD target.
///
/// The next action is the argmax of the online values `next_q_online`, and it
/// is evaluated with the target values `next_q_target`:
///
/// `expected = reward + discount_factor * next_q_target[argmax(next_q_online)] * is_not_done`
///
/// `next_q_online` and `next_q_target` are `(N, n_actions)`, `reward` and
/// `is_not_done` are `(N,)`. The result is detached from the graph.
pub fn double_q_target(
    next_q_online: &Tensor,
    next_q_target: &Tensor,
    reward: &Tensor,
    is_not_done: &Tensor,
    discount_factor: f64,
) -> Result<Tensor> {
    let next_act = next_q_online.detach().argmax_keepdim(D::Minus1)?;
    let next_q = next_q_target.gather(&next_act, D::Minus1)?.squeeze(D::Minus1)?;
    let bootstrap = ((is_not_done * &next_q)? * discount_factor)?;
    Ok((reward + bootstrap)?.detach())
}

#[allow(clippy::upper_case_acronyms, dead_code)]
/// Double DQN agent implemented with candle.
///
/// The online network `qnet` is updated by [`Agent::opt`]. The target
/// network `qnet_tgt` is a copy of the online network taken at construction
/// and at every [`Agent::sync_target`].
pub struct Dqn<E, Q, R>
where
    E: Env,
    Q: SubModel1<Input = Tensor, Output = Tensor>,
    R: ReplayBufferBase<Batch = TransitionBatch<E::Obs, E::Act>>,
    E::Obs: TryInto<Tensor, Error = anyhow::Error>,
    E::Act: From<usize> + Into<usize>,
    Q::Config: DeserializeOwned + Serialize + OutDim + InShape + std::fmt::Debug + PartialEq + Clone,
{
    pub(in crate::dqn) batch_size: usize,
    pub(in crate::dqn) qnet: DqnModel<Q>,
    pub(in crate::dqn) qnet_tgt: DqnModel<Q>,
    pub(in crate::dqn) train: bool,
    pub(in crate::dqn) phantom: PhantomData<(E, R)>,
    pub(in crate::dqn) discount_factor: f64,
    pub(in crate::dqn) device: Device,
    pub(in crate::dqn) n_opts: usize,
    pub(in crate::dqn) critic_loss: CriticLoss,
    in_shape: Vec<usize>,
    n_actions: usize,
    rng: SmallRng,
}

impl<E, Q, R> Dqn<E, Q, R>
where
    E: Env,
    Q: SubModel1<Input = Tensor, Output = Tensor>,
    R: ReplayBufferBase<Batch = TransitionBatch<E::Obs, E::Act>>,
    E::Obs: TryInto<Tensor, Error = anyhow::Error>,
    E::Act: From<usize> + Into<usize>,
    Q::Config: DeserializeOwned + Serialize + OutDim + InShape + std::fmt::Debug + PartialEq + Clone,
{
    /// Constructs DQN agent.
    ///
    /// The online and the target networks are built independently and the
    /// target is then synchronized with the online network.
    pub fn build(config: DqnConfig<Q>) -> Result<Self> {
        let device: Device = config.device.unwrap_or_default().try_into()?;
        let q_config = config
            .model_config
            .get_q_config()
            .context("q_config is not set.")?;
        let in_shape = q_config.get_in_shape();
        let n_actions = q_config.get_out_dim() as usize;

        let qnet = DqnModel::build(config.model_config.clone(), device.clone())?;
        let qnet_tgt = DqnModel::build(config.model_config.clone(), device.clone())?;
        qnet_tgt.synchronize_from(&qnet)?;
        info!(
            "Built DQN agent, input shape: {:?}, actions: {}, device: {:?}",
            in_shape, n_actions, device
        );

        Ok(Dqn {
            qnet,
            qnet_tgt,
            batch_size: config.batch_size,
            discount_factor: config.discount_factor,
            train: config.train,
            device,
            n_opts: 0,
            critic_loss: config.critic_loss,
            in_shape,
            n_actions,
            phantom: PhantomData,
            rng: SmallRng::seed_from_u64(config.seed),
        })
    }

    /// The online network.
    pub fn qnet(&self) -> &DqnModel<Q> {
        &self.qnet
    }

    /// The target network.
    pub fn qnet_tgt(&self) -> &DqnModel<Q> {
        &self.qnet_tgt
    }

    /// The number of optimization steps done so far.
    pub fn n_opts(&self) -> usize {
        self.n_opts
    }

    fn stack(obs: Vec<E::Obs>) -> Result<Tensor> {
        let xs = obs
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<Tensor>>>()?;
        Ok(Tensor::stack(&xs, 0)?)
    }

    fn update_critic(&mut self, buffer: &mut R) -> Result<f32> {
        let batch = buffer.batch(self.batch_size)?;
        let (obs, act, reward, next_obs, is_done) = batch.unpack();
        let n = reward.len();
        let obs = Self::stack(obs)?;
        let next_obs = Self::stack(next_obs)?;
        let act = {
            let act = act
                .into_iter()
                .map(|a| Into::<usize>::into(a) as u32)
                .collect::<Vec<_>>();
            Tensor::from_vec(act, (n, 1), &self.device)?
        };
        let reward = Tensor::from_vec(reward, (n,), &self.device)?;
        let is_not_done = {
            let is_not_done = is_done
                .into_iter()
                .map(|v| (1 - v) as f32)
                .collect::<Vec<_>>();
            Tensor::from_vec(is_not_done, (n,), &self.device)?
        };

        let pred = self
            .qnet
            .forward(&obs)?
            .gather(&act, D::Minus1)?
            .squeeze(D::Minus1)?;

        let tgt = double_q_target(
            &self.qnet.forward(&next_obs)?,
            &self.qnet_tgt.forward(&next_obs)?,
            &reward,
            &is_not_done,
            self.discount_factor,
        )?;

        let loss = match self.critic_loss {
            CriticLoss::Mse => mse(&pred, &tgt)?,
            CriticLoss::SmoothL1 => smooth_l1_loss(&pred, &tgt)?,
        };

        // Backprop
        self.qnet.backward_step(&loss)?;
        trace!("Optimizer steps: {:?}", self.qnet.get_opt().steps());

        Ok(loss.to_scalar::<f32>()?)
    }
}

impl<E, Q, R> Policy<E> for Dqn<E, Q, R>
where
    E: Env,
    Q: SubModel1<Input = Tensor, Output = Tensor>,
    R: ReplayBufferBase<Batch = TransitionBatch<E::Obs, E::Act>>,
    E::Obs: TryInto<Tensor, Error = anyhow::Error>,
    E::Act: From<usize> + Into<usize>,
    Q::Config: DeserializeOwned + Serialize + OutDim + InShape + std::fmt::Debug + PartialEq + Clone,
{
    /// Epsilon-greedy action in training mode, greedy action in evaluation mode.
    fn sample(&mut self, obs: &E::Obs, epsilon: f64) -> Result<E::Act> {
        let qnet = &self.qnet;
        let q_values = || -> Result<Vec<f32>> {
            let xs: Tensor = obs.clone().try_into()?;
            let q = qnet.forward(&xs.unsqueeze(0)?)?;
            Ok(q.squeeze(0)?.to_vec1::<f32>()?)
        };

        let a = if self.train {
            EpsilonGreedy::action(self.n_actions, epsilon, &mut self.rng, q_values)?
        } else {
            super::argmax_first(&q_values()?)
        };
        Ok(a.into())
    }
}

impl<E, Q, R> Agent<E, R> for Dqn<E, Q, R>
where
    E: Env,
    Q: SubModel1<Input = Tensor, Output = Tensor>,
    R: ReplayBufferBase<Batch = TransitionBatch<E::Obs, E::Act>>,
    E::Obs: TryInto<Tensor, Error = anyhow::Error>,
    E::Act: From<usize> + Into<usize>,
    Q::Config: DeserializeOwned + Serialize + OutDim + InShape + std::fmt::Debug + PartialEq + Clone,
{
    fn train(&mut self) {
        self.train = true;
    }

    fn eval(&mut self) {
        self.train = false;
    }

    fn is_train(&self) -> bool {
        self.train
    }

    fn opt(&mut self, buffer: &mut R) -> Result<Record> {
        let loss = self.update_critic(buffer)?;
        self.n_opts += 1;
        Ok(Record::from_slice(&[("loss", RecordValue::Scalar(loss))]))
    }

    fn sync_target(&mut self) -> Result<()> {
        trace!("Synchronize target network after {} optimization steps", self.n_opts);
        self.qnet_tgt.synchronize_from(&self.qnet)
    }

    fn batch_size(&self) -> usize {
        self.batch_size
    }

    fn input_shape(&self) -> Vec<usize> {
        self.in_shape.clone()
    }
}
