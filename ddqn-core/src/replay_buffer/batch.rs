//! Transitions and batches of transitions.

/// A transition `(o_t, a_t, r_t, o_t+1, done_t)`.
#[derive(Clone, Debug, PartialEq)]
pub struct Transition<O, A> {
    /// Observation.
    pub obs: O,

    /// Action taken on `obs`.
    pub act: A,

    /// Reward.
    pub reward: f32,

    /// Next observation.
    pub next_obs: O,

    /// Flag denoting if the episode ended with this transition.
    pub is_done: bool,
}

impl<O, A> Transition<O, A> {
    /// Constructs a transition.
    pub fn new(obs: O, act: A, reward: f32, next_obs: O, is_done: bool) -> Self {
        Self {
            obs,
            act,
            reward,
            next_obs,
            is_done,
        }
    }
}

/// A batch of transitions stored column-wise.
///
/// All columns have the same length and the `i`-th element of each column
/// belongs to the same transition.
#[derive(Clone, Debug)]
pub struct TransitionBatch<O, A> {
    /// Observations.
    pub obs: Vec<O>,

    /// Actions.
    pub act: Vec<A>,

    /// Rewards.
    pub reward: Vec<f32>,

    /// Next observations.
    pub next_obs: Vec<O>,

    /// Done flags, `1` if the episode ended.
    pub is_done: Vec<i8>,

    /// Positions of the sampled transitions in the buffer.
    pub ix_sample: Vec<usize>,
}

impl<O, A> TransitionBatch<O, A> {
    /// Creates an empty batch with room for `capacity` transitions.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            obs: Vec::with_capacity(capacity),
            act: Vec::with_capacity(capacity),
            reward: Vec::with_capacity(capacity),
            next_obs: Vec::with_capacity(capacity),
            is_done: Vec::with_capacity(capacity),
            ix_sample: Vec::with_capacity(capacity),
        }
    }

    /// Appends a transition found at position `ix` of the buffer.
    pub fn push(&mut self, ix: usize, tr: Transition<O, A>) {
        self.obs.push(tr.obs);
        self.act.push(tr.act);
        self.reward.push(tr.reward);
        self.next_obs.push(tr.next_obs);
        self.is_done.push(tr.is_done as i8);
        self.ix_sample.push(ix);
    }

    /// Unpack the data `(o_t, a_t, r_t, o_t+1, is_done_t)`.
    pub fn unpack(self) -> (Vec<O>, Vec<A>, Vec<f32>, Vec<O>, Vec<i8>) {
        (self.obs, self.act, self.reward, self.next_obs, self.is_done)
    }

    /// Returns the number of transitions.
    pub fn len(&self) -> usize {
        self.reward.len()
    }

    /// Returns `true` if the batch is empty.
    pub fn is_empty(&self) -> bool {
        self.reward.is_empty()
    }
}
