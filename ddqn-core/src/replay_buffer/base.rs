//! Simple generic replay buffer.
use super::{SimpleReplayBufferConfig, Transition, TransitionBatch};
use crate::{error::DdqnError, ExperienceBufferBase, ReplayBufferBase};
use anyhow::Result;
use rand::{rngs::StdRng, seq::index, SeedableRng};

/// A fixed-capacity ring of transitions.
///
/// Once `capacity` transitions are stored, every push overwrites the oldest
/// one. Batches are sampled uniformly without replacement.
pub struct SimpleReplayBuffer<O, A> {
    capacity: usize,

    // Position the next push writes to. Once the ring is full it is also the
    // position of the oldest transition.
    i: usize,
    buf: Vec<Transition<O, A>>,
    rng: StdRng,
}

impl<O, A> SimpleReplayBuffer<O, A> {
    /// Maximum number of transitions kept in the buffer.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    fn oldest(&self) -> usize {
        if self.buf.len() < self.capacity {
            0
        } else {
            self.i
        }
    }

    /// Iterates over the stored transitions from the oldest to the newest.
    pub fn iter(&self) -> impl Iterator<Item = &Transition<O, A>> {
        let oldest = self.oldest();
        self.buf[oldest..].iter().chain(self.buf[..oldest].iter())
    }
}

impl<O, A> ExperienceBufferBase for SimpleReplayBuffer<O, A> {
    type Item = Transition<O, A>;

    fn len(&self) -> usize {
        self.buf.len()
    }

    fn push(&mut self, tr: Self::Item) -> Result<()> {
        if self.buf.len() < self.capacity {
            self.buf.push(tr);
        } else {
            self.buf[self.i] = tr;
        }
        self.i = (self.i + 1) % self.capacity;
        Ok(())
    }
}

impl<O, A> ReplayBufferBase for SimpleReplayBuffer<O, A>
where
    O: Clone,
    A: Clone,
{
    type Config = SimpleReplayBufferConfig;
    type Batch = TransitionBatch<O, A>;

    /// Builds an empty buffer.
    ///
    /// Panics if `config.capacity` is zero.
    fn build(config: &Self::Config) -> Self {
        assert!(config.capacity > 0, "capacity of replay buffer must be positive");

        Self {
            capacity: config.capacity,
            i: 0,
            buf: Vec::with_capacity(config.capacity),
            rng: StdRng::seed_from_u64(config.seed),
        }
    }

    fn batch(&mut self, size: usize) -> Result<Self::Batch> {
        let available = self.buf.len();
        if available < size {
            return Err(DdqnError::InsufficientData {
                requested: size,
                available,
            }
            .into());
        }

        let mut batch = TransitionBatch::with_capacity(size);
        for ix in index::sample(&mut self.rng, available, size).into_iter() {
            batch.push(ix, self.buf[ix].clone());
        }

        Ok(batch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn buffer(capacity: usize) -> SimpleReplayBuffer<usize, i64> {
        let config = SimpleReplayBufferConfig::default().capacity(capacity);
        SimpleReplayBuffer::build(&config)
    }

    fn tagged(tag: usize) -> Transition<usize, i64> {
        Transition::new(tag, tag as i64, tag as f32, tag + 1, tag % 2 == 0)
    }

    #[test]
    fn test_keeps_last_transitions() -> Result<()> {
        let mut buffer = buffer(5);
        for tag in 0..7 {
            buffer.push(tagged(tag))?;
        }

        assert_eq!(buffer.len(), 5);
        let tags: Vec<usize> = buffer.iter().map(|tr| tr.obs).collect();
        assert_eq!(tags, vec![2, 3, 4, 5, 6]);
        Ok(())
    }

    #[test]
    fn test_size_never_exceeds_capacity() -> Result<()> {
        for capacity in [1, 2, 3, 10] {
            let mut buffer = buffer(capacity);
            let n = 3 * capacity + 1;
            for tag in 0..n {
                buffer.push(tagged(tag))?;
                assert!(buffer.len() <= capacity);
            }
            assert_eq!(buffer.len(), capacity);
            let tags: Vec<usize> = buffer.iter().map(|tr| tr.obs).collect();
            assert_eq!(tags, (n - capacity..n).collect::<Vec<_>>());
        }
        Ok(())
    }

    #[test]
    fn test_partially_filled_order() -> Result<()> {
        let mut buffer = buffer(10);
        for tag in 0..4 {
            buffer.push(tagged(tag))?;
        }
        let tags: Vec<usize> = buffer.iter().map(|tr| tr.obs).collect();
        assert_eq!(tags, vec![0, 1, 2, 3]);
        Ok(())
    }

    #[test]
    fn test_insufficient_data() -> Result<()> {
        let mut buffer = buffer(10);
        for tag in 0..3 {
            buffer.push(tagged(tag))?;
        }

        let err = buffer.batch(4).unwrap_err();
        assert_eq!(
            err.downcast_ref::<DdqnError>(),
            Some(&DdqnError::InsufficientData {
                requested: 4,
                available: 3
            })
        );
        assert_eq!(buffer.batch(3)?.len(), 3);
        Ok(())
    }

    #[test]
    fn test_batch_is_distinct_and_columnar() -> Result<()> {
        let mut buffer = buffer(20);
        for tag in 0..20 {
            buffer.push(tagged(tag))?;
        }

        for _ in 0..100 {
            let batch = buffer.batch(8)?;
            let ixs = batch.ix_sample.clone();
            let (obs, act, reward, next_obs, is_done) = batch.unpack();
            assert_eq!(obs.len(), 8);
            assert_eq!(obs.iter().collect::<HashSet<_>>().len(), 8);
            for k in 0..8 {
                let tag = obs[k];
                assert_eq!(ixs[k], tag);
                assert_eq!(act[k], tag as i64);
                assert_eq!(reward[k], tag as f32);
                assert_eq!(next_obs[k], tag + 1);
                assert_eq!(is_done[k], (tag % 2 == 0) as i8);
            }
        }
        Ok(())
    }

    #[test]
    fn test_sampling_is_uniform() -> Result<()> {
        let capacity = 10;
        let mut buffer = buffer(capacity);
        for tag in 0..capacity {
            buffer.push(tagged(tag))?;
        }

        let n_calls = 20000;
        let batch_size = 3;
        let mut counts = vec![0usize; capacity];
        for _ in 0..n_calls {
            for tag in buffer.batch(batch_size)?.obs {
                counts[tag] += 1;
            }
        }

        // Each transition is included with probability batch_size / capacity.
        let expected = (n_calls * batch_size) as f64 / capacity as f64;
        for count in counts {
            assert!((count as f64 - expected).abs() < 0.05 * expected);
        }
        Ok(())
    }
}
