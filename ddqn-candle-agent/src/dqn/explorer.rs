//! Exploration strategy of DQN.
use anyhow::Result;
use rand::Rng;

/// Index of the maximum value. Ties are broken towards the smallest index.
///
/// Returns 0 for an empty slice.
pub fn argmax_first(values: &[f32]) -> usize {
    let mut best = 0;
    for (i, v) in values.iter().enumerate() {
        if *v > values[best] {
            best = i;
        }
    }
    best
}

/// Epsilon-greedy action selection.
///
/// The explorer keeps no schedule; the exploration rate is given at every
/// call.
pub struct EpsilonGreedy;

impl EpsilonGreedy {
    /// Selects an action among `n_actions`.
    ///
    /// A value `u` is drawn uniformly from `[0, 1)`. If `u > epsilon`,
    /// `q_values` is evaluated and the index of its maximum is returned.
    /// Otherwise an action is drawn uniformly and `q_values` is not evaluated.
    pub fn action<R, F>(n_actions: usize, epsilon: f64, rng: &mut R, q_values: F) -> Result<usize>
    where
        R: Rng,
        F: FnOnce() -> Result<Vec<f32>>,
    {
        let u = rng.gen::<f64>();
        if u > epsilon {
            Ok(argmax_first(&q_values()?))
        } else {
            Ok(rng.gen_range(0..n_actions))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::bail;
    use rand::{rngs::SmallRng, SeedableRng};

    #[test]
    fn test_argmax_first() {
        assert_eq!(argmax_first(&[0.1, 0.5, 0.2]), 1);
        assert_eq!(argmax_first(&[0.5, 0.5, 0.2, 0.5]), 0);
        assert_eq!(argmax_first(&[-1.0, 2.0, 2.0]), 1);
    }

    #[test]
    fn test_greedy_with_zero_epsilon() -> Result<()> {
        let mut rng = SmallRng::seed_from_u64(0);
        for _ in 0..100 {
            let a = EpsilonGreedy::action(3, 0.0, &mut rng, || Ok(vec![0.0, 0.0, 1.0]))?;
            assert_eq!(a, 2);
        }
        Ok(())
    }

    #[test]
    fn test_random_with_unit_epsilon() -> Result<()> {
        let mut rng = SmallRng::seed_from_u64(0);
        let mut counts = [0usize; 4];
        for _ in 0..4000 {
            // The network must not be evaluated.
            let a = EpsilonGreedy::action(4, 1.0, &mut rng, || bail!("evaluated"))?;
            counts[a] += 1;
        }
        for count in counts {
            assert!((count as f64 - 1000.0).abs() < 150.0);
        }
        Ok(())
    }
}
