use rand::{rngs::StdRng, SeedableRng};
use rand_distr::{Distribution, Normal};

use crate::{
    env::{Environment, Info, Step},
    error::{Error, Result},
};

/// K-armed bandit environment
///
/// A simple environment with K arms, each of which has a normal distribution of rewards.
/// The goal is to learn which arm has the highest mean reward. There is a single state and
/// every pull ends the trial.
pub struct KArmedBandit<const K: usize> {
    arms: [Normal<f64>; K],
    means: [f64; K],
    rng: StdRng,
}

impl<const K: usize> KArmedBandit<K> {
    /// Initialize a new K-armed bandit environment with arm means drawn from N(0, 1)
    pub fn new() -> Self {
        Self::from_rng(StdRng::from_entropy())
    }

    /// Same as [`KArmedBandit::new`], with reproducible arms and rewards
    pub fn with_seed(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    fn from_rng(mut rng: StdRng) -> Self {
        let dist = Normal::new(0.0, 1.0).expect("unit variance is valid");
        let means: [f64; K] = std::array::from_fn(|_| dist.sample(&mut rng));
        let arms = means.map(|mean| Normal::new(mean, 1.0).expect("unit variance is valid"));
        Self { arms, means, rng }
    }

    /// The mean reward of every arm
    pub fn means(&self) -> &[f64; K] {
        &self.means
    }

    /// The arm with the highest mean reward
    pub fn best_arm(&self) -> usize {
        (0..K).fold(0, |best, i| {
            if self.means[i] > self.means[best] {
                i
            } else {
                best
            }
        })
    }
}

impl<const K: usize> Default for KArmedBandit<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const K: usize> Environment for KArmedBandit<K> {
    type State = ();
    type Action = usize;

    fn reset(&mut self) -> (Self::State, Info) {
        ((), Info::new())
    }

    fn step(&mut self, action: Self::Action) -> Result<Step<Self::State>> {
        let arm = self
            .arms
            .get(action)
            .ok_or_else(|| Error::InvalidAction(format!("arm {action} of {K}")))?;
        Ok(Step::new((), arm.sample(&mut self.rng)).terminated())
    }
}
