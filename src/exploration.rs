use rand::Rng;

use crate::{
    decay::{self, Decay},
    ensure_interval,
    error::Result,
};

/// Exploration policy result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    Explore,
    Exploit,
}

/// Epsilon greedy exploration policy with time-decaying epsilon threshold
#[derive(Debug, Clone)]
pub struct EpsilonGreedy<D: Decay> {
    epsilon: D,
}

impl<D: Decay> EpsilonGreedy<D> {
    /// Initialize epsilon greedy policy with a decay strategy
    pub fn new(decay: D) -> Self {
        Self { epsilon: decay }
    }

    /// The exploration rate for the given episode, clamped to `[0,1]`
    pub fn epsilon(&self, episode: u32) -> f64 {
        self.epsilon.evaluate(episode as f64).clamp(0.0, 1.0)
    }

    /// **Errors** if the initial exploration rate is not in the interval `[0,1]`
    pub fn validate(&self) -> Result<()> {
        ensure_interval!(self.epsilon.evaluate(0.0), 0.0, 1.0);
        Ok(())
    }

    /// Invoke epsilon greedy policy for current episode
    ///
    /// Explores with probability epsilon: an epsilon of `0` never explores and an
    /// epsilon of `1` always does.
    pub fn choose<R: Rng>(&self, episode: u32, rng: &mut R) -> Choice {
        if rng.gen::<f64>() < self.epsilon(episode) {
            Choice::Explore
        } else {
            Choice::Exploit
        }
    }
}

impl EpsilonGreedy<decay::Constant> {
    /// Epsilon greedy policy with a fixed exploration rate
    pub fn constant(epsilon: f64) -> Self {
        Self::new(decay::Constant::new(epsilon))
    }
}
