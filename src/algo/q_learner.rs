use std::fmt;

use log::{debug, info, trace};
use rand::{rngs::StdRng, SeedableRng};

use crate::{
    decay::{self, Decay},
    ensure_interval,
    env::{Environment, Hashable},
    error::Result,
    exp::Exp,
    exploration::{Choice, EpsilonGreedy},
};

use super::q_table::QTable;

/// Configuration for the [`QLearner`]
#[derive(Debug, Clone)]
pub struct QLearnerConfig<D: Decay = decay::Linear> {
    /// Learning rate α, in `[0,1]`
    ///
    /// **Default**: `0.1`
    pub learning_rate: f64,
    /// Discount factor γ, in `[0,1]`
    ///
    /// **Default**: `0.9`
    pub discount_factor: f64,
    /// Exploration policy, evaluated at the index of the current trial
    ///
    /// **Default**: epsilon falls linearly from `1` to `0` over the first half of the
    /// default trial budget, so the remaining trials, the last one included, are greedy
    pub exploration: EpsilonGreedy<D>,
    /// Number of trials run by [`QLearner::learn`]
    ///
    /// This is a fixed budget. Whether the table converges within it depends on the
    /// environment and the other hyperparameters.
    ///
    /// **Default**: `1000`
    pub n_iter: u32,
    /// Seed for the random source used for exploration, or `None` to seed from entropy
    ///
    /// **Default**: `None`
    pub seed: Option<u64>,
}

const DEFAULT_N_ITER: u32 = 1000;

impl Default for QLearnerConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.1,
            discount_factor: 0.9,
            exploration: EpsilonGreedy::new(decay::Linear::annealing(DEFAULT_N_ITER / 2)),
            n_iter: DEFAULT_N_ITER,
            seed: None,
        }
    }
}

impl<D: Decay> QLearnerConfig<D> {
    /// Replace the exploration policy, possibly with one using a different decay strategy
    pub fn with_exploration<D2: Decay>(self, exploration: EpsilonGreedy<D2>) -> QLearnerConfig<D2> {
        QLearnerConfig {
            learning_rate: self.learning_rate,
            discount_factor: self.discount_factor,
            exploration,
            n_iter: self.n_iter,
            seed: self.seed,
        }
    }

    fn validate(&self) -> Result<()> {
        ensure_interval!(self.learning_rate, 0.0, 1.0);
        ensure_interval!(self.discount_factor, 0.0, 1.0);
        self.exploration.validate()
    }
}

/// Bookkeeping for the trial in progress
#[derive(Debug, Clone, Copy)]
struct Trial<S> {
    state: S,
    reward: f64,
    steps: u32,
    terminated: bool,
    truncated: bool,
}

/// A tabular Q-learning agent that owns its environment and drives the trial loop
///
/// ### Generics
/// - `E` - The [`Environment`] in which the agent will learn
///     - The environment's state and action spaces must both be discrete because a Q value will be recorded for each state action pair
///     - For the same reason, the state and action types must be [`Hashable`]
/// - `D` - The [`Decay`] strategy of the exploration rate
pub struct QLearner<E, D = decay::Linear>
where
    E: Environment,
    E::State: Hashable,
    E::Action: Hashable,
    D: Decay,
{
    q_table: QTable<E::State, E::Action>,
    environment: E,
    exploration: EpsilonGreedy<D>,
    alpha: f64,   // learning rate
    gamma: f64,   // discount factor
    n_iter: u32,  // trials per call to `learn`
    episode: u32, // trials completed so far
    rng: StdRng,
}

impl<E, D> QLearner<E, D>
where
    E: Environment,
    E::State: Hashable,
    E::Action: Hashable,
    D: Decay,
{
    /// Initialize a new `QLearner` over the declared states and actions
    ///
    /// Every state the environment can produce must be declared, and every declared
    /// action must be accepted by the environment.
    ///
    /// **Errors** if either set is empty, or if the learning rate, discount factor or
    /// initial exploration rate is not in the interval `[0,1]`
    pub fn new(
        states: impl IntoIterator<Item = E::State>,
        actions: impl IntoIterator<Item = E::Action>,
        environment: E,
        config: QLearnerConfig<D>,
    ) -> Result<Self> {
        config.validate()?;
        let q_table = QTable::new(states, actions)?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(Self {
            q_table,
            environment,
            exploration: config.exploration,
            alpha: config.learning_rate,
            gamma: config.discount_factor,
            n_iter: config.n_iter,
            episode: 0,
            rng,
        })
    }

    pub fn q_table(&self) -> &QTable<E::State, E::Action> {
        &self.q_table
    }

    pub fn environment(&self) -> &E {
        &self.environment
    }

    /// Number of trials completed so far
    pub fn episode(&self) -> u32 {
        self.episode
    }

    /// Choose an action based on the current state and exploration policy
    fn act(&mut self, state: E::State) -> Result<E::Action> {
        match self.exploration.choose(self.episode, &mut self.rng) {
            Choice::Explore => Ok(self.q_table.random_action(&mut self.rng)),
            Choice::Exploit => self.q_table.best_action(&state),
        }
    }

    /// Run one trial from reset to termination or truncation
    fn run_trial(&mut self) -> Result<Trial<E::State>> {
        let (state, _) = self.environment.reset();
        self.q_table.check_state(&state)?;

        let mut trial = Trial {
            state,
            reward: 0.0,
            steps: 0,
            terminated: false,
            truncated: false,
        };

        while !(trial.terminated || trial.truncated) {
            let action = self.act(trial.state)?;
            let step = self.environment.step(action)?;
            let exp = Exp {
                state: trial.state,
                action,
                reward: step.reward,
                next_state: step.next_state,
                done: step.is_done(),
            };
            let q_value = self.q_table.update(&exp, self.alpha, self.gamma)?;
            trace!(
                "{:?} --{:?}--> {:?}, reward {}, q {:.4}",
                exp.state,
                exp.action,
                exp.next_state,
                exp.reward,
                q_value
            );

            trial.state = step.next_state;
            trial.reward += step.reward;
            trial.steps += 1;
            trial.terminated = step.terminated;
            trial.truncated = step.truncated;
        }

        self.episode += 1;
        Ok(trial)
    }

    /// Run `n_iter` trials, updating the table after every step
    ///
    /// Calling this again continues training on the same table.
    ///
    /// **Returns** the cumulative reward of the last trial, or `0.0` if no trial ran
    ///
    /// **Errors** if the environment rejects an action or produces an undeclared
    /// state. The run stops at the first error.
    pub fn learn(&mut self) -> Result<f64> {
        let mut final_reward = 0.0;
        for _ in 0..self.n_iter {
            let trial = self.run_trial()?;
            debug!(
                "trial {} {} after {} steps with reward {}",
                self.episode,
                if trial.terminated { "terminated" } else { "truncated" },
                trial.steps,
                trial.reward
            );
            final_reward = trial.reward;
        }

        info!(
            "finished {} trials ({} total), final trial reward {}",
            self.n_iter, self.episode, final_reward
        );
        Ok(final_reward)
    }
}

impl<E, D> fmt::Display for QLearner<E, D>
where
    E: Environment,
    E::State: Hashable,
    E::Action: Hashable,
    D: Decay,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.q_table, f)
    }
}
