use std::{collections::HashMap, fmt::Debug, hash::Hash};

use crate::error::Result;

/// A trait for state and action types that can be used as keys in a [`HashMap`]
///
/// `Debug` is required so undeclared keys can be named in errors and in the table summary.
pub trait Hashable: Copy + Eq + Hash + Debug {}

impl<T> Hashable for T where T: Copy + Eq + Hash + Debug {}

/// Free-form diagnostic payload attached to [`Environment::reset`] and [`Environment::step`]
///
/// Learners never read it.
pub type Info = HashMap<&'static str, f64>;

/// The outcome of applying one action to an [`Environment`]
#[derive(Debug, Clone, PartialEq)]
pub struct Step<S> {
    /// The state of the environment after the action is taken
    pub next_state: S,
    /// The immediate reward for the transition
    pub reward: f64,
    /// The trial reached a goal or otherwise terminal condition
    pub terminated: bool,
    /// The trial was cut off by an external limit such as a step cap
    pub truncated: bool,
    pub info: Info,
}

impl<S> Step<S> {
    /// A non-terminal step with an empty [`Info`]
    pub fn new(next_state: S, reward: f64) -> Self {
        Self {
            next_state,
            reward,
            terminated: false,
            truncated: false,
            info: Info::new(),
        }
    }

    pub fn terminated(mut self) -> Self {
        self.terminated = true;
        self
    }

    pub fn truncated(mut self) -> Self {
        self.truncated = true;
        self
    }

    /// Whether this step ends the trial, for either reason
    pub fn is_done(&self) -> bool {
        self.terminated || self.truncated
    }
}

/// Represents a Markov decision process, defining the dynamics of an environment
/// in which an agent can operate.
///
/// This base trait represents the common case of a discrete-time MDP with one agent
/// and a finite state space and action space. The environment owns its state; an agent
/// only ever sees what `reset` and `step` return.
pub trait Environment {
    /// A representation of the state of the environment to be passed to an agent
    type State;

    /// A representation of an action that an agent can take to affect the environment
    type Action;

    /// Reset the environment to a fresh initial condition
    ///
    /// Called at the start of every trial.
    ///
    /// **Returns** `(initial_state, info)`
    fn reset(&mut self) -> (Self::State, Info);

    /// Update the environment in response to an action taken by an agent
    ///
    /// **Errors** with [`Error::InvalidAction`](crate::error::Error::InvalidAction) if
    /// `action` is not valid for this environment
    fn step(&mut self, action: Self::Action) -> Result<Step<Self::State>>;
}
