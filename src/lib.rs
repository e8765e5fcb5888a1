//! Tabular Q-learning over any environment with finite state and action sets
//!
//! A [`QLearner`](algo::QLearner) owns an [`Environment`](env::Environment) and a dense
//! [`QTable`](algo::QTable), runs a fixed number of trials with an epsilon greedy
//! policy, and updates the table with the Bellman temporal difference rule after every
//! step.

/// Implemented RL algorithms
pub mod algo;

/// Implementations of strategies for time-decaying hyperparameters
pub mod decay;

/// Environment
pub mod env;

/// Error types
pub mod error;

/// Transitions
pub mod exp;

/// Exploration policies
pub mod exploration;

/// Testing environments
#[cfg(feature = "gym")]
pub mod gym;

mod util;
