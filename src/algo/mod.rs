pub mod q_learner;
pub mod q_table;

pub use q_learner::{QLearner, QLearnerConfig};
pub use q_table::QTable;
