use thiserror::Error;

/// Errors raised while configuring a learner or running its trials
#[derive(Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum Error {
    /// The environment rejected an action outside its valid action set
    #[error("invalid action: {0}")]
    InvalidAction(String),

    /// A state was used that is not part of the declared state set
    #[error("state {0} is not in the declared state set")]
    UnknownState(String),

    /// An action was used that is not part of the declared action set
    #[error("action {0} is not in the declared action set")]
    UnknownAction(String),

    /// A constructor was given hyperparameters or state/action sets it cannot work with
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Shorthand for results carrying this crate's [`Error`]
pub type Result<T> = std::result::Result<T, Error>;
