use thiserror::Error;

/// Malformed input rejected before anything is stored.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Unknown mood: {0}")]
    UnknownMood(String),

    #[error("Unknown environment: {0}")]
    UnknownEnvironment(String),

    #[error("Duration must be a positive number of minutes, got {0}")]
    NonPositiveDuration(i64),

    #[error("Duration of {0} minutes is too large")]
    DurationTooLarge(i64),
}
