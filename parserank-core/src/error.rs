//! Configuration errors
//!
//! Candidate failures are never errors at this level; they become
//! [`Elapsed::Failed`](crate::Elapsed::Failed) measurements. Only structural
//! problems that make a whole run meaningless are reported here, before any
//! candidate executes.

/// Errors that abort a run before measurement begins
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// Cycles below one
    #[error("cycle count must be a positive integer, got {0}")]
    InvalidCycles(i64),
    /// Two candidates of one suite share a name
    #[error("candidate name {0:?} is registered more than once")]
    DuplicateCandidate(String),
    /// Candidate registered with an empty name
    #[error("candidate name must not be empty")]
    EmptyCandidateName,
}
