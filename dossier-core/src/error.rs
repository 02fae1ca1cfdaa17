//! Engine-level error types
//!
//! Malformed criteria never fail scoring; they degrade to documented
//! defaults. The variants here cover the few conditions with no sensible
//! default.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScoringError {
    /// The caller supplied an input the engine cannot score against,
    /// e.g. an empty initiative collection.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A weight vector that is negative or does not sum to 1.0
    #[error("invalid weights: {0}")]
    InvalidWeights(String),
}
