//! Error types for starting a run.
//!
//! Only invalid input can fail a run up front. Everything that goes wrong
//! while resolving a username ends up in that username's verdict instead.

use handlecheck_core::CoreError;
use handlecheck_probe::ProbeError;
use thiserror::Error;

/// Errors returned when a run cannot be started.
#[derive(Error, Debug)]
pub enum EngineError {
    /// No usernames were supplied
    #[error("no usernames to check")]
    EmptyInput,

    /// Concurrency limit below one
    #[error("concurrency limit must be at least 1, got {limit}")]
    InvalidConcurrency {
        /// Requested limit
        limit: usize,
    },

    /// The same username appears twice in one run
    #[error("duplicate username in input: {username}")]
    DuplicateUsername {
        /// The repeated username
        username: String,
    },

    /// Prober construction failed
    #[error("probe error: {0}")]
    Probe(#[from] ProbeError),

    /// Core validation or configuration error
    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(EngineError::EmptyInput.to_string(), "no usernames to check");
        assert_eq!(
            EngineError::InvalidConcurrency { limit: 0 }.to_string(),
            "concurrency limit must be at least 1, got 0"
        );
        assert_eq!(
            EngineError::DuplicateUsername {
                username: "alice".to_string()
            }
            .to_string(),
            "duplicate username in input: alice"
        );
    }
}
