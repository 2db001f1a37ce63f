//! Error types for the probe subsystem.

use thiserror::Error;

/// Reasons a lookup did not produce a definite answer.
///
/// Apart from [`ProbeError::ClientBuild`], none of these reach the caller of
/// a run: the engine treats them all as "retry later".
#[derive(Error, Debug)]
pub enum ProbeError {
    /// Connection, TLS, or timeout failure
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Any status other than 200 or 404
    #[error("unexpected HTTP status {status}")]
    UnexpectedStatus {
        /// HTTP status code
        status: u16,
    },

    /// A 200 response whose body is not valid JSON
    #[error("failed to decode response body: {0}")]
    Decode(String),

    /// The HTTP client could not be constructed
    #[error("failed to create HTTP client: {0}")]
    ClientBuild(String),
}

/// Result type alias for probe operations.
pub type Result<T> = std::result::Result<T, ProbeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ProbeError::UnexpectedStatus { status: 429 };
        assert_eq!(err.to_string(), "unexpected HTTP status 429");

        let err = ProbeError::Decode("expected value at line 1 column 1".to_string());
        assert!(err.to_string().starts_with("failed to decode response body"));
    }
}
