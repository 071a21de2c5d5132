use thiserror::Error;

/// Error type for JWT operations.
///
/// Decoding failures are classified so they can be logged precisely, even
/// though callers of [`crate::TokenService::validate_token`] only see a boolean.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum JwtError {
    #[error("Failed to encode token: {0}")]
    EncodingFailed(String),

    #[error("Signing secret too short: minimum {min} bytes, got {actual}")]
    WeakSecret { min: usize, actual: usize },

    #[error("Token validity window must be a positive number of days in range, got {0}")]
    InvalidExpiration(i64),

    #[error("Invalid token signature")]
    InvalidSignature,

    #[error("Malformed token: {0}")]
    Malformed(String),

    #[error("Token is expired")]
    Expired,

    #[error("Unsupported token algorithm")]
    UnsupportedAlgorithm,

    #[error("Token is empty")]
    Empty,
}
