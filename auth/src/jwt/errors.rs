use thiserror::Error;

/// Error type for JWT operations.
///
/// Every validation failure collapses to "unauthorized" at the HTTP edge;
/// the variants exist so callers and logs can tell the causes apart.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum JwtError {
    #[error("Failed to encode token: {0}")]
    EncodingFailed(String),

    #[error("Malformed token: {0}")]
    MalformedToken(String),

    #[error("Token signature does not match")]
    SignatureMismatch,

    #[error("Token is expired")]
    TokenExpired,
}
