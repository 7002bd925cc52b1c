use thiserror::Error;

/// Error type for token operations.
///
/// Every validation variant is an authentication failure; callers should not
/// retry and should not tell clients which variant occurred.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("Invalid token configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Failed to sign token: {0}")]
    SigningFailed(String),

    #[error("Token is malformed: {0}")]
    Malformed(String),

    #[error("Token signature is invalid")]
    InvalidSignature,

    #[error("Token signing algorithm is not accepted")]
    AlgorithmMismatch,

    #[error("Token is expired")]
    Expired,

    #[error("Token is not yet valid")]
    NotYetValid,
}
