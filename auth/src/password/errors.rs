use thiserror::Error;

/// Error type for password operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PasswordError {
    #[error("Password must not be empty")]
    EmptySecret,

    #[error("Password hashing failed: {0}")]
    EncodingFailure(String),
}
