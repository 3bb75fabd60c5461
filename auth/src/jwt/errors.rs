use std::path::PathBuf;

use thiserror::Error;

/// Error type for token operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum JwtError {
    #[error("Failed to sign token: {0}")]
    SigningFailure(String),

    #[error("Malformed token: {0}")]
    MalformedToken(String),

    #[error("Token signature is invalid")]
    InvalidSignature,

    #[error("Token is expired")]
    TokenExpired,
}

/// Error type for loading the signing and verification keys.
///
/// Every variant is fatal at startup.
#[derive(Debug, Error)]
pub enum KeyError {
    #[error("Failed to read key file {}: {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid signing key: {0}")]
    InvalidPrivateKey(String),

    #[error("Invalid verification key: {0}")]
    InvalidPublicKey(String),

    #[error("Signing key and verification key do not belong to the same key pair")]
    Mismatch,
}
