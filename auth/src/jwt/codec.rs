use std::sync::Arc;

use chrono::Utc;
use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;

use super::claims::IdentityClaims;
use super::errors::JwtError;
use super::keys::KeyMaterial;

/// RS256 token codec.
///
/// Encodes identity claims into `header.payload.signature` compact tokens
/// and decodes them back. Decoding verifies the signature over the exact
/// `header.payload` bytes before any claim is deserialized; the expiration
/// is checked last, against the now trusted payload.
#[derive(Debug, Clone)]
pub struct TokenCodec {
    keys: Arc<KeyMaterial>,
    validation: Validation,
    leeway: i64,
}

impl TokenCodec {
    /// Create a codec over a loaded key pair with no clock-skew allowance.
    pub fn new(keys: Arc<KeyMaterial>) -> Self {
        let mut validation = Validation::new(KeyMaterial::ALGORITHM);
        // Expiration is checked after decoding, see `decode_at`
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        Self {
            keys,
            validation,
            leeway: 0,
        }
    }

    /// Accept tokens up to `seconds` past their expiration.
    pub fn with_leeway(mut self, seconds: u32) -> Self {
        self.leeway = i64::from(seconds);
        self
    }

    /// Sign claims into a compact token.
    ///
    /// # Errors
    /// * `SigningFailure` - The signing key rejected the operation
    pub fn encode(&self, claims: &IdentityClaims) -> Result<String, JwtError> {
        let header = Header::new(KeyMaterial::ALGORITHM);

        encode(&header, claims, self.keys.signing_key())
            .map_err(|e| JwtError::SigningFailure(e.to_string()))
    }

    /// Verify a token against the current time and return its claims.
    ///
    /// # Errors
    /// * `MalformedToken` - Wrong segment count or undecodable segments
    /// * `InvalidSignature` - Signature does not match or wrong algorithm
    /// * `TokenExpired` - Expiration is in the past
    pub fn decode(&self, token: &str) -> Result<IdentityClaims, JwtError> {
        self.decode_at(token, Utc::now().timestamp())
    }

    /// Verify a token against `now` (Unix timestamp) and return its claims.
    pub fn decode_at(&self, token: &str, now: i64) -> Result<IdentityClaims, JwtError> {
        let token_data = decode::<IdentityClaims>(
            token,
            self.keys.verification_key(),
            &self.validation,
        )
        .map_err(classify)?;

        let claims = token_data.claims;
        if claims.is_expired(now - self.leeway) {
            return Err(JwtError::TokenExpired);
        }

        Ok(claims)
    }
}

fn classify(error: jsonwebtoken::errors::Error) -> JwtError {
    match error.kind() {
        ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => JwtError::InvalidSignature,
        ErrorKind::ExpiredSignature => JwtError::TokenExpired,
        _ => JwtError::MalformedToken(error.to_string()),
    }
}
