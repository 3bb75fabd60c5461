use std::sync::Arc;

use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;

use crate::jwt::IdentityClaims;
use crate::jwt::JwtError;
use crate::jwt::KeyMaterial;
use crate::jwt::TokenCodec;

/// Default token lifetime in minutes.
///
/// Long-lived on purpose: clients re-login rarely, and there is no
/// server-side session to revoke.
pub const DEFAULT_TOKEN_LIFETIME_MINUTES: i64 = 100_000;

/// An identity a token can be issued for.
///
/// Services implement this for their own user type.
pub trait TokenSubject {
    fn subject_id(&self) -> String;
    fn display_name(&self) -> &str;
    fn email(&self) -> &str;
}

/// Token issuance and request authorization.
///
/// Combines the token codec with the injected key material. Verification is
/// purely cryptographic plus the expiration check; the user store is never
/// consulted.
#[derive(Debug, Clone)]
pub struct Authenticator {
    codec: TokenCodec,
    token_lifetime: Duration,
}

/// Reasons a request is denied access.
///
/// Kept for logging only; callers outside the service see a single
/// access-denied outcome.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthenticationError {
    #[error("No access token presented")]
    MissingCredential,

    #[error("JWT error: {0}")]
    JwtError(#[from] JwtError),
}

impl Authenticator {
    /// Create a new authenticator.
    ///
    /// # Arguments
    /// * `keys` - Loaded signing and verification keys
    /// * `token_lifetime` - Validity window of issued tokens
    pub fn new(keys: Arc<KeyMaterial>, token_lifetime: Duration) -> Self {
        Self {
            codec: TokenCodec::new(keys),
            token_lifetime,
        }
    }

    /// Accept tokens up to `seconds` past their expiration.
    pub fn with_leeway(mut self, seconds: u32) -> Self {
        self.codec = self.codec.with_leeway(seconds);
        self
    }

    pub fn token_lifetime(&self) -> Duration {
        self.token_lifetime
    }

    /// Issue a signed token for a subject, valid from now.
    ///
    /// # Errors
    /// * `SigningFailure` - Token signing failed
    pub fn issue_token<S>(&self, subject: &S) -> Result<String, JwtError>
    where
        S: TokenSubject + ?Sized,
    {
        self.issue_token_at(subject, Utc::now())
    }

    /// Issue a signed token for a subject as if issued at `issued_at`.
    pub fn issue_token_at<S>(&self, subject: &S, issued_at: DateTime<Utc>) -> Result<String, JwtError>
    where
        S: TokenSubject + ?Sized,
    {
        let claims = IdentityClaims::for_user(
            subject.subject_id(),
            subject.display_name(),
            subject.email(),
            issued_at,
            self.token_lifetime,
        );

        self.codec.encode(&claims)
    }

    /// Validate and decode a token.
    ///
    /// # Errors
    /// * `MalformedToken`, `InvalidSignature`, `TokenExpired`
    pub fn verify_token(&self, token: &str) -> Result<IdentityClaims, JwtError> {
        self.codec.decode(token)
    }

    /// Decide whether a request carrying `credential` may proceed.
    ///
    /// No credential is rejected outright; a present credential is accepted
    /// only if it verifies.
    pub fn authorize(&self, credential: Option<&str>) -> Result<IdentityClaims, AuthenticationError> {
        let token = credential.ok_or(AuthenticationError::MissingCredential)?;
        Ok(self.verify_token(token)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jwt::keys::fixtures;

    struct TestUser;

    impl TokenSubject for TestUser {
        fn subject_id(&self) -> String {
            "user123".to_string()
        }

        fn display_name(&self) -> &str {
            "A"
        }

        fn email(&self) -> &str {
            "a@x.com"
        }
    }

    fn authenticator() -> Authenticator {
        Authenticator::new(
            Arc::new(fixtures::key_material()),
            Duration::minutes(DEFAULT_TOKEN_LIFETIME_MINUTES),
        )
    }

    #[test]
    fn test_issue_and_verify_token() {
        let authenticator = authenticator();

        let token = authenticator
            .issue_token(&TestUser)
            .expect("Failed to issue token");
        assert!(!token.is_empty());

        let claims = authenticator
            .verify_token(&token)
            .expect("Token validation failed");
        assert_eq!(claims.sub, "user123");
        assert_eq!(claims.name, "A");
        assert_eq!(claims.email, "a@x.com");
        assert_eq!(claims.exp - claims.iat, DEFAULT_TOKEN_LIFETIME_MINUTES * 60);
    }

    #[test]
    fn test_issued_token_expires() {
        let authenticator = authenticator();
        let issued_at =
            Utc::now() - authenticator.token_lifetime() - Duration::minutes(1);

        let token = authenticator
            .issue_token_at(&TestUser, issued_at)
            .expect("Failed to issue token");

        assert_eq!(
            authenticator.verify_token(&token),
            Err(JwtError::TokenExpired)
        );
    }

    #[test]
    fn test_leeway_accepts_recently_expired_token() {
        let authenticator = authenticator().with_leeway(120);
        let issued_at =
            Utc::now() - authenticator.token_lifetime() - Duration::seconds(30);

        let token = authenticator.issue_token_at(&TestUser, issued_at).unwrap();

        assert!(authenticator.verify_token(&token).is_ok());
    }

    #[test]
    fn test_authorize_without_credential() {
        assert_eq!(
            authenticator().authorize(None),
            Err(AuthenticationError::MissingCredential)
        );
    }

    #[test]
    fn test_authorize_with_valid_credential() {
        let authenticator = authenticator();
        let token = authenticator.issue_token(&TestUser).unwrap();

        let claims = authenticator
            .authorize(Some(&token))
            .expect("Authorization failed");
        assert_eq!(claims.email, "a@x.com");
    }

    #[test]
    fn test_authorize_with_invalid_credential() {
        let authenticator = authenticator();
        let token = authenticator.issue_token(&TestUser).unwrap();
        let reversed: String = token.chars().rev().collect();
        let truncated = &token[..token.len() - 5];

        for candidate in [reversed.as_str(), truncated, ""] {
            assert!(matches!(
                authenticator.authorize(Some(candidate)),
                Err(AuthenticationError::JwtError(_))
            ));
        }
    }
}
