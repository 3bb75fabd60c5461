use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// Identity claims carried inside an access token.
///
/// A snapshot of the user taken at issuance time. Changes to the user
/// record are not reflected until a new token is issued.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IdentityClaims {
    /// Subject (user identifier)
    pub sub: String,

    /// Display name
    pub name: String,

    /// Email address
    pub email: String,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Issued at (Unix timestamp)
    pub iat: i64,
}

impl IdentityClaims {
    /// Create claims for a user issued at the given instant.
    ///
    /// # Arguments
    /// * `user_id` - Unique user identifier
    /// * `name` - Display name
    /// * `email` - Email address
    /// * `issued_at` - Issuance instant
    /// * `lifetime` - Time until the token expires
    ///
    /// # Returns
    /// Claims with `iat` set to `issued_at` and `exp` to `issued_at + lifetime`
    pub fn for_user(
        user_id: impl ToString,
        name: impl Into<String>,
        email: impl Into<String>,
        issued_at: DateTime<Utc>,
        lifetime: Duration,
    ) -> Self {
        Self {
            sub: user_id.to_string(),
            name: name.into(),
            email: email.into(),
            exp: (issued_at + lifetime).timestamp(),
            iat: issued_at.timestamp(),
        }
    }

    /// Set expiration (Unix timestamp).
    pub fn with_expiration(mut self, exp: i64) -> Self {
        self.exp = exp;
        self
    }

    /// Check if the claims are expired at `current_timestamp`.
    ///
    /// A token expiring exactly at `current_timestamp` is still valid.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        self.exp < current_timestamp
    }

    /// Expiration as a UTC instant, if representable.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }
}
