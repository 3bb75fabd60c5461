//! Authentication utilities library
//!
//! Provides the credential layer used by the user service:
//! - Password hashing (Argon2id)
//! - RS256 key pair loading
//! - Signed token issuance and validation
//! - Request authorization
//!
//! Services implement [`TokenSubject`] for their own user type and keep
//! request plumbing (headers, cookies) on their side.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify(&hash, "my_password"));
//! ```
//!
//! ## Tokens
//! ```no_run
//! use std::path::PathBuf;
//! use std::sync::Arc;
//!
//! use auth::{Authenticator, KeyMaterial, KeySource, TokenSubject};
//!
//! struct User;
//!
//! impl TokenSubject for User {
//!     fn subject_id(&self) -> String { "42".to_string() }
//!     fn display_name(&self) -> &str { "alice" }
//!     fn email(&self) -> &str { "alice@example.com" }
//! }
//!
//! let keys = KeyMaterial::load(
//!     &KeySource::File(PathBuf::from("keys/app.rsa")),
//!     &KeySource::File(PathBuf::from("keys/app.rsa.pub")),
//! )
//! .unwrap();
//!
//! let auth = Authenticator::new(Arc::new(keys), chrono::Duration::hours(24));
//! let token = auth.issue_token(&User).unwrap();
//! let claims = auth.authorize(Some(&token)).unwrap();
//! assert_eq!(claims.email, "alice@example.com");
//! ```

pub mod authenticator;
pub mod jwt;
pub mod password;

// Re-export commonly used items
pub use authenticator::AuthenticationError;
pub use authenticator::Authenticator;
pub use authenticator::TokenSubject;
pub use authenticator::DEFAULT_TOKEN_LIFETIME_MINUTES;
pub use jwt::IdentityClaims;
pub use jwt::JwtError;
pub use jwt::KeyError;
pub use jwt::KeyMaterial;
pub use jwt::KeySource;
pub use jwt::TokenCodec;
pub use password::PasswordError;
pub use password::PasswordHasher;
