use std::sync::Arc;

use auth::PasswordHasher;

use crate::domain::user::models::User;
use crate::user::errors::UserError;
use crate::user::ports::UserRepository;

/// Checks a claimed email and presented password against the user store.
///
/// Used at login and registration only; the per-request gate never touches
/// the store.
pub struct CredentialVerifier<UR>
where
    UR: UserRepository,
{
    repository: Arc<UR>,
    password_hasher: PasswordHasher,
}

impl<UR> CredentialVerifier<UR>
where
    UR: UserRepository,
{
    pub fn new(repository: Arc<UR>) -> Self {
        Self {
            repository,
            password_hasher: PasswordHasher::new(),
        }
    }

    /// Verify an email and password pair.
    ///
    /// Argon2 verification runs on the blocking pool.
    ///
    /// # Returns
    /// The stored user on match
    ///
    /// # Errors
    /// * `InvalidInput` - Email or password is empty
    /// * `NotFoundByEmail` - No user with this email
    /// * `InvalidCredentials` - Password does not match
    /// * `DatabaseError` - Database operation failed
    pub async fn verify_login(&self, email: &str, password: &str) -> Result<User, UserError> {
        if email.is_empty() || password.is_empty() {
            return Err(UserError::InvalidInput(
                "email and password are required".to_string(),
            ));
        }

        let user = self
            .repository
            .find_by_email(email)
            .await?
            .ok_or_else(|| UserError::NotFoundByEmail(email.to_string()))?;

        let hasher = self.password_hasher;
        let hash = user.password_hash.clone();
        let candidate = password.to_string();
        let matches = tokio::task::spawn_blocking(move || hasher.verify(&hash, &candidate))
            .await
            .map_err(|e| UserError::Unknown(format!("Password verification task failed: {}", e)))?;

        if !matches {
            return Err(UserError::InvalidCredentials);
        }

        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::domain::user::models::EmailAddress;
    use crate::domain::user::models::UserId;
    use crate::domain::user::models::UserName;
    use crate::user::ports::mocks::MockTestUserRepository;

    fn stored_user(password: &str) -> User {
        User {
            id: UserId::new(),
            name: UserName::new("A".to_string()).unwrap(),
            email: EmailAddress::new("a@x.com".to_string()).unwrap(),
            password_hash: PasswordHasher::new().hash(password).unwrap(),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_verify_login_success() {
        let mut repository = MockTestUserRepository::new();
        let user = stored_user("pw1");
        let user_id = user.id;

        repository
            .expect_find_by_email()
            .withf(|email| email == "a@x.com")
            .times(1)
            .returning(move |_| Ok(Some(user.clone())));

        let verifier = CredentialVerifier::new(Arc::new(repository));

        let result = verifier.verify_login("a@x.com", "pw1").await;
        assert_eq!(result.unwrap().id, user_id);
    }

    #[tokio::test]
    async fn test_verify_login_wrong_password() {
        let mut repository = MockTestUserRepository::new();
        let user = stored_user("pw1");

        repository
            .expect_find_by_email()
            .times(1)
            .returning(move |_| Ok(Some(user.clone())));

        let verifier = CredentialVerifier::new(Arc::new(repository));

        let result = verifier.verify_login("a@x.com", "pw2").await;
        assert!(matches!(result, Err(UserError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_verify_login_unknown_email() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_find_by_email()
            .times(1)
            .returning(|_| Ok(None));

        let verifier = CredentialVerifier::new(Arc::new(repository));

        let result = verifier.verify_login("nobody@x.com", "pw1").await;
        assert!(matches!(result, Err(UserError::NotFoundByEmail(_))));
    }

    #[tokio::test]
    async fn test_verify_login_empty_input_skips_store() {
        let mut repository = MockTestUserRepository::new();
        repository.expect_find_by_email().times(0);

        let verifier = CredentialVerifier::new(Arc::new(repository));

        assert!(matches!(
            verifier.verify_login("", "pw1").await,
            Err(UserError::InvalidInput(_))
        ));
        assert!(matches!(
            verifier.verify_login("a@x.com", "").await,
            Err(UserError::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn test_verify_login_corrupt_stored_hash() {
        let mut repository = MockTestUserRepository::new();
        let mut user = stored_user("pw1");
        user.password_hash = "pw1".to_string();

        repository
            .expect_find_by_email()
            .times(1)
            .returning(move |_| Ok(Some(user.clone())));

        let verifier = CredentialVerifier::new(Arc::new(repository));

        let result = verifier.verify_login("a@x.com", "pw1").await;
        assert!(matches!(result, Err(UserError::InvalidCredentials)));
    }
}
