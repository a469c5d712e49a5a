//! Authentication service.
//!
//! Owns password hashing and the register/login flows on top of
//! [`UserRepository`]. Argon2 runs on the blocking thread pool so a burst of
//! logins never stalls the async runtime.

mod error;

pub use error::{AuthError, ValidationError};

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::Utc;

use beverly_core::{Email, Role, UserId, Username};

use crate::models::user::{NewUser, SafeUser, User};
use crate::store::{StoreError, UserRepository};

/// Minimum password length.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Maximum password length.
pub const MAX_PASSWORD_LENGTH: usize = 128;

/// Well-formed hash checked against when the email is unknown, so a miss
/// costs the same as a wrong password.
const DUMMY_HASH: &str = "$argon2id$v=19$m=19456,t=2,p=1$c29tZXNhbHRzb21lc2FsdA$QUFBQUFBQUFBQUFBQUFBQUFBQUFBQUFBQUFBQUFBQUE";

/// Accounts inserted by [`AuthService::seed_defaults`].
pub const DEFAULT_ACCOUNTS: [(&str, &str, &str, Role); 2] = [
    ("admin@beverlytech.ai", "admin", "admin123", Role::Admin),
    ("demo@beverlytech.ai", "demo", "demo123", Role::User),
];

/// Authentication service.
///
/// Handles registration, password login and the read-only lookups used by
/// the access gate and admin views.
pub struct AuthService<'a> {
    users: &'a UserRepository,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(users: &'a UserRepository) -> Self {
        Self { users }
    }

    /// Register a new account.
    ///
    /// Checks run in a fixed order and the first failure is reported:
    /// missing fields, username length, email shape, password length. The
    /// first account ever registered becomes an admin.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Validation` if any field is missing or invalid.
    /// Returns `AuthError::UserAlreadyExists` if the email or username is taken.
    /// Returns `AuthError::PasswordHash` if hashing fails.
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        username: &str,
    ) -> Result<User, AuthError> {
        if email.is_empty() || password.is_empty() || username.is_empty() {
            return Err(ValidationError::MissingRegistrationFields.into());
        }

        let username = Username::parse(username).map_err(ValidationError::from)?;
        let email = Email::parse(email).map_err(|_| ValidationError::InvalidEmail)?;
        validate_password(password)?;

        let password_hash = hash_password(password.to_owned()).await?;

        let user = self
            .users
            .insert(
                NewUser {
                    email,
                    username,
                    password_hash,
                    role: None,
                },
                Utc::now(),
            )
            .await
            .map_err(|StoreError::Conflict(_)| AuthError::UserAlreadyExists)?;

        tracing::info!(user_id = %user.id, role = %user.role, "User registered");
        Ok(user)
    }

    /// Login with email and password.
    ///
    /// Unknown emails and wrong passwords fail identically, after the same
    /// amount of hashing work. On success `last_login` is advanced.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Validation` if either field is missing.
    /// Returns `AuthError::InvalidCredentials` if the email/password is wrong.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<User, AuthError> {
        if email.is_empty() || password.is_empty() {
            return Err(ValidationError::MissingLoginFields.into());
        }

        let user = match Email::parse(email) {
            Ok(email) => self.users.get_by_email(&email).await,
            Err(_) => None,
        };
        let hash = user
            .as_ref()
            .map_or_else(|| DUMMY_HASH.to_owned(), |u| u.password_hash.clone());

        let verified = verify_password(password.to_owned(), hash).await?;

        match user {
            Some(user) if verified => {
                let user = self
                    .users
                    .record_login(user.id, Utc::now())
                    .await
                    .ok_or(AuthError::InvalidCredentials)?;
                tracing::info!(user_id = %user.id, "Login successful");
                Ok(user)
            }
            _ => Err(AuthError::InvalidCredentials),
        }
    }

    /// Look up a user by ID.
    pub async fn find_by_id(&self, id: UserId) -> Option<User> {
        self.users.get_by_id(id).await
    }

    /// All users without password hashes, in registration order.
    pub async fn list_safe(&self) -> Vec<SafeUser> {
        self.users.list_safe().await
    }

    /// Number of registered users.
    pub async fn count(&self) -> usize {
        self.users.count().await
    }

    /// Insert the default admin and demo accounts into an empty table.
    ///
    /// Returns `false` without touching anything if users already exist.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::PasswordHash` if hashing fails, or
    /// `AuthError::UserAlreadyExists` if a concurrent registration raced
    /// the seed.
    pub async fn seed_defaults(&self) -> Result<bool, AuthError> {
        if !self.users.is_empty().await {
            return Ok(false);
        }

        for (email, username, password, role) in DEFAULT_ACCOUNTS {
            let email = Email::parse(email).map_err(|_| ValidationError::InvalidEmail)?;
            let username = Username::parse(username).map_err(ValidationError::from)?;
            let password_hash = hash_password(password.to_owned()).await?;

            self.users
                .insert(
                    NewUser {
                        email,
                        username,
                        password_hash,
                        role: Some(role),
                    },
                    Utc::now(),
                )
                .await
                .map_err(|StoreError::Conflict(_)| AuthError::UserAlreadyExists)?;
        }

        Ok(true)
    }
}

/// Validate password length, counted in characters.
///
/// # Errors
///
/// Returns `ValidationError::PasswordTooShort` or `PasswordTooLong`.
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    let len = password.chars().count();
    if len < MIN_PASSWORD_LENGTH {
        return Err(ValidationError::PasswordTooShort {
            min: MIN_PASSWORD_LENGTH,
        });
    }
    if len > MAX_PASSWORD_LENGTH {
        return Err(ValidationError::PasswordTooLong {
            max: MAX_PASSWORD_LENGTH,
        });
    }
    Ok(())
}

/// Hash a password using Argon2id with a random salt.
async fn hash_password(password: String) -> Result<String, AuthError> {
    tokio::task::spawn_blocking(move || {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AuthError::PasswordHash(e.to_string()))
    })
    .await
    .map_err(|e| AuthError::PasswordHash(e.to_string()))?
}

/// Verify a password against a PHC hash string.
async fn verify_password(password: String, hash: String) -> Result<bool, AuthError> {
    tokio::task::spawn_blocking(move || {
        let parsed_hash =
            PasswordHash::new(&hash).map_err(|e| AuthError::PasswordHash(e.to_string()))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    })
    .await
    .map_err(|e| AuthError::PasswordHash(e.to_string()))?
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_register_then_authenticate() {
        let repo = UserRepository::new();
        let auth = AuthService::new(&repo);

        let alice = auth.register("a@x.com", "secret1", "alice").await.unwrap();
        assert_eq!(alice.role, Role::Admin);
        assert!(alice.password_hash.starts_with("$argon2id$"));
        assert!(alice.last_login.is_none());

        let bob = auth.register("b@x.com", "secret2", "bob").await.unwrap();
        assert_eq!(bob.role, Role::User);

        let logged_in = auth.authenticate("A@X.com", "secret1").await.unwrap();
        assert_eq!(logged_in.id, alice.id);
        assert!(logged_in.last_login.is_some());
    }

    #[tokio::test]
    async fn test_register_validation_order() {
        let repo = UserRepository::new();
        let auth = AuthService::new(&repo);

        let err = |r: Result<User, AuthError>| match r {
            Err(AuthError::Validation(v)) => v,
            other => panic!("expected validation error, got {other:?}"),
        };

        assert_eq!(
            err(auth.register("", "secret1", "alice").await),
            ValidationError::MissingRegistrationFields
        );
        // Everything is wrong: username is reported first
        assert_eq!(
            err(auth.register("not-an-email", "123", "al").await),
            ValidationError::UsernameTooShort { min: 3 }
        );
        assert_eq!(
            err(auth.register("not-an-email", "123", "alice").await),
            ValidationError::InvalidEmail
        );
        assert_eq!(
            err(auth.register("a@x.com", "12345", "alice").await),
            ValidationError::PasswordTooShort { min: 6 }
        );
        assert_eq!(
            err(auth.register("a@x.com", &"p".repeat(129), "alice").await),
            ValidationError::PasswordTooLong { max: 128 }
        );
        assert_eq!(repo.count().await, 0);
    }

    #[tokio::test]
    async fn test_register_conflict_on_email_case() {
        let repo = UserRepository::new();
        let auth = AuthService::new(&repo);

        auth.register("a@x.com", "secret1", "alice").await.unwrap();
        let result = auth.register("A@X.COM", "secret1", "alice2").await;
        assert!(matches!(result, Err(AuthError::UserAlreadyExists)));
    }

    #[tokio::test]
    async fn test_wrong_password_and_unknown_email_fail_the_same_way() {
        let repo = UserRepository::new();
        let auth = AuthService::new(&repo);
        let alice = auth.register("a@x.com", "secret1", "alice").await.unwrap();

        let wrong = auth.authenticate("a@x.com", "wrong-password").await.unwrap_err();
        let unknown = auth.authenticate("nobody@x.com", "secret1").await.unwrap_err();
        let malformed = auth.authenticate("nobody", "secret1").await.unwrap_err();

        assert!(matches!(wrong, AuthError::InvalidCredentials));
        assert!(matches!(unknown, AuthError::InvalidCredentials));
        assert!(matches!(malformed, AuthError::InvalidCredentials));
        assert_eq!(wrong.to_string(), unknown.to_string());

        // Failed attempts never touch last_login
        let stored = auth.find_by_id(alice.id).await.unwrap();
        assert!(stored.last_login.is_none());
    }

    #[tokio::test]
    async fn test_last_login_is_monotonic() {
        let repo = UserRepository::new();
        let auth = AuthService::new(&repo);
        auth.register("a@x.com", "secret1", "alice").await.unwrap();

        let before = Utc::now();
        let first = auth.authenticate("a@x.com", "secret1").await.unwrap();
        let second = auth.authenticate("a@x.com", "secret1").await.unwrap();
        let after = Utc::now();

        let first_login = first.last_login.unwrap();
        let second_login = second.last_login.unwrap();
        assert!(first_login >= before);
        assert!(second_login >= first_login);
        assert!(second_login <= after);
    }

    #[tokio::test]
    async fn test_login_requires_both_fields() {
        let repo = UserRepository::new();
        let auth = AuthService::new(&repo);
        let result = auth.authenticate("a@x.com", "").await;
        assert!(matches!(
            result,
            Err(AuthError::Validation(ValidationError::MissingLoginFields))
        ));
    }

    #[tokio::test]
    async fn test_seed_defaults_only_into_empty_table() {
        let repo = UserRepository::new();
        let auth = AuthService::new(&repo);

        assert!(auth.seed_defaults().await.unwrap());
        assert_eq!(auth.count().await, 2);
        assert!(!auth.seed_defaults().await.unwrap());
        assert_eq!(auth.count().await, 2);

        let users = auth.list_safe().await;
        assert_eq!(users[0].role, Role::Admin);
        assert_eq!(users[1].role, Role::User);

        let demo = auth.authenticate("demo@beverlytech.ai", "demo123").await.unwrap();
        assert_eq!(demo.username.as_str(), "demo");

        // Seeded admin does not make the next registration an admin
        let next = auth.register("c@x.com", "secret3", "carol").await.unwrap();
        assert_eq!(next.role, Role::User);
    }

    #[test]
    fn test_dummy_hash_is_well_formed() {
        assert!(PasswordHash::new(DUMMY_HASH).is_ok());
    }
}
