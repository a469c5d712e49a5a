//! User table.
//!
//! Every read-then-write (uniqueness check + insert, lookup + last-login
//! update) happens under a single write guard, so concurrent requests can
//! neither insert duplicate identities nor lose a last-login update.

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use beverly_core::{Email, Role, UserId};

use super::StoreError;
use crate::models::user::{NewUser, SafeUser, User};

/// In-memory repository for user records, in insertion order.
#[derive(Debug, Default)]
pub struct UserRepository {
    users: RwLock<Vec<User>>,
}

impl UserRepository {
    /// Create an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new user.
    ///
    /// When `new_user.role` is `None` the first user in the table becomes
    /// [`Role::Admin`] and everyone after that [`Role::User`].
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Conflict` if the email or the exact username is
    /// already taken.
    pub async fn insert(&self, new_user: NewUser, now: DateTime<Utc>) -> Result<User, StoreError> {
        let mut users = self.users.write().await;

        if users.iter().any(|u| u.email == new_user.email) {
            return Err(StoreError::Conflict("email"));
        }
        if users.iter().any(|u| u.username == new_user.username) {
            return Err(StoreError::Conflict("username"));
        }

        let role = new_user.role.unwrap_or(if users.is_empty() {
            Role::Admin
        } else {
            Role::User
        });

        let user = User {
            id: UserId::generate(),
            email: new_user.email,
            username: new_user.username,
            password_hash: new_user.password_hash,
            role,
            created_at: now,
            last_login: None,
        };
        users.push(user.clone());

        Ok(user)
    }

    /// Get a user by their (normalized) email address.
    pub async fn get_by_email(&self, email: &Email) -> Option<User> {
        self.users
            .read()
            .await
            .iter()
            .find(|u| &u.email == email)
            .cloned()
    }

    /// Get a user by their ID.
    pub async fn get_by_id(&self, id: UserId) -> Option<User> {
        self.users
            .read()
            .await
            .iter()
            .find(|u| u.id == id)
            .cloned()
    }

    /// Record a successful login.
    ///
    /// The stored timestamp only moves forward: a slower request finishing
    /// after a newer one never rolls `last_login` back. Returns the updated
    /// record, or `None` if the user no longer exists.
    pub async fn record_login(&self, id: UserId, at: DateTime<Utc>) -> Option<User> {
        let mut users = self.users.write().await;
        let user = users.iter_mut().find(|u| u.id == id)?;
        user.last_login = Some(user.last_login.map_or(at, |prev| prev.max(at)));
        Some(user.clone())
    }

    /// All users with password hashes stripped, in insertion order.
    pub async fn list_safe(&self) -> Vec<SafeUser> {
        self.users.read().await.iter().map(SafeUser::from).collect()
    }

    /// Number of users.
    pub async fn count(&self) -> usize {
        self.users.read().await.len()
    }

    /// Whether the table is empty.
    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }
}
