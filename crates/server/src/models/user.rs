//! User domain types.
//!
//! `User` holds the password hash and is never serialized directly. Handlers
//! convert it into one of the views below.

use chrono::{DateTime, Utc};
use serde::Serialize;

use beverly_core::{Email, Role, UserId, Username};

/// A registered account.
#[derive(Clone)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Case-normalized email address.
    pub email: Email,
    /// Display name, unique by exact match.
    pub username: Username,
    /// Argon2 PHC string.
    pub password_hash: String,
    /// Account role.
    pub role: Role,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
    /// Last successful password login.
    pub last_login: Option<DateTime<Utc>>,
}

impl std::fmt::Debug for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("username", &self.username)
            .field("password_hash", &"[REDACTED]")
            .field("role", &self.role)
            .field("created_at", &self.created_at)
            .field("last_login", &self.last_login)
            .finish()
    }
}

/// A user about to be inserted into the user table.
#[derive(Clone)]
pub struct NewUser {
    pub email: Email,
    pub username: Username,
    pub password_hash: String,
    /// Explicit role for seeded accounts; `None` lets the table decide.
    pub role: Option<Role>,
}

/// Identity returned alongside a freshly issued token.
#[derive(Debug, Clone, Serialize)]
pub struct PublicUser {
    pub id: UserId,
    pub email: Email,
    pub username: Username,
    pub role: Role,
}

impl From<&User> for PublicUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            username: user.username.clone(),
            role: user.role,
        }
    }
}

/// The caller's own profile (`GET /api/auth/me`).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: UserId,
    pub email: Email,
    pub username: Username,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            username: user.username.clone(),
            role: user.role,
            created_at: user.created_at,
        }
    }
}

/// A user record with the password hash stripped (admin listing).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SafeUser {
    pub id: UserId,
    pub email: Email,
    pub username: Username,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}

impl From<&User> for SafeUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            username: user.username.clone(),
            role: user.role,
            created_at: user.created_at,
            last_login: user.last_login,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sample() -> User {
        User {
            id: UserId::generate(),
            email: Email::parse("alice@example.com").unwrap(),
            username: Username::parse("alice").unwrap(),
            password_hash: "$argon2id$v=19$not-a-real-hash".to_string(),
            role: Role::Admin,
            created_at: Utc::now(),
            last_login: None,
        }
    }

    #[test]
    fn test_debug_redacts_password_hash() {
        let debug_output = format!("{:?}", sample());
        assert!(debug_output.contains("alice@example.com"));
        assert!(!debug_output.contains("argon2id"));
    }

    #[test]
    fn test_safe_user_has_no_hash_and_uses_camel_case() {
        let json = serde_json::to_value(SafeUser::from(&sample())).unwrap();
        assert!(json.get("password_hash").is_none());
        assert!(json.get("passwordHash").is_none());
        assert!(json.get("createdAt").is_some());
        assert!(json["lastLogin"].is_null());
        assert_eq!(json["role"], "admin");
    }

    #[test]
    fn test_public_user_shape() {
        let json = serde_json::to_value(PublicUser::from(&sample())).unwrap();
        let mut keys: Vec<_> = json.as_object().unwrap().keys().cloned().collect();
        keys.sort();
        assert_eq!(keys, ["email", "id", "role", "username"]);
    }
}
