//! Session token claims.

use serde::{Deserialize, Serialize};

use beverly_core::{Email, Role, UserId, Username};

use super::user::User;

/// Identity claims embedded in a signed session token.
///
/// After the access gate has verified a token, these are attached to the
/// request extensions for downstream handlers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User ID the token was issued to.
    pub id: UserId,
    /// Email at issuance time.
    pub email: Email,
    /// Username at issuance time.
    pub username: Username,
    /// Role at issuance time.
    pub role: Role,
    /// Issued at (Unix timestamp).
    pub iat: i64,
    /// Expiration time (Unix timestamp).
    pub exp: i64,
}

impl Claims {
    /// Build claims for `user` valid from `iat` until `exp`.
    #[must_use]
    pub fn for_user(user: &User, iat: i64, exp: i64) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            username: user.username.clone(),
            role: user.role,
            iat,
            exp,
        }
    }
}
