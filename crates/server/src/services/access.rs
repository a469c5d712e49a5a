//! Request-time access control.
//!
//! A request moves through `Unauthenticated -> Authenticated -> Authorized`.
//! Each step is a separate guard that either hands the caller's claims on or
//! short-circuits with an [`AccessError`]:
//!
//! 1. [`AccessGate::bearer_token`] - pull the token out of `Authorization`
//! 2. [`TokenService::verify`] - check signature and expiry
//! 3. [`AccessGate::resolve`] - the user must still exist
//! 4. [`AccessGate::require_role`] - optional role check

use thiserror::Error;

use beverly_core::Role;

use super::token::{TokenError, TokenService};
use crate::models::session::Claims;
use crate::store::UserRepository;

/// Why a request was turned away.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum AccessError {
    /// No bearer token in the request.
    #[error("no token provided")]
    MissingToken,

    /// Signature or structure did not verify.
    #[error("invalid token")]
    InvalidToken,

    /// Token is past its expiry.
    #[error("expired token")]
    ExpiredToken,

    /// Token verified but its user no longer exists.
    #[error("token refers to a user that no longer exists")]
    StaleToken,

    /// Authenticated, but the role does not match.
    #[error("{required} access required")]
    Forbidden { required: Role },
}

impl AccessError {
    /// Whether this failure means "who are you?" rather than "not allowed".
    #[must_use]
    pub const fn is_unauthenticated(self) -> bool {
        !matches!(self, Self::Forbidden { .. })
    }
}

impl From<TokenError> for AccessError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Expired => Self::ExpiredToken,
            TokenError::Invalid | TokenError::Signing(_) => Self::InvalidToken,
        }
    }
}

/// Authenticates requests against the token service and the user table.
pub struct AccessGate<'a> {
    tokens: &'a TokenService,
    users: &'a UserRepository,
}

impl<'a> AccessGate<'a> {
    /// Create a gate over the given token service and user table.
    #[must_use]
    pub const fn new(tokens: &'a TokenService, users: &'a UserRepository) -> Self {
        Self { tokens, users }
    }

    /// Run the full authentication pipeline on an `Authorization` header.
    ///
    /// # Errors
    ///
    /// Returns `MissingToken`, `InvalidToken`, `ExpiredToken` or
    /// `StaleToken`; never `Forbidden`.
    pub async fn authenticate(&self, authorization: Option<&str>) -> Result<Claims, AccessError> {
        let token = Self::bearer_token(authorization)?;
        let claims = self.tokens.verify(token)?;
        self.resolve(claims).await
    }

    /// Extract the token from a `Bearer <token>` header value.
    ///
    /// The scheme is matched case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns `AccessError::MissingToken` if there is no usable token.
    pub fn bearer_token(authorization: Option<&str>) -> Result<&str, AccessError> {
        let (scheme, token) = authorization
            .and_then(|value| value.trim().split_once(' '))
            .ok_or(AccessError::MissingToken)?;

        let token = token.trim();
        if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
            return Err(AccessError::MissingToken);
        }
        Ok(token)
    }

    /// Check that the token's user still exists.
    ///
    /// # Errors
    ///
    /// Returns `AccessError::StaleToken` if the user is gone.
    pub async fn resolve(&self, claims: Claims) -> Result<Claims, AccessError> {
        match self.users.get_by_id(claims.id).await {
            Some(_) => Ok(claims),
            None => Err(AccessError::StaleToken),
        }
    }

    /// Require `claims` to carry exactly `role`.
    ///
    /// # Errors
    ///
    /// Returns `AccessError::Forbidden` on mismatch.
    pub fn require_role(claims: &Claims, role: Role) -> Result<(), AccessError> {
        if claims.role == role {
            Ok(())
        } else {
            Err(AccessError::Forbidden { required: role })
        }
    }
}
