//! Authentication extractors.
//!
//! Handlers opt into the access gate by taking one of these as an argument:
//!
//! ```rust,ignore
//! async fn me(RequireAuth(claims): RequireAuth) -> impl IntoResponse {
//!     format!("Hello, {}!", claims.username)
//! }
//! ```
//!
//! Verified claims are cached in the request extensions, so stacking
//! extractors (or a later `Extension<Claims>`) does not re-verify the token.

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use beverly_core::Role;

use crate::error::{AppError, set_sentry_user};
use crate::models::session::Claims;
use crate::services::access::AccessGate;
use crate::state::AppState;

/// Extractor that requires a valid bearer token for a live user.
///
/// Rejects with 401 if the token is missing, invalid, expired, or refers to
/// a user that no longer exists.
pub struct RequireAuth(pub Claims);

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        if let Some(claims) = parts.extensions.get::<Claims>() {
            return Ok(Self(claims.clone()));
        }

        let authorization = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok());

        let claims = state.gate().authenticate(authorization).await?;

        set_sentry_user(&claims.id, claims.username.as_str());
        parts.extensions.insert(claims.clone());

        Ok(Self(claims))
    }
}

/// Extractor that requires an authenticated admin.
///
/// Rejects with 401 for the same reasons as [`RequireAuth`], and with 403 if
/// the caller is authenticated but not an admin.
pub struct RequireAdmin(pub Claims);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let RequireAuth(claims) = RequireAuth::from_request_parts(parts, state).await?;
        AccessGate::require_role(&claims, Role::Admin)?;
        Ok(Self(claims))
    }
}
