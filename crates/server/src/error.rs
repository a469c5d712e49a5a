//! Unified error handling with Sentry integration.
//!
//! Every handler returns `Result<T, AppError>`. Service-level errors convert
//! into `AppError` with `?`, and `IntoResponse` turns them into the JSON
//! envelope `{ "success": false, "message": ... }`.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use beverly_core::Role;

use crate::services::access::AccessError;
use crate::services::auth::AuthError;
use crate::services::chat::MessageError;
use crate::services::token::TokenError;

/// Message returned for every missing, invalid, expired or stale token.
const INVALID_TOKEN_MESSAGE: &str = "Invalid or expired token.";

/// The real cause of a 500, attached to the response so development builds
/// can surface it (see [`crate::middleware::expose_error_detail`]).
#[derive(Debug, Clone)]
pub struct ErrorDetail(pub String);

/// Application-level error type for the API.
#[derive(Debug, Error)]
pub enum AppError {
    /// Credential store operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Request was turned away by the access gate.
    #[error("Access denied: {0}")]
    Access(#[from] AccessError),

    /// Token could not be issued.
    #[error("Token error: {0}")]
    Token(#[from] TokenError),

    /// Chat message failed validation.
    #[error("Invalid message: {0}")]
    Message(#[from] MessageError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Request body over the size limit.
    #[error("Payload too large")]
    PayloadTooLarge,

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    fn is_internal(&self) -> bool {
        matches!(
            self,
            Self::Internal(_) | Self::Token(_) | Self::Auth(AuthError::PasswordHash(_))
        )
    }

    fn status(&self) -> StatusCode {
        match self {
            Self::Auth(err) => match err {
                AuthError::Validation(_) => StatusCode::BAD_REQUEST,
                AuthError::UserAlreadyExists => StatusCode::CONFLICT,
                AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
                AuthError::PasswordHash(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Access(err) if err.is_unauthenticated() => StatusCode::UNAUTHORIZED,
            Self::Access(_) => StatusCode::FORBIDDEN,
            Self::Token(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Message(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
        }
    }

    /// The client-facing message. Never distinguishes a wrong password from
    /// an unknown email, or a bad signature from an expired token.
    fn message(&self) -> String {
        match self {
            Self::Auth(err) => match err {
                AuthError::Validation(v) => v.to_string(),
                AuthError::UserAlreadyExists => {
                    "User with this email or username already exists".to_string()
                }
                AuthError::InvalidCredentials => "Invalid email or password".to_string(),
                AuthError::PasswordHash(_) => "Internal server error".to_string(),
            },
            Self::Access(err) => match err {
                AccessError::MissingToken => "Access denied. No token provided.".to_string(),
                AccessError::InvalidToken | AccessError::ExpiredToken | AccessError::StaleToken => {
                    INVALID_TOKEN_MESSAGE.to_string()
                }
                AccessError::Forbidden { required } => {
                    let role = match required {
                        Role::Admin => "Admin",
                        Role::User => "User",
                    };
                    format!("{role} access required")
                }
            },
            Self::Message(err) => err.to_string(),
            Self::NotFound(msg) | Self::BadRequest(msg) => msg.clone(),
            Self::PayloadTooLarge => "Request body too large".to_string(),
            Self::Token(_) | Self::Internal(_) => "Internal server error".to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.message();

        if self.is_internal() {
            // Capture server errors to Sentry
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );

            let body = json!({
                "success": false,
                "message": message,
                "error": "Something went wrong",
            });
            let mut response = (status, Json(body)).into_response();
            response
                .extensions_mut()
                .insert(ErrorDetail(self.to_string()));
            return response;
        }

        if let Self::Access(err) = &self {
            tracing::debug!(reason = %err, "Access denied");
        }

        (status, Json(json!({ "success": false, "message": message }))).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            return Self::PayloadTooLarge;
        }
        Self::BadRequest(format!("Invalid request body: {}", rejection.body_text()))
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context from a user ID.
///
/// Called once the access gate has authenticated a request.
pub fn set_sentry_user(user_id: &impl ToString, username: &str) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            username: Some(username.to_string()),
            ..Default::default()
        }));
    });
}
