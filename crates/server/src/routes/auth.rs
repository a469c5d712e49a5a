//! Authentication route handlers.
//!
//! Registration and login both answer with a fresh session token and the
//! public view of the account.

use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};

use super::ApiJson;
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::models::user::{PublicUser, UserProfile};
use crate::state::AppState;

// =============================================================================
// Request Types
// =============================================================================

/// Registration request body.
///
/// Fields are optional so a missing one is reported as a validation error
/// rather than a deserialization failure.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub username: Option<String>,
}

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

// =============================================================================
// Response Types
// =============================================================================

/// Token issued on registration or login.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub success: bool,
    pub message: &'static str,
    pub token: String,
    pub user: PublicUser,
}

/// The caller's own profile.
#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub success: bool,
    pub user: UserProfile,
}

// =============================================================================
// Handlers
// =============================================================================

/// Create an account.
pub async fn register(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>)> {
    let user = state
        .auth()
        .register(
            body.email.as_deref().unwrap_or_default(),
            body.password.as_deref().unwrap_or_default(),
            body.username.as_deref().unwrap_or_default(),
        )
        .await?;

    let token = state.tokens().issue(&user)?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            success: true,
            message: "Registration successful",
            token,
            user: PublicUser::from(&user),
        }),
    ))
}

/// Password login.
pub async fn login(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<LoginRequest>,
) -> Result<Json<AuthResponse>> {
    let user = state
        .auth()
        .authenticate(
            body.email.as_deref().unwrap_or_default(),
            body.password.as_deref().unwrap_or_default(),
        )
        .await?;

    let token = state.tokens().issue(&user)?;

    Ok(Json(AuthResponse {
        success: true,
        message: "Login successful",
        token,
        user: PublicUser::from(&user),
    }))
}

/// The authenticated caller's profile.
pub async fn me(
    State(state): State<AppState>,
    RequireAuth(claims): RequireAuth,
) -> Result<Json<MeResponse>> {
    let user = state
        .auth()
        .find_by_id(claims.id)
        .await
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(Json(MeResponse {
        success: true,
        user: UserProfile::from(&user),
    }))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    use crate::routes::test_support::{app, register, send};

    #[tokio::test]
    async fn test_register_login_scenario() {
        let (app, _) = app();

        let (status, alice) = send(
            &app,
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({"email": "a@x.com", "password": "secret1", "username": "alice"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(alice["success"], true);
        assert_eq!(alice["user"]["role"], "admin");
        assert!(alice["user"].get("password_hash").is_none());

        let (status, bob) = send(
            &app,
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({"email": "b@x.com", "password": "secret2", "username": "bob"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(bob["user"]["role"], "user");

        let (status, login) = send(
            &app,
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({"email": "A@X.com", "password": "secret1"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(login["user"]["id"], alice["user"]["id"]);
        assert_eq!(login["user"]["email"], "a@x.com");
    }

    #[tokio::test]
    async fn test_register_validation_and_conflict() {
        let (app, _) = app();
        let app = &app;
        let post = move |body| send(app, Method::POST, "/api/auth/register", None, Some(body));

        let (status, body) = post(json!({"email": "a@x.com", "password": "secret1"})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Please provide email, password, and username");

        let (status, body) =
            post(json!({"email": "a@x.com", "password": "secret1", "username": "al"})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Username must be at least 3 characters");

        let (status, body) =
            post(json!({"email": "a@x", "password": "secret1", "username": "alice"})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Please provide a valid email address");

        let (status, body) =
            post(json!({"email": "a@x.com", "password": "short", "username": "alice"})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Password must be at least 6 characters long");

        let (status, _) =
            post(json!({"email": "a@x.com", "password": "secret1", "username": "alice"})).await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) =
            post(json!({"email": "A@x.com", "password": "secret1", "username": "other"})).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["message"], "User with this email or username already exists");

        let (status, _) =
            post(json!({"email": "new@x.com", "password": "secret1", "username": "alice"})).await;
        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_malformed_body_is_bad_request() {
        let (app, _) = app();
        let (status, body) = send(
            &app,
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({"email": 42, "password": "secret1"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert!(
            body["message"]
                .as_str()
                .unwrap()
                .starts_with("Invalid request body")
        );
    }

    #[tokio::test]
    async fn test_login_failures_are_indistinguishable() {
        let (app, _) = app();
        register(&app, "a@x.com", "secret1", "alice").await;

        let (wrong_status, wrong) = send(
            &app,
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({"email": "a@x.com", "password": "nope-nope"})),
        )
        .await;
        let (unknown_status, unknown) = send(
            &app,
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({"email": "ghost@x.com", "password": "secret1"})),
        )
        .await;

        assert_eq!(wrong_status, StatusCode::UNAUTHORIZED);
        assert_eq!(unknown_status, StatusCode::UNAUTHORIZED);
        assert_eq!(wrong, unknown);
        assert_eq!(wrong["message"], "Invalid email or password");

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({"email": "a@x.com"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Please provide email and password");
    }

    #[tokio::test]
    async fn test_me() {
        let (app, _) = app();
        let token = register(&app, "a@x.com", "secret1", "alice").await;

        let (status, body) = send(&app, Method::GET, "/api/auth/me", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["user"]["username"], "alice");
        assert!(body["user"]["createdAt"].is_string());

        let (status, body) = send(&app, Method::GET, "/api/auth/me", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "Access denied. No token provided.");

        let (status, body) =
            send(&app, Method::GET, "/api/auth/me", Some("not-a-token"), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "Invalid or expired token.");
    }
}
