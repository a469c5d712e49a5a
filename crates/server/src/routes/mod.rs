//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /api/health              - Liveness, uptime and version
//!
//! # Auth
//! POST /api/auth/register       - Create an account, returns a token
//! POST /api/auth/login          - Password login, returns a token
//! GET  /api/auth/me             - Caller's profile (requires auth)
//!
//! # Chat (requires auth)
//! POST /api/chat                - Send a message to the chatbot
//!
//! # Marketplace
//! GET  /api/marketplace         - Listing with ?category, ?search, ?sort
//! GET  /api/marketplace/{id}    - Single item
//!
//! # Admin (requires admin role)
//! GET  /api/admin/stats         - Aggregate counters
//! GET  /api/admin/users         - All users without password hashes
//! GET  /api/admin/chats         - Last 50 chat exchanges, newest first
//! ```
//!
//! Anything else answers 404 with the path and method echoed back.

pub mod admin;
pub mod auth;
pub mod chat;
pub mod health;
pub mod marketplace;

use axum::{
    Json, Router,
    extract::FromRequest,
    http::{Method, StatusCode, Uri},
    response::IntoResponse,
    routing::{get, post},
};
use serde_json::json;

use crate::error::AppError;
use crate::state::AppState;

/// JSON body extractor whose rejections use the API error envelope.
#[derive(Debug, FromRequest)]
#[from_request(via(Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

/// Create the full API router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/health", get(health::health))
        .nest("/api/auth", auth_routes())
        .route("/api/chat", post(chat::send))
        .nest("/api/marketplace", marketplace_routes())
        .nest("/api/admin", admin_routes())
        .fallback(not_found)
        .method_not_allowed_fallback(not_found)
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/me", get(auth::me))
}

/// Create the marketplace routes router.
pub fn marketplace_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(marketplace::index))
        .route("/{id}", get(marketplace::show))
}

/// Create the admin routes router.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/stats", get(admin::stats))
        .route("/users", get(admin::users))
        .route("/chats", get(admin::chats))
}

/// Fallback for unmatched routes.
async fn not_found(method: Method, uri: Uri) -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "success": false,
            "message": "Endpoint not found",
            "path": uri.path(),
            "method": method.as_str(),
        })),
    )
}
