//! Chatbot route handler.

use axum::{Json, extract::State};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::ApiJson;
use crate::error::Result;
use crate::middleware::RequireAuth;
use crate::services::chat::{self, validate_message};
use crate::state::AppState;

/// How much of a message is written to the logs.
const LOG_PREVIEW_CHARS: usize = 50;

/// Chat request body.
///
/// `message` is kept as raw JSON so a non-string gets a specific error.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: Option<Value>,
}

/// Chatbot reply.
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub success: bool,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

/// Send a message to the chatbot.
///
/// The message is validated before anything is generated or logged.
pub async fn send(
    State(state): State<AppState>,
    RequireAuth(claims): RequireAuth,
    ApiJson(body): ApiJson<ChatRequest>,
) -> Result<Json<ChatResponse>> {
    let message = validate_message(body.message.as_ref())?;

    tracing::info!(
        user_id = %claims.id,
        username = %claims.username,
        preview = %chat::preview(message, LOG_PREVIEW_CHARS),
        "Chat message"
    );

    let reply = chat::respond(claims.username.as_str(), message);
    tokio::time::sleep(state.config().chat_delay.sample()).await;

    state
        .chats()
        .record(claims.id, claims.username, message.to_string(), reply.text.clone())
        .await;

    tracing::debug!(category = reply.category.as_str(), "Chat reply sent");

    Ok(Json(ChatResponse {
        success: true,
        message: reply.text,
        timestamp: Utc::now(),
    }))
}
