//! Admin-only aggregate views.

use axum::{Json, extract::State};
use serde::Serialize;

use beverly_core::{Price, Username};

use crate::middleware::RequireAdmin;
use crate::models::chat::ChatExchange;
use crate::models::user::SafeUser;
use crate::state::AppState;

/// How many recent exchanges the stats counter looks at.
const STATS_RECENT_CHATS: usize = 20;

/// How many exchanges the chat view returns.
const CHAT_VIEW_LIMIT: usize = 50;

/// Aggregate counters.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminStats {
    pub total_users: usize,
    pub total_items: usize,
    pub total_sales: u64,
    pub total_revenue: Price,
    pub recent_chats: usize,
    /// Username of the admin asking.
    pub admin_user: Username,
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub success: bool,
    pub stats: AdminStats,
}

#[derive(Debug, Serialize)]
pub struct UsersResponse {
    pub success: bool,
    pub users: Vec<SafeUser>,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct ChatsResponse {
    pub success: bool,
    pub chats: Vec<ChatExchange>,
    pub count: usize,
}

/// Aggregate counters across users, catalog and chat log.
pub async fn stats(State(state): State<AppState>, RequireAdmin(claims): RequireAdmin) -> Json<StatsResponse> {
    let catalog = state.catalog();

    Json(StatsResponse {
        success: true,
        stats: AdminStats {
            total_users: state.auth().count().await,
            total_items: catalog.len(),
            total_sales: catalog.total_sales(),
            total_revenue: catalog.total_revenue(),
            recent_chats: state.chats().len().await.min(STATS_RECENT_CHATS),
            admin_user: claims.username,
        },
    })
}

/// Every user, without password hashes.
pub async fn users(State(state): State<AppState>, RequireAdmin(_): RequireAdmin) -> Json<UsersResponse> {
    let users = state.auth().list_safe().await;

    Json(UsersResponse {
        success: true,
        count: users.len(),
        users,
    })
}

/// The most recent chat exchanges, newest first.
pub async fn chats(State(state): State<AppState>, RequireAdmin(_): RequireAdmin) -> Json<ChatsResponse> {
    let chats = state.chats().recent(CHAT_VIEW_LIMIT, true).await;

    Json(ChatsResponse {
        success: true,
        count: chats.len(),
        chats,
    })
}
