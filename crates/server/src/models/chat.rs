//! Chat exchange records.

use chrono::{DateTime, Utc};
use serde::Serialize;

use beverly_core::{ChatExchangeId, UserId, Username};

/// One message/response pair, appended to the chat log and never mutated.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatExchange {
    pub id: ChatExchangeId,
    pub user_id: UserId,
    pub username: Username,
    pub message: String,
    pub response: String,
    pub timestamp: DateTime<Utc>,
}
