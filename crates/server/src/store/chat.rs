//! Append-only chat exchange log.

use chrono::Utc;
use tokio::sync::RwLock;

use beverly_core::{ChatExchangeId, UserId, Username};

use crate::models::chat::ChatExchange;

/// In-memory log of chat exchanges, in insertion order.
///
/// Entries are only ever appended; nothing is mutated or removed. Input
/// validation is the caller's job.
#[derive(Debug, Default)]
pub struct ChatLog {
    entries: RwLock<Vec<ChatExchange>>,
}

impl ChatLog {
    /// Create an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an exchange with a fresh ID and the current timestamp.
    pub async fn record(
        &self,
        user_id: UserId,
        username: Username,
        message: String,
        response: String,
    ) -> ChatExchange {
        let exchange = ChatExchange {
            id: ChatExchangeId::generate(),
            user_id,
            username,
            message,
            response,
            timestamp: Utc::now(),
        };
        self.entries.write().await.push(exchange.clone());
        exchange
    }

    /// The last `limit` entries, oldest first unless `most_recent_first`.
    pub async fn recent(&self, limit: usize, most_recent_first: bool) -> Vec<ChatExchange> {
        let entries = self.entries.read().await;
        let start = entries.len().saturating_sub(limit);
        let tail = entries.get(start..).unwrap_or_default();
        if most_recent_first {
            tail.iter().rev().cloned().collect()
        } else {
            tail.to_vec()
        }
    }

    /// Number of recorded exchanges.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Whether nothing has been recorded yet.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}
