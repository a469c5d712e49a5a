//! Application state shared across handlers.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::ServerConfig;
use crate::services::{AccessGate, AuthService, TokenService};
use crate::store::{Catalog, ChatLog, UserRepository};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`. Each store synchronizes its
/// own writers, so handlers only ever need a shared reference.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ServerConfig,
    users: UserRepository,
    chats: ChatLog,
    catalog: Catalog,
    tokens: TokenService,
    started_at: Instant,
}

impl AppState {
    /// Create a new application state with empty user and chat tables and
    /// the built-in catalog.
    #[must_use]
    pub fn new(config: ServerConfig) -> Self {
        Self::with_catalog(config, Catalog::seeded())
    }

    /// Create a new application state with a specific catalog.
    #[must_use]
    pub fn with_catalog(config: ServerConfig, catalog: Catalog) -> Self {
        let tokens = TokenService::new(&config.jwt_secret);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                users: UserRepository::new(),
                chats: ChatLog::new(),
                catalog,
                tokens,
                started_at: Instant::now(),
            }),
        }
    }

    /// Get a reference to the server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.inner.config
    }

    /// Get a reference to the chat log.
    #[must_use]
    pub fn chats(&self) -> &ChatLog {
        &self.inner.chats
    }

    /// Get a reference to the marketplace catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    /// Get a reference to the token service.
    #[must_use]
    pub fn tokens(&self) -> &TokenService {
        &self.inner.tokens
    }

    /// Credential store operations over the user table.
    #[must_use]
    pub fn auth(&self) -> AuthService<'_> {
        AuthService::new(&self.inner.users)
    }

    /// The access gate for bearer-token requests.
    #[must_use]
    pub fn gate(&self) -> AccessGate<'_> {
        AccessGate::new(&self.inner.tokens, &self.inner.users)
    }

    /// Time since the state was created.
    #[must_use]
    pub fn uptime(&self) -> Duration {
        self.inner.started_at.elapsed()
    }
}
