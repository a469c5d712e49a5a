//! In-memory stores.
//!
//! Nothing here is persisted: every table lives for the lifetime of the
//! process. Each store owns its records and serializes writers internally,
//! so handlers share them through [`crate::state::AppState`] without any
//! extra locking.
//!
//! ## Stores
//!
//! - `users` - Account records (sole writer of `User`)
//! - `chat` - Append-only chat exchange log
//! - `catalog` - Fixed marketplace listing

pub mod catalog;
pub mod chat;
pub mod users;

pub use catalog::Catalog;
pub use chat::ChatLog;
pub use users::UserRepository;

use thiserror::Error;

/// Errors raised by the in-memory stores.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    /// A record with the same unique key already exists.
    #[error("conflict: {0} already in use")]
    Conflict(&'static str),
}
