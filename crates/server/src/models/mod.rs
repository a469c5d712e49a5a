//! Domain models for the API.
//!
//! These are validated domain objects; the wire shapes returned by handlers
//! are the `*View`/profile structs next to them.

pub mod catalog;
pub mod chat;
pub mod session;
pub mod user;

pub use catalog::{CatalogFilter, CatalogItem, SortOrder};
pub use chat::ChatExchange;
pub use session::Claims;
pub use user::{NewUser, PublicUser, SafeUser, User, UserProfile};
