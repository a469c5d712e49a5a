//! Business logic services.
//!
//! Services borrow the stores held in [`crate::state::AppState`] and are
//! cheap to construct per request.

pub mod access;
pub mod auth;
pub mod chat;
pub mod token;

pub use access::{AccessError, AccessGate};
pub use auth::{AuthError, AuthService, ValidationError};
pub use chat::{MessageError, Reply, ReplyCategory};
pub use token::{TokenError, TokenService};
