//! Beverly Core - Shared domain types.
//!
//! This crate provides the types used across the Beverly Technologies backend:
//! - `server` - HTTP API (auth, marketplace, chat, admin views)
//! - `integration-tests` - Black-box tests against the running router
//!
//! # Architecture
//!
//! The core crate contains only types and validation - no I/O, no locking,
//! no HTTP. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for ids, emails, usernames, roles and prices

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
