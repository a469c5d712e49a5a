//! HTTP middleware stack.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. CORS
//! 3. `TraceLayer` (`http_request` span per request)
//! 4. Request ID (add unique ID to each request)
//! 5. Request body limit
//! 6. Error detail exposure (development only)
//! 7. Panic catcher
//!
//! Authentication is not a layer: handlers opt in with the [`RequireAuth`]
//! and [`RequireAdmin`] extractors.

pub mod auth;
pub mod error_detail;
pub mod request_id;

pub use auth::{RequireAdmin, RequireAuth};
pub use error_detail::{expose_error_detail, panic_response};
pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
