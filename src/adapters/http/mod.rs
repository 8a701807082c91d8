//! HTTP adapters - REST API implementations.
//!
//! Each area has its own HTTP adapter for endpoint exposure; `api_router`
//! assembles them and puts the bearer token middleware in front of the
//! member and admin routes.

pub mod accounts;
pub mod admin;
pub mod error;
pub mod gifts;
pub mod middleware;
pub mod router;
pub mod state;
pub mod webhooks;

// Re-export key types for convenience
pub use error::{ApiError, ErrorResponse};
pub use router::api_router;
pub use state::AppState;
