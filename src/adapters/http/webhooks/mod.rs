//! HTTP adapter for payment webhooks.
//!
//! - `POST /stripe/webhook` - Stripe event delivery, authenticated by signature

pub mod handlers;
pub mod routes;

pub use routes::{webhook_routes, WEBHOOK_BODY_LIMIT};
