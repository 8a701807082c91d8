//! Axum router configuration for webhooks.

use axum::{extract::DefaultBodyLimit, routing::post, Router};

use super::handlers::handle_stripe_webhook;
use crate::adapters::http::state::AppState;

/// Largest accepted webhook body.
pub const WEBHOOK_BODY_LIMIT: usize = 64 * 1024;

/// Webhooks carry no bearer token; the signature authenticates them.
pub fn webhook_routes() -> Router<AppState> {
    Router::new().route(
        "/stripe/webhook",
        post(handle_stripe_webhook).layer(DefaultBodyLimit::max(WEBHOOK_BODY_LIMIT)),
    )
}
