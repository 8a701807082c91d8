//! Axum router configuration for share purchase and gift endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{create_checkout, get_gift_card, use_gift_code};
use crate::adapters::http::state::AppState;

/// The gift card link is shared with the recipient, so it needs no token.
pub fn public_routes() -> Router<AppState> {
    Router::new().route("/gifts/:gift_id", get(get_gift_card))
}

pub fn member_routes() -> Router<AppState> {
    Router::new()
        .route("/users/me/checkout/sessions", post(create_checkout))
        .route("/users/me/use-gift-code", post(use_gift_code))
}
