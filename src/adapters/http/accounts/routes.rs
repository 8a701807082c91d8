//! Axum router configuration for account endpoints.

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use super::handlers::{
    confirm, create_token, get_me, register, reset_password, start_confirmation, start_reset,
    upload_documents,
};
use crate::adapters::http::state::AppState;

/// Routes reachable without a token.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/tokens", post(create_token))
        .route("/users", post(register))
        .route("/users/confirm", post(confirm))
        .route("/users/confirm/start", post(start_confirmation))
        .route("/users/reset", post(reset_password))
        .route("/users/reset/start", post(start_reset))
}

/// Routes for an authenticated member.
///
/// `document_body_limit` bounds the whole multipart body, all three files
/// together.
pub fn member_routes(document_body_limit: usize) -> Router<AppState> {
    Router::new().route("/users/me", get(get_me)).route(
        "/users/me/documents",
        post(upload_documents).layer(DefaultBodyLimit::max(document_body_limit)),
    )
}
