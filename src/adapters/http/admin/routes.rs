//! Axum router configuration for admin endpoints.

use axum::{
    routing::{get, post, put},
    Router,
};

use super::handlers::{
    accept_member, export_members_csv, get_document, get_member, grant_initial_shares,
    list_members,
};
use crate::adapters::http::state::AppState;

/// Admin routes, relative to the `/admin` mount point.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_members))
        .route("/users/:user_id", get(get_member))
        .route(
            "/users/:user_id/documents/:document_id",
            get(get_document),
        )
        .route("/users/:user_id/initial-shares", put(grant_initial_shares))
        .route("/users/:user_id/accept", post(accept_member))
        .route("/csv/users", get(export_members_csv))
}
