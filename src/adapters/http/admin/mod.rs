//! HTTP adapter for admin endpoints, mounted under `/admin`.
//!
//! - `GET /users` - Every member with its share balance
//! - `GET /users/:user_id` - One member's full record and balance
//! - `GET /users/:user_id/documents/:document_id` - Download an identity document
//! - `GET /csv/users` - Member export
//! - `PUT /users/:user_id/initial-shares` - Set the granted baseline
//! - `POST /users/:user_id/accept` - Mark the member accepted
//!
//! Every route requires the admin role.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use routes::admin_routes;
