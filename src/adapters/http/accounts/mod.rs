//! HTTP adapter for account endpoints.
//!
//! Public:
//! - `POST /tokens` - Exchange email and password for a bearer token
//! - `POST /users` - Register
//! - `POST /users/confirm` - Confirm with the emailed token
//! - `POST /users/confirm/start` - Resend the confirmation token
//! - `POST /users/reset` - Set a new password with the emailed token
//! - `POST /users/reset/start` - Send a reset token
//!
//! Authenticated:
//! - `GET /users/me` - Email, document status and share balance
//! - `POST /users/me/documents` - Multipart identity documents

pub mod dto;
pub mod handlers;
pub mod routes;

pub use routes::{member_routes, public_routes};
