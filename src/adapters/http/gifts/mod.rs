//! HTTP adapter for share purchase and gift endpoints.
//!
//! - `GET /gifts/:gift_id` - Printable gift card (public)
//! - `POST /users/me/checkout/sessions` - Start a share checkout
//! - `POST /users/me/use-gift-code` - Redeem a gift code

pub mod dto;
pub mod handlers;
pub mod routes;

pub use routes::{member_routes, public_routes};
