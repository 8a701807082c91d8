//! HTTP middleware for axum.
//!
//! This module contains middleware layers for cross-cutting concerns:
//!
//! - `auth` - Bearer token middleware and the principal extractors

pub mod auth;

pub use auth::{auth_middleware, AuthState, RequireAdmin, RequireAuth};
