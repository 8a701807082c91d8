//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `postgres` - Accounts, ledger, payments and gifts in PostgreSQL
//! - `memory` - The same persistence ports in memory, for tests and local runs
//! - `stripe` - Customers and checkout sessions
//! - `auth` - JWT bearer tokens and Argon2 password hashing
//! - `email` - Mailgun notifications
//! - `storage` - Identity documents on the local filesystem
//! - `card` - SVG gift cards
//! - `http` - The axum REST API

pub mod auth;
pub mod card;
pub mod email;
pub mod http;
pub mod memory;
pub mod postgres;
pub mod storage;
pub mod stripe;
