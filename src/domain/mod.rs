//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared primitives (IDs, timestamps, principal, errors)
//! - `account` - Member records, registration, one-time tokens
//! - `ledger` - Payment entries and share balance derivation
//! - `gift` - Gift codes and their lifecycle
//! - `intake` - Stripe webhook verification and checkout metadata

pub mod account;
pub mod foundation;
pub mod gift;
pub mod intake;
pub mod ledger;
