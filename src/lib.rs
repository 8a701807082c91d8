//! Coop Ledger - Membership share ledger for a cooperative
//!
//! Members register, buy shares through Stripe checkout, gift shares with
//! one-time codes and upload identity documents for review. Every balance
//! is derived from the payment ledger with a single formula.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
