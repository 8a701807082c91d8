//! Stripe payment provider adapter.
//!
//! Implements the `PaymentProvider` port for Stripe integration:
//! - Customer creation at registration
//! - Checkout sessions for buying shares
//!
//! Incoming webhooks are verified by `domain::intake::StripeWebhookVerifier`.
//!
//! # Security
//!
//! The API key is held in a `secrecy::SecretString` and only exposed when
//! building the basic-auth header.

mod mock_payment_provider;
mod stripe_adapter;

pub use mock_payment_provider::MockPaymentProvider;
pub use stripe_adapter::{StripeConfig, StripePaymentAdapter};
