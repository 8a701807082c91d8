//! Payment intake domain module.
//!
//! Turns signed Stripe webhooks into ledger entries:
//!
//! 1. `webhook_verifier` authenticates the raw payload.
//! 2. `checkout_metadata` extracts the purchase from a completed checkout.
//! 3. The intake handler stores it idempotently.

mod checkout_metadata;
mod errors;
mod stripe_event;
mod webhook_verifier;

pub use checkout_metadata::{
    payment_from_event, CheckoutMetadata, METADATA_ACCOUNT_ID, METADATA_GIFT_ID, METADATA_SHARES,
};
pub use errors::IntakeError;
pub use stripe_event::{CheckoutSessionObject, StripeEvent, StripeEventData, StripeEventType};
pub use webhook_verifier::{
    sign_payload, SignatureHeader, StripeWebhookVerifier, MAX_CLOCK_SKEW_SECS,
    MAX_EVENT_AGE_SECS,
};

#[cfg(test)]
pub use stripe_event::StripeEventBuilder;
