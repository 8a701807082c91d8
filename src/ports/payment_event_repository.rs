//! PaymentEventRepository port - idempotent storage of ledger entries.
//!
//! Stripe may deliver the same webhook multiple times due to:
//! - Network timeouts
//! - 5xx response from our endpoint (triggers retry)
//! - Our endpoint returning success but Stripe not receiving it
//!
//! The processor's event id is the idempotency key. Implementations must rely
//! on a uniqueness constraint (`ON CONFLICT DO NOTHING`), never on a prior
//! existence check, so concurrent deliveries converge on one stored row.

use async_trait::async_trait;

use crate::domain::foundation::DomainError;
use crate::domain::ledger::{NewPaymentEvent, PaymentEvent};

/// Result of attempting to record a payment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordOutcome {
    /// First delivery; the entry is now in the ledger.
    Inserted(PaymentEvent),
    /// An entry with this event id already exists; nothing changed.
    Duplicate,
    /// The referenced gift does not exist.
    GiftMissing,
    /// A different event already funds the referenced gift.
    GiftAlreadyFunded,
}

/// Port for the payments table.
#[async_trait]
pub trait PaymentEventRepository: Send + Sync {
    /// Record a payment unless its event id is already present.
    async fn record(&self, payment: &NewPaymentEvent) -> Result<RecordOutcome, DomainError>;

    /// Find a stored entry by the processor's event id.
    async fn find_by_external_id(
        &self,
        external_event_id: &str,
    ) -> Result<Option<PaymentEvent>, DomainError>;
}
