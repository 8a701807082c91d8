//! Ledger entries recorded from completed payments.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::{AccountId, GiftCodeId, PaymentId, Timestamp, ValidationError};

/// Upper bound on shares bought in a single checkout.
pub const MAX_SHARES_PER_PAYMENT: u32 = 100_000;

/// Number of shares in a single payment. Always at least one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct ShareQuantity(u32);

impl ShareQuantity {
    pub fn try_new(value: u32) -> Result<Self, ValidationError> {
        if value == 0 || value > MAX_SHARES_PER_PAYMENT {
            return Err(ValidationError::out_of_range(
                "shares",
                1,
                MAX_SHARES_PER_PAYMENT as i64,
                value as i64,
            ));
        }
        Ok(Self(value))
    }

    /// Parses the decimal string carried in checkout metadata.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let value: u32 = raw.trim().parse().map_err(|_| {
            ValidationError::invalid_format("shares", format!("'{}' is not a positive integer", raw))
        })?;
        Self::try_new(value)
    }

    pub fn get(&self) -> u32 {
        self.0
    }
}

impl TryFrom<u32> for ShareQuantity {
    type Error = ValidationError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::try_new(value)
    }
}

impl From<ShareQuantity> for u32 {
    fn from(q: ShareQuantity) -> Self {
        q.0
    }
}

impl fmt::Display for ShareQuantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A payment completion waiting to be recorded.
///
/// `external_event_id` is the processor's event id and the idempotency key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPaymentEvent {
    pub external_event_id: String,
    pub account_id: AccountId,
    pub shares: ShareQuantity,
    pub created_at: Timestamp,
    pub gift_id: Option<GiftCodeId>,
}

/// A recorded ledger entry. Immutable once stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentEvent {
    pub id: PaymentId,
    pub external_event_id: String,
    pub account_id: AccountId,
    pub shares: ShareQuantity,
    pub created_at: Timestamp,
    pub gift_id: Option<GiftCodeId>,
}

impl PaymentEvent {
    pub fn record(new: NewPaymentEvent) -> Self {
        Self {
            id: PaymentId::new(),
            external_event_id: new.external_event_id,
            account_id: new.account_id,
            shares: new.shares,
            created_at: new.created_at,
            gift_id: new.gift_id,
        }
    }

    pub fn funds_gift(&self) -> bool {
        self.gift_id.is_some()
    }
}
