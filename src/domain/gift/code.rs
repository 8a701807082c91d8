//! Gift code value object and gift entity.
//!
//! A gift moves one way through `Created → Funded → Claimed`:
//!
//! - **Created**: a checkout asked for a gift; the row exists, no payment yet.
//! - **Funded**: the payment webhook recorded a payment linked to the gift.
//! - **Claimed**: a member redeemed the code; the claimant never changes.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::RedeemError;
use crate::domain::foundation::{AccountId, GiftCodeId, PaymentId, ValidationError};
use crate::domain::ledger::ShareQuantity;

/// Characters a gift code is drawn from.
pub const GIFT_CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Length of every gift code.
pub const GIFT_CODE_LENGTH: usize = 8;

/// The human-readable redeemable string, e.g. `K7Q2M9XA`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GiftCode(String);

impl GiftCode {
    /// Draws a random code. Uniqueness is enforced by storage, not here.
    pub fn generate() -> Self {
        let mut rng = rand::thread_rng();
        let code = (0..GIFT_CODE_LENGTH)
            .map(|_| char::from(GIFT_CODE_ALPHABET[rng.gen_range(0..GIFT_CODE_ALPHABET.len())]))
            .collect();
        Self(code)
    }

    /// Parses a code typed by a member. Case and surrounding whitespace are ignored.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let normalized = raw.trim().to_uppercase();
        if normalized.is_empty() {
            return Err(ValidationError::empty_field("gift_code"));
        }
        if normalized.len() != GIFT_CODE_LENGTH
            || !normalized.bytes().all(|b| GIFT_CODE_ALPHABET.contains(&b))
        {
            return Err(ValidationError::invalid_format(
                "gift_code",
                format!(
                    "expected {} characters from A-Z and 0-9",
                    GIFT_CODE_LENGTH
                ),
            ));
        }
        Ok(Self(normalized))
    }

    /// Wraps a value read back from storage.
    pub fn from_stored(value: String) -> Self {
        Self(value)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GiftCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle position of a gift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GiftState {
    Created,
    Funded,
    Claimed,
}

/// The payment that funded a gift.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GiftFunding {
    pub payment_id: PaymentId,
    pub payer: AccountId,
    pub shares: ShareQuantity,
}

/// A gift code row joined with its funding payment, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gift {
    pub id: GiftCodeId,
    pub code: GiftCode,
    pub claimed_by: Option<AccountId>,
    pub funding: Option<GiftFunding>,
}

impl Gift {
    /// A newly created, unfunded gift.
    pub fn new(code: GiftCode) -> Self {
        Self {
            id: GiftCodeId::new(),
            code,
            claimed_by: None,
            funding: None,
        }
    }

    pub fn state(&self) -> GiftState {
        match (&self.claimed_by, &self.funding) {
            (Some(_), _) => GiftState::Claimed,
            (None, Some(_)) => GiftState::Funded,
            (None, None) => GiftState::Created,
        }
    }

    /// Classifies whether this gift could be claimed right now.
    ///
    /// Claimed wins over unfunded: a claimed gift reports `AlreadyClaimed`
    /// to everyone, the payer included.
    pub fn check_redeemable(&self) -> Result<(), RedeemError> {
        match self.state() {
            GiftState::Claimed => Err(RedeemError::AlreadyClaimed),
            GiftState::Created => Err(RedeemError::NotYetFunded),
            GiftState::Funded => Ok(()),
        }
    }
}
