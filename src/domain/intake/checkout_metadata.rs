//! Checkout session metadata shared by checkout creation and payment intake.
//!
//! The checkout handler writes these keys when it opens a session; the
//! webhook reads them back once Stripe reports the session completed.

use std::collections::HashMap;

use super::errors::IntakeError;
use super::stripe_event::{CheckoutSessionObject, StripeEvent, StripeEventType};
use crate::domain::foundation::{AccountId, GiftCodeId, Timestamp};
use crate::domain::ledger::{NewPaymentEvent, ShareQuantity};

pub const METADATA_ACCOUNT_ID: &str = "userID";
pub const METADATA_SHARES: &str = "shares";
pub const METADATA_GIFT_ID: &str = "giftID";

/// Metadata attached to a checkout session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutMetadata {
    pub account_id: AccountId,
    pub shares: ShareQuantity,
    pub gift_id: Option<GiftCodeId>,
}

impl CheckoutMetadata {
    /// Renders the metadata map sent to the payment provider.
    pub fn to_map(&self) -> HashMap<String, String> {
        let mut map = HashMap::from([
            (METADATA_ACCOUNT_ID.to_string(), self.account_id.to_string()),
            (METADATA_SHARES.to_string(), self.shares.to_string()),
        ]);
        if let Some(gift_id) = self.gift_id {
            map.insert(METADATA_GIFT_ID.to_string(), gift_id.to_string());
        }
        map
    }

    /// Reads metadata back from a completed session.
    ///
    /// An absent or empty `giftID` means the purchase was not a gift.
    pub fn from_map(map: &HashMap<String, String>) -> Result<Self, IntakeError> {
        let account_id = map
            .get(METADATA_ACCOUNT_ID)
            .filter(|v| !v.is_empty())
            .ok_or(IntakeError::MissingMetadata(METADATA_ACCOUNT_ID))?
            .parse::<AccountId>()
            .map_err(|e| IntakeError::InvalidMetadata {
                field: METADATA_ACCOUNT_ID,
                reason: e.to_string(),
            })?;

        let shares = map
            .get(METADATA_SHARES)
            .ok_or(IntakeError::MissingMetadata(METADATA_SHARES))
            .and_then(|raw| {
                ShareQuantity::parse(raw).map_err(|e| IntakeError::InvalidMetadata {
                    field: METADATA_SHARES,
                    reason: e.to_string(),
                })
            })?;

        let gift_id = match map.get(METADATA_GIFT_ID).filter(|v| !v.is_empty()) {
            None => None,
            Some(raw) => Some(raw.parse::<GiftCodeId>().map_err(|e| {
                IntakeError::InvalidMetadata {
                    field: METADATA_GIFT_ID,
                    reason: e.to_string(),
                }
            })?),
        };

        Ok(Self {
            account_id,
            shares,
            gift_id,
        })
    }
}

/// Extracts the ledger entry carried by a verified event.
///
/// Returns `Ok(None)` for event types that do not create ledger entries.
pub fn payment_from_event(event: &StripeEvent) -> Result<Option<NewPaymentEvent>, IntakeError> {
    if event.parsed_type() != StripeEventType::CheckoutSessionCompleted {
        return Ok(None);
    }

    let session: CheckoutSessionObject = event
        .deserialize_object()
        .map_err(|e| IntakeError::MalformedPayload(e.to_string()))?;
    let metadata = CheckoutMetadata::from_map(&session.metadata)?;
    let created_at = Timestamp::from_unix_secs(event.created).ok_or_else(|| {
        IntakeError::MalformedPayload(format!("event timestamp {} out of range", event.created))
    })?;

    Ok(Some(NewPaymentEvent {
        external_event_id: event.id.clone(),
        account_id: metadata.account_id,
        shares: metadata.shares,
        created_at,
        gift_id: metadata.gift_id,
    }))
}
