//! Printable gift card contents.

use super::GiftCode;
use crate::domain::ledger::ShareQuantity;

/// What a gift card shows: who offers it, the code to redeem, and its value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GiftCard {
    pub giver_first_name: String,
    pub code: GiftCode,
    pub shares: ShareQuantity,
}
