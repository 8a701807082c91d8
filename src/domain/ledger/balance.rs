//! Share balance derivation.
//!
//! Balance(account) = initial shares
//!                  + shares of the account's own payments not linked to a gift
//!                  + shares of gift payments whose gift the account claimed.
//!
//! A payment's shares belong to at most one account: the payer when the
//! payment funds no gift, the claimant once its gift is claimed, and nobody
//! while its gift waits to be claimed. Gift shares never fall back to the
//! payer. The Postgres ledger reader encodes the same rule in SQL.

use serde::Serialize;
use std::collections::HashMap;

use super::PaymentEvent;
use crate::domain::foundation::{AccountId, GiftCodeId};

/// Per-source totals making up a share balance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareBalance {
    pub initial: u64,
    pub direct: u64,
    pub claimed_gifts: u64,
}

impl ShareBalance {
    pub fn total(&self) -> u64 {
        self.initial + self.direct + self.claimed_gifts
    }
}

/// Returns the account currently credited with a payment's shares.
pub fn credited_account(
    payment: &PaymentEvent,
    gift_claimants: &HashMap<GiftCodeId, AccountId>,
) -> Option<AccountId> {
    match payment.gift_id {
        None => Some(payment.account_id),
        Some(gift_id) => gift_claimants.get(&gift_id).copied(),
    }
}

/// Computes the balance of `account` from in-memory ledger rows.
pub fn compute_balance(
    account: AccountId,
    initial_shares: u32,
    payments: &[PaymentEvent],
    gift_claimants: &HashMap<GiftCodeId, AccountId>,
) -> ShareBalance {
    let mut balance = ShareBalance {
        initial: u64::from(initial_shares),
        ..ShareBalance::default()
    };

    for payment in payments {
        if credited_account(payment, gift_claimants) != Some(account) {
            continue;
        }
        let shares = u64::from(payment.shares.get());
        if payment.funds_gift() {
            balance.claimed_gifts += shares;
        } else {
            balance.direct += shares;
        }
    }

    balance
}
