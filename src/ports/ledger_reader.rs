//! LedgerReader port - share balance queries.
//!
//! Single-account and bulk queries must apply the same balance formula. In
//! Postgres each call is one statement, so a payment or redemption arriving
//! concurrently is either fully reflected or not at all.

use async_trait::async_trait;

use crate::domain::account::Account;
use crate::domain::foundation::{AccountId, DomainError};
use crate::domain::ledger::ShareBalance;

/// An account together with its current share balance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberBalance {
    pub account: Account,
    pub balance: ShareBalance,
}

/// Read-only port over the share ledger.
#[async_trait]
pub trait LedgerReader: Send + Sync {
    /// Balance of one account, or `None` if the account does not exist.
    async fn balance(&self, account_id: &AccountId) -> Result<Option<ShareBalance>, DomainError>;

    /// One account with its balance, for the admin detail view.
    async fn member(&self, account_id: &AccountId) -> Result<Option<MemberBalance>, DomainError>;

    /// Every account with its balance, ordered by email.
    async fn members(&self) -> Result<Vec<MemberBalance>, DomainError>;
}
