//! AccountRepository port - persistence for member accounts.
//!
//! One-time token consumption is a single conditional write: the token is
//! compared and cleared in the same statement, so two requests presenting
//! the same token cannot both succeed.

use async_trait::async_trait;

use crate::domain::account::{Account, IdentityDocuments, OneTimeToken};
use crate::domain::foundation::{AccountId, DomainError, Principal};

/// Port for reading and mutating member accounts.
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Insert a newly registered account.
    ///
    /// # Errors
    ///
    /// Returns a `DomainError` with code `EmailInUse` when the email is taken
    /// (unique constraint), `DatabaseError` otherwise.
    async fn insert(&self, account: &Account) -> Result<(), DomainError>;

    async fn find_by_id(&self, id: &AccountId) -> Result<Option<Account>, DomainError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, DomainError>;

    async fn email_exists(&self, email: &str) -> Result<bool, DomainError>;

    /// Confirms the account if `token` is its current confirm token.
    ///
    /// Atomically sets `confirmed`, clears the confirm token and returns the
    /// account's principal. Returns `None` when no account with this email
    /// holds this token.
    async fn consume_confirm_token(
        &self,
        email: &str,
        token: &OneTimeToken,
    ) -> Result<Option<Principal>, DomainError>;

    /// Replaces the confirm token of an unconfirmed account.
    ///
    /// Returns `false` when the account is already confirmed or does not exist.
    async fn replace_confirm_token(
        &self,
        id: &AccountId,
        token: &OneTimeToken,
    ) -> Result<bool, DomainError>;

    /// Stores a fresh reset token, replacing any previous one.
    async fn replace_reset_token(
        &self,
        id: &AccountId,
        token: &OneTimeToken,
    ) -> Result<(), DomainError>;

    /// Sets a new password if `token` is the account's current reset token.
    ///
    /// Atomically stores `password_hash`, clears both one-time tokens and
    /// marks the account confirmed. Returns `None` when no account with this
    /// email holds this reset token.
    async fn consume_reset_token(
        &self,
        email: &str,
        token: &OneTimeToken,
        password_hash: &str,
    ) -> Result<Option<Principal>, DomainError>;

    /// Records uploaded identity documents. Returns `false` if the account is unknown.
    async fn set_documents(
        &self,
        id: &AccountId,
        documents: &IdentityDocuments,
    ) -> Result<bool, DomainError>;

    /// Sets the manually granted baseline. Returns `false` if the account is unknown.
    async fn set_initial_shares(&self, id: &AccountId, shares: u32) -> Result<bool, DomainError>;

    /// Marks the account as accepted after compliance review.
    async fn set_accepted(&self, id: &AccountId, accepted: bool) -> Result<bool, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn account_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn AccountRepository) {}
    }
}
