//! GetMeHandler - Query handler for the caller's own summary.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, ErrorCode, Principal};
use crate::ports::{AccountRepository, LedgerReader};

/// Query for the authenticated member's summary.
#[derive(Debug, Clone)]
pub struct GetMeQuery {
    pub principal: Principal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetMeResult {
    pub email: String,
    pub must_upload_documents: bool,
    pub shares: u64,
}

/// Handler returning email, document status and share balance.
pub struct GetMeHandler {
    accounts: Arc<dyn AccountRepository>,
    ledger: Arc<dyn LedgerReader>,
}

impl GetMeHandler {
    pub fn new(accounts: Arc<dyn AccountRepository>, ledger: Arc<dyn LedgerReader>) -> Self {
        Self { accounts, ledger }
    }

    pub async fn handle(&self, query: GetMeQuery) -> Result<GetMeResult, DomainError> {
        let account_id = query.principal.account_id;
        let account = self
            .accounts
            .find_by_id(&account_id)
            .await?
            .ok_or_else(|| DomainError::new(ErrorCode::NotFound, "Account not found"))?;
        let balance = self
            .ledger
            .balance(&account_id)
            .await?
            .ok_or_else(|| DomainError::new(ErrorCode::NotFound, "Account not found"))?;

        Ok(GetMeResult {
            email: account.email.clone(),
            must_upload_documents: account.must_upload_documents(),
            shares: balance.total(),
        })
    }
}
