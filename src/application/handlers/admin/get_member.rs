//! GetMemberHandler - Query handler for one member's full record.

use std::sync::Arc;

use super::id_unknown;
use crate::domain::foundation::{AccountId, DomainError, Principal};
use crate::ports::{LedgerReader, MemberBalance};

#[derive(Debug, Clone)]
pub struct GetMemberQuery {
    pub principal: Principal,
    pub account_id: AccountId,
}

pub struct GetMemberHandler {
    ledger: Arc<dyn LedgerReader>,
}

impl GetMemberHandler {
    pub fn new(ledger: Arc<dyn LedgerReader>) -> Self {
        Self { ledger }
    }

    pub async fn handle(&self, query: GetMemberQuery) -> Result<MemberBalance, DomainError> {
        query.principal.require_admin()?;
        self.ledger
            .member(&query.account_id)
            .await?
            .ok_or_else(|| id_unknown(query.account_id))
    }
}
