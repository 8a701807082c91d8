//! GrantInitialSharesHandler - Command handler for the manual share baseline.

use std::sync::Arc;

use super::id_unknown;
use crate::domain::foundation::{AccountId, DomainError, Principal};
use crate::ports::AccountRepository;

/// Sets (not adds to) the member's initial shares.
#[derive(Debug, Clone)]
pub struct GrantInitialSharesCommand {
    pub principal: Principal,
    pub account_id: AccountId,
    pub initial_shares: u32,
}

pub struct GrantInitialSharesHandler {
    accounts: Arc<dyn AccountRepository>,
}

impl GrantInitialSharesHandler {
    pub fn new(accounts: Arc<dyn AccountRepository>) -> Self {
        Self { accounts }
    }

    pub async fn handle(&self, cmd: GrantInitialSharesCommand) -> Result<(), DomainError> {
        cmd.principal.require_admin()?;
        if !self
            .accounts
            .set_initial_shares(&cmd.account_id, cmd.initial_shares)
            .await?
        {
            return Err(id_unknown(cmd.account_id));
        }
        tracing::info!(
            admin_id = %cmd.principal.account_id,
            account_id = %cmd.account_id,
            initial_shares = cmd.initial_shares,
            "Initial shares granted"
        );
        Ok(())
    }
}
