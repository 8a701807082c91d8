//! AcceptMemberHandler - Command handler for compliance acceptance.

use std::sync::Arc;

use super::id_unknown;
use crate::domain::foundation::{AccountId, DomainError, Principal};
use crate::ports::AccountRepository;

#[derive(Debug, Clone)]
pub struct AcceptMemberCommand {
    pub principal: Principal,
    pub account_id: AccountId,
}

/// Marks a member as accepted once their documents have been reviewed.
pub struct AcceptMemberHandler {
    accounts: Arc<dyn AccountRepository>,
}

impl AcceptMemberHandler {
    pub fn new(accounts: Arc<dyn AccountRepository>) -> Self {
        Self { accounts }
    }

    pub async fn handle(&self, cmd: AcceptMemberCommand) -> Result<(), DomainError> {
        cmd.principal.require_admin()?;
        if !self.accounts.set_accepted(&cmd.account_id, true).await? {
            return Err(id_unknown(cmd.account_id));
        }
        tracing::info!(
            admin_id = %cmd.principal.account_id,
            account_id = %cmd.account_id,
            "Member accepted"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::{member, Fixture};
    use crate::domain::foundation::ErrorCode;

    #[tokio::test]
    async fn admin_accepts_member() {
        let fx = Fixture::new();
        let admin = fx.admin("root@example.org").await;
        let ada = fx.confirmed_member("ada@example.org").await;

        AcceptMemberHandler::new(fx.accounts())
            .handle(AcceptMemberCommand {
                principal: admin,
                account_id: ada.id,
            })
            .await
            .unwrap();

        assert!(fx.store.find_by_id(&ada.id).await.unwrap().unwrap().accepted);
    }

    #[tokio::test]
    async fn member_is_refused() {
        let fx = Fixture::new();
        let ada = fx.confirmed_member("ada@example.org").await;
        let err = AcceptMemberHandler::new(fx.accounts())
            .handle(AcceptMemberCommand {
                principal: member(&ada),
                account_id: ada.id,
            })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::NotAdmin);
        assert!(!fx.store.find_by_id(&ada.id).await.unwrap().unwrap().accepted);
    }
}
