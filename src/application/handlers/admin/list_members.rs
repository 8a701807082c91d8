//! ListMembersHandler - Query handler for the admin member listing.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, Principal};
use crate::ports::{LedgerReader, MemberBalance};

#[derive(Debug, Clone)]
pub struct ListMembersQuery {
    pub principal: Principal,
}

/// Every member with their balance, ordered by email.
pub struct ListMembersHandler {
    ledger: Arc<dyn LedgerReader>,
}

impl ListMembersHandler {
    pub fn new(ledger: Arc<dyn LedgerReader>) -> Self {
        Self { ledger }
    }

    pub async fn handle(&self, query: ListMembersQuery) -> Result<Vec<MemberBalance>, DomainError> {
        query.principal.require_admin()?;
        self.ledger.members().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::{member, Fixture};
    use crate::domain::foundation::ErrorCode;

    #[tokio::test]
    async fn admin_sees_everyone_with_canonical_balances() {
        let fx = Fixture::new();
        let admin = fx.admin("root@example.org").await;
        let ada = fx.confirmed_member("ada@example.org").await;
        fx.record_payment(ada.id, 2, None).await;
        fx.funded_gift(ada.id, 5).await;

        let members = ListMembersHandler::new(Arc::new(fx.store.clone()))
            .handle(ListMembersQuery { principal: admin })
            .await
            .unwrap();

        let emails: Vec<_> = members.iter().map(|m| m.account.email.as_str()).collect();
        assert_eq!(emails, ["ada@example.org", "root@example.org"]);
        assert_eq!(members[0].balance.total(), 2);
        assert_eq!(
            members[0].balance,
            fx.store.balance(&ada.id).await.unwrap().unwrap()
        );
    }

    #[tokio::test]
    async fn member_is_refused() {
        let fx = Fixture::new();
        let ada = fx.confirmed_member("ada@example.org").await;

        let err = ListMembersHandler::new(Arc::new(fx.store.clone()))
            .handle(ListMembersQuery {
                principal: member(&ada),
            })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::NotAdmin);
    }
}
