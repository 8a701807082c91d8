//! PostgreSQL implementation of LedgerReader.
//!
//! Every query goes through [`BALANCE_SELECT`], the one SQL rendering of the
//! balance rule in `domain::ledger::balance`:
//!
//! - direct: the account's payments that fund no gift
//! - claimed gifts: payments funding a gift whose claimant is the account
//!
//! A funded gift nobody has claimed contributes to no one.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use sqlx::PgPool;

use super::account_row::{db_error, AccountRow, ACCOUNT_COLUMNS};
use crate::domain::account::Account;
use crate::domain::foundation::{AccountId, DomainError, ErrorCode};
use crate::domain::ledger::ShareBalance;
use crate::ports::{LedgerReader, MemberBalance};

fn balance_select() -> String {
    format!(
        r#"
        SELECT {columns},
            COALESCE((
                SELECT SUM(p.shares) FROM payments p
                WHERE p.user_id = u.id AND p.gift_id IS NULL
            ), 0)::BIGINT AS direct_shares,
            COALESCE((
                SELECT SUM(p.shares) FROM payments p
                JOIN gifts g ON g.id = p.gift_id
                WHERE g.claimed_by_user_id = u.id
            ), 0)::BIGINT AS gift_shares
        FROM users u
        "#,
        columns = ACCOUNT_COLUMNS
    )
}

/// Shared by single-account and bulk views so both apply the same rule.
static BALANCE_SELECT: Lazy<String> = Lazy::new(balance_select);

#[derive(Debug, sqlx::FromRow)]
struct MemberRow {
    #[sqlx(flatten)]
    account: AccountRow,
    direct_shares: i64,
    gift_shares: i64,
}

fn non_negative(value: i64, column: &str) -> Result<u64, DomainError> {
    u64::try_from(value).map_err(|_| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Negative {} sum: {}", column, value),
        )
    })
}

impl TryFrom<MemberRow> for MemberBalance {
    type Error = DomainError;

    fn try_from(row: MemberRow) -> Result<Self, Self::Error> {
        let account = Account::try_from(row.account)?;
        let balance = ShareBalance {
            initial: u64::from(account.initial_shares),
            direct: non_negative(row.direct_shares, "direct_shares")?,
            claimed_gifts: non_negative(row.gift_shares, "gift_shares")?,
        };
        Ok(MemberBalance { account, balance })
    }
}

/// PostgreSQL implementation of the LedgerReader port.
pub struct PostgresLedgerReader {
    pool: PgPool,
}

impl PostgresLedgerReader {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LedgerReader for PostgresLedgerReader {
    async fn balance(&self, account_id: &AccountId) -> Result<Option<ShareBalance>, DomainError> {
        Ok(self.member(account_id).await?.map(|m| m.balance))
    }

    async fn member(&self, account_id: &AccountId) -> Result<Option<MemberBalance>, DomainError> {
        let sql = format!("{} WHERE u.id = $1", BALANCE_SELECT.as_str());
        let row: Option<MemberRow> = sqlx::query_as(&sql)
            .bind(account_id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("read balance", e))?;

        row.map(MemberBalance::try_from).transpose()
    }

    async fn members(&self) -> Result<Vec<MemberBalance>, DomainError> {
        let sql = format!("{} ORDER BY u.email", BALANCE_SELECT.as_str());
        let rows: Vec<MemberRow> = sqlx::query_as(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_error("list balances", e))?;

        rows.into_iter().map(MemberBalance::try_from).collect()
    }
}
