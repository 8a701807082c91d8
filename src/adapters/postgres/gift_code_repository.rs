//! PostgreSQL implementation of GiftCodeRepository.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::account_row::db_error;
use crate::domain::foundation::{AccountId, DomainError, ErrorCode, GiftCodeId, PaymentId};
use crate::domain::gift::{Gift, GiftCard, GiftCode, GiftFunding};
use crate::domain::ledger::ShareQuantity;
use crate::ports::{GiftCodeRepository, GiftInsertOutcome};

const GIFT_SELECT: &str = r#"
    SELECT g.id, g.code, g.claimed_by_user_id,
           p.id AS payment_id, p.user_id AS payer_id, p.shares AS payment_shares
    FROM gifts g
    LEFT JOIN payments p ON p.gift_id = g.id
"#;

/// PostgreSQL implementation of the GiftCodeRepository port.
pub struct PostgresGiftCodeRepository {
    pool: PgPool,
}

impl PostgresGiftCodeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct GiftRow {
    id: Uuid,
    code: String,
    claimed_by_user_id: Option<Uuid>,
    payment_id: Option<Uuid>,
    payer_id: Option<Uuid>,
    payment_shares: Option<i32>,
}

fn share_quantity(value: i32) -> Result<ShareQuantity, DomainError> {
    u32::try_from(value)
        .ok()
        .and_then(|s| ShareQuantity::try_new(s).ok())
        .ok_or_else(|| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Invalid shares value: {}", value),
            )
        })
}

impl TryFrom<GiftRow> for Gift {
    type Error = DomainError;

    fn try_from(row: GiftRow) -> Result<Self, Self::Error> {
        let funding = match (row.payment_id, row.payer_id, row.payment_shares) {
            (Some(payment_id), Some(payer), Some(shares)) => Some(GiftFunding {
                payment_id: PaymentId::from_uuid(payment_id),
                payer: AccountId::from_uuid(payer),
                shares: share_quantity(shares)?,
            }),
            _ => None,
        };

        Ok(Gift {
            id: GiftCodeId::from_uuid(row.id),
            code: GiftCode::from_stored(row.code),
            claimed_by: row.claimed_by_user_id.map(AccountId::from_uuid),
            funding,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct CardRow {
    code: String,
    shares: i32,
    first_name: String,
}

#[async_trait]
impl GiftCodeRepository for PostgresGiftCodeRepository {
    async fn insert(&self, gift: &Gift) -> Result<GiftInsertOutcome, DomainError> {
        let result = sqlx::query("INSERT INTO gifts (id, code) VALUES ($1, $2)")
            .bind(gift.id.as_uuid())
            .bind(gift.code.as_str())
            .execute(&self.pool)
            .await;

        match result {
            Ok(_) => Ok(GiftInsertOutcome::Inserted),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                Ok(GiftInsertOutcome::CodeTaken)
            }
            Err(e) => Err(db_error("insert gift", e)),
        }
    }

    async fn find_by_code(&self, code: &GiftCode) -> Result<Option<Gift>, DomainError> {
        let sql = format!("{} WHERE g.code = $1", GIFT_SELECT);
        let row: Option<GiftRow> = sqlx::query_as(&sql)
            .bind(code.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("find gift", e))?;

        row.map(Gift::try_from).transpose()
    }

    async fn find_by_id(&self, id: &GiftCodeId) -> Result<Option<Gift>, DomainError> {
        let sql = format!("{} WHERE g.id = $1", GIFT_SELECT);
        let row: Option<GiftRow> = sqlx::query_as(&sql)
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("find gift", e))?;

        row.map(Gift::try_from).transpose()
    }

    async fn claim(
        &self,
        code: &GiftCode,
        claimant: &AccountId,
    ) -> Result<Option<Gift>, DomainError> {
        // Concurrent claimers block on the row lock; the loser re-evaluates
        // `claimed_by_user_id IS NULL` against the winner's write and matches nothing.
        let row: Option<GiftRow> = sqlx::query_as(
            r#"
            UPDATE gifts g SET claimed_by_user_id = $2
            FROM payments p
            WHERE g.code = $1
              AND g.claimed_by_user_id IS NULL
              AND p.gift_id = g.id
            RETURNING g.id, g.code, g.claimed_by_user_id,
                      p.id AS payment_id, p.user_id AS payer_id, p.shares AS payment_shares
            "#,
        )
        .bind(code.as_str())
        .bind(claimant.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("claim gift", e))?;

        row.map(Gift::try_from).transpose()
    }

    async fn find_card(&self, id: &GiftCodeId) -> Result<Option<GiftCard>, DomainError> {
        let row: Option<CardRow> = sqlx::query_as(
            r#"
            SELECT g.code, p.shares, u.first_name
            FROM gifts g
            JOIN payments p ON p.gift_id = g.id
            JOIN users u ON u.id = p.user_id
            WHERE g.id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("load gift card", e))?;

        row.map(|row| {
            Ok(GiftCard {
                giver_first_name: row.first_name,
                code: GiftCode::from_stored(row.code),
                shares: share_quantity(row.shares)?,
            })
        })
        .transpose()
    }
}
