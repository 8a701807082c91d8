//! PostgreSQL implementation of PaymentEventRepository.
//!
//! Idempotency rests on `payments_stripe_event_id_key`: the insert uses
//! `ON CONFLICT (stripe_event_id) DO NOTHING` and reports a duplicate when no
//! row comes back. `payments_gift_id_key` keeps a gift funded at most once.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::account_row::db_error;
use crate::domain::foundation::{AccountId, DomainError, ErrorCode, GiftCodeId, PaymentId, Timestamp};
use crate::domain::ledger::{NewPaymentEvent, PaymentEvent, ShareQuantity};
use crate::ports::{PaymentEventRepository, RecordOutcome};

const GIFT_FUNDED_ONCE: &str = "payments_gift_id_key";
const GIFT_EXISTS: &str = "payments_gift_id_fkey";

/// PostgreSQL implementation of the PaymentEventRepository port.
pub struct PostgresPaymentEventRepository {
    pool: PgPool,
}

impl PostgresPaymentEventRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct PaymentRow {
    id: Uuid,
    stripe_event_id: String,
    user_id: Uuid,
    shares: i32,
    gift_id: Option<Uuid>,
    created_at: DateTime<Utc>,
}

impl TryFrom<PaymentRow> for PaymentEvent {
    type Error = DomainError;

    fn try_from(row: PaymentRow) -> Result<Self, Self::Error> {
        let shares = u32::try_from(row.shares)
            .ok()
            .and_then(|s| ShareQuantity::try_new(s).ok())
            .ok_or_else(|| {
                DomainError::new(
                    ErrorCode::DatabaseError,
                    format!("Invalid shares value: {}", row.shares),
                )
            })?;

        Ok(PaymentEvent {
            id: PaymentId::from_uuid(row.id),
            external_event_id: row.stripe_event_id,
            account_id: AccountId::from_uuid(row.user_id),
            shares,
            created_at: Timestamp::from_datetime(row.created_at),
            gift_id: row.gift_id.map(GiftCodeId::from_uuid),
        })
    }
}

#[async_trait]
impl PaymentEventRepository for PostgresPaymentEventRepository {
    async fn record(&self, payment: &NewPaymentEvent) -> Result<RecordOutcome, DomainError> {
        let event = PaymentEvent::record(payment.clone());
        let shares = i32::try_from(event.shares.get())
            .map_err(|_| DomainError::validation("shares", "Share quantity too large"))?;

        let inserted = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO payments (id, stripe_event_id, user_id, shares, gift_id, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (stripe_event_id) DO NOTHING
            RETURNING id
            "#,
        )
        .bind(event.id.as_uuid())
        .bind(&event.external_event_id)
        .bind(event.account_id.as_uuid())
        .bind(shares)
        .bind(event.gift_id.map(|g| *g.as_uuid()))
        .bind(event.created_at.as_datetime())
        .fetch_optional(&self.pool)
        .await;

        match inserted {
            Ok(Some(_)) => Ok(RecordOutcome::Inserted(event)),
            Ok(None) => Ok(RecordOutcome::Duplicate),
            Err(sqlx::Error::Database(db_err)) if db_err.constraint() == Some(GIFT_EXISTS) => {
                Ok(RecordOutcome::GiftMissing)
            }
            Err(sqlx::Error::Database(db_err)) if db_err.constraint() == Some(GIFT_FUNDED_ONCE) => {
                // A concurrent delivery of the same event can trip the gift
                // constraint before the event-id arbiter sees its row.
                if self
                    .find_by_external_id(&event.external_event_id)
                    .await?
                    .is_some()
                {
                    Ok(RecordOutcome::Duplicate)
                } else {
                    Ok(RecordOutcome::GiftAlreadyFunded)
                }
            }
            Err(e) => Err(db_error("record payment", e)),
        }
    }

    async fn find_by_external_id(
        &self,
        external_event_id: &str,
    ) -> Result<Option<PaymentEvent>, DomainError> {
        let row: Option<PaymentRow> = sqlx::query_as(
            r#"
            SELECT id, stripe_event_id, user_id, shares, gift_id, created_at
            FROM payments
            WHERE stripe_event_id = $1
            "#,
        )
        .bind(external_event_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("find payment", e))?;

        row.map(PaymentEvent::try_from).transpose()
    }
}
