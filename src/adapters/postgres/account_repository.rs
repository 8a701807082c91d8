//! PostgreSQL implementation of AccountRepository.
//!
//! Token consumption is a single `UPDATE ... WHERE token = $n RETURNING`, so
//! of two concurrent requests with the same token at most one gets a row back.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::account_row::{db_error, AccountRow, ACCOUNT_COLUMNS};
use crate::domain::account::{Account, IdentityDocuments, OneTimeToken};
use crate::domain::foundation::{AccountId, DomainError, ErrorCode, Principal, Role};
use crate::ports::AccountRepository;

/// PostgreSQL implementation of the AccountRepository port.
pub struct PostgresAccountRepository {
    pool: PgPool,
}

impl PostgresAccountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn find_one(&self, filter: &str, bind: QueryKey<'_>) -> Result<Option<Account>, DomainError> {
        let sql = format!("SELECT {} FROM users u WHERE {}", ACCOUNT_COLUMNS, filter);
        let query = sqlx::query_as::<_, AccountRow>(&sql);
        let query = match bind {
            QueryKey::Id(id) => query.bind(id),
            QueryKey::Email(email) => query.bind(email),
        };
        let row = query
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("find account", e))?;
        row.map(Account::try_from).transpose()
    }
}

enum QueryKey<'a> {
    Id(Uuid),
    Email(&'a str),
}

#[derive(sqlx::FromRow)]
struct PrincipalRow {
    id: Uuid,
    admin: bool,
}

impl From<PrincipalRow> for Principal {
    fn from(row: PrincipalRow) -> Self {
        Principal::new(AccountId::from_uuid(row.id), Role::from_admin_flag(row.admin))
    }
}

#[async_trait]
impl AccountRepository for PostgresAccountRepository {
    async fn insert(&self, account: &Account) -> Result<(), DomainError> {
        let initial_shares = i32::try_from(account.initial_shares)
            .map_err(|_| DomainError::validation("initial_shares", "Too many initial shares"))?;

        sqlx::query(
            r#"
            INSERT INTO users (
                id, admin, confirmed, confirm_token, reset_token, email, password_hash,
                phone_number, first_name, last_name, address, postal_code, city, country,
                category, reason, stripe_customer_id, identity_front, identity_back,
                address_proof, accepted, initial_shares
            ) VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11,
                $12, $13, $14, $15, $16, $17, $18, $19, $20, $21, $22
            )
            "#,
        )
        .bind(account.id.as_uuid())
        .bind(account.role == Role::Admin)
        .bind(account.is_confirmed())
        .bind(account.confirm_token.as_ref().map(|t| t.as_str()))
        .bind(account.reset_token.as_ref().map(|t| t.as_str()))
        .bind(&account.email)
        .bind(&account.password_hash)
        .bind(&account.profile.phone_number)
        .bind(&account.profile.first_name)
        .bind(&account.profile.last_name)
        .bind(&account.profile.address)
        .bind(&account.profile.postal_code)
        .bind(&account.profile.city)
        .bind(&account.profile.country)
        .bind(account.profile.category.as_str())
        .bind(&account.profile.reason)
        .bind(&account.customer_ref)
        .bind(account.documents.identity_front.map(|d| *d.as_uuid()))
        .bind(account.documents.identity_back.map(|d| *d.as_uuid()))
        .bind(account.documents.address_proof.map(|d| *d.as_uuid()))
        .bind(account.accepted)
        .bind(initial_shares)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.constraint() == Some("users_email_key") {
                    return DomainError::new(ErrorCode::EmailInUse, "Email already used");
                }
            }
            db_error("insert account", e)
        })?;

        Ok(())
    }

    async fn find_by_id(&self, id: &AccountId) -> Result<Option<Account>, DomainError> {
        self.find_one("u.id = $1", QueryKey::Id(*id.as_uuid())).await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, DomainError> {
        self.find_one("u.email = $1", QueryKey::Email(email)).await
    }

    async fn email_exists(&self, email: &str) -> Result<bool, DomainError> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
            .bind(email)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_error("check email", e))
    }

    async fn consume_confirm_token(
        &self,
        email: &str,
        token: &OneTimeToken,
    ) -> Result<Option<Principal>, DomainError> {
        let row: Option<PrincipalRow> = sqlx::query_as(
            r#"
            UPDATE users SET confirmed = TRUE, confirm_token = NULL
            WHERE email = $1 AND confirm_token = $2
            RETURNING id, admin
            "#,
        )
        .bind(email)
        .bind(token.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("confirm account", e))?;

        Ok(row.map(Principal::from))
    }

    async fn replace_confirm_token(
        &self,
        id: &AccountId,
        token: &OneTimeToken,
    ) -> Result<bool, DomainError> {
        let result = sqlx::query(
            "UPDATE users SET confirm_token = $2 WHERE id = $1 AND confirmed = FALSE",
        )
        .bind(id.as_uuid())
        .bind(token.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("store confirm token", e))?;

        Ok(result.rows_affected() == 1)
    }

    async fn replace_reset_token(
        &self,
        id: &AccountId,
        token: &OneTimeToken,
    ) -> Result<(), DomainError> {
        sqlx::query("UPDATE users SET reset_token = $2 WHERE id = $1")
            .bind(id.as_uuid())
            .bind(token.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("store reset token", e))?;
        Ok(())
    }

    async fn consume_reset_token(
        &self,
        email: &str,
        token: &OneTimeToken,
        password_hash: &str,
    ) -> Result<Option<Principal>, DomainError> {
        let row: Option<PrincipalRow> = sqlx::query_as(
            r#"
            UPDATE users SET
                password_hash = $3,
                confirmed = TRUE,
                confirm_token = NULL,
                reset_token = NULL
            WHERE email = $1 AND reset_token = $2
            RETURNING id, admin
            "#,
        )
        .bind(email)
        .bind(token.as_str())
        .bind(password_hash)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("reset password", e))?;

        Ok(row.map(Principal::from))
    }

    async fn set_documents(
        &self,
        id: &AccountId,
        documents: &IdentityDocuments,
    ) -> Result<bool, DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE users SET identity_front = $2, identity_back = $3, address_proof = $4
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .bind(documents.identity_front.map(|d| *d.as_uuid()))
        .bind(documents.identity_back.map(|d| *d.as_uuid()))
        .bind(documents.address_proof.map(|d| *d.as_uuid()))
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("attach documents", e))?;

        Ok(result.rows_affected() == 1)
    }

    async fn set_initial_shares(&self, id: &AccountId, shares: u32) -> Result<bool, DomainError> {
        let shares = i32::try_from(shares)
            .map_err(|_| DomainError::validation("initial_shares", "Too many initial shares"))?;
        let result = sqlx::query("UPDATE users SET initial_shares = $2 WHERE id = $1")
            .bind(id.as_uuid())
            .bind(shares)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("set initial shares", e))?;

        Ok(result.rows_affected() == 1)
    }

    async fn set_accepted(&self, id: &AccountId, accepted: bool) -> Result<bool, DomainError> {
        let result = sqlx::query("UPDATE users SET accepted = $2 WHERE id = $1")
            .bind(id.as_uuid())
            .bind(accepted)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("set accepted", e))?;

        Ok(result.rows_affected() == 1)
    }
}
