//! Row mapping shared by the account repository and the ledger reader.

use sqlx::FromRow;
use uuid::Uuid;

use crate::domain::account::{
    Account, Category, IdentityDocuments, OneTimeToken, Profile, VerificationState,
};
use crate::domain::foundation::{AccountId, DocumentId, DomainError, ErrorCode, Role};

/// Column list matching [`AccountRow`], prefixed with the `u` alias.
pub(super) const ACCOUNT_COLUMNS: &str = r#"
    u.id, u.admin, u.confirmed, u.confirm_token, u.reset_token, u.email,
    u.password_hash, u.phone_number, u.first_name, u.last_name, u.address,
    u.postal_code, u.city, u.country, u.category, u.reason,
    u.stripe_customer_id, u.identity_front, u.identity_back, u.address_proof,
    u.accepted, u.initial_shares
"#;

#[derive(Debug, FromRow)]
pub(super) struct AccountRow {
    id: Uuid,
    admin: bool,
    confirmed: bool,
    confirm_token: Option<String>,
    reset_token: Option<String>,
    email: String,
    password_hash: String,
    phone_number: String,
    first_name: String,
    last_name: String,
    address: String,
    postal_code: String,
    city: String,
    country: String,
    category: String,
    reason: Option<String>,
    stripe_customer_id: String,
    identity_front: Option<Uuid>,
    identity_back: Option<Uuid>,
    address_proof: Option<Uuid>,
    accepted: bool,
    initial_shares: i32,
}

impl TryFrom<AccountRow> for Account {
    type Error = DomainError;

    fn try_from(row: AccountRow) -> Result<Self, Self::Error> {
        let category: Category = row.category.parse().map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Invalid category value: {}", e))
        })?;
        let initial_shares = u32::try_from(row.initial_shares).map_err(|_| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Negative initial_shares: {}", row.initial_shares),
            )
        })?;

        Ok(Account {
            id: AccountId::from_uuid(row.id),
            role: Role::from_admin_flag(row.admin),
            verification: VerificationState::from_confirmed_flag(row.confirmed),
            confirm_token: row.confirm_token.map(OneTimeToken::from_stored),
            reset_token: row.reset_token.map(OneTimeToken::from_stored),
            email: row.email,
            password_hash: row.password_hash,
            profile: Profile {
                phone_number: row.phone_number,
                first_name: row.first_name,
                last_name: row.last_name,
                address: row.address,
                postal_code: row.postal_code,
                city: row.city,
                country: row.country,
                category,
                reason: row.reason,
            },
            customer_ref: row.stripe_customer_id,
            documents: IdentityDocuments {
                identity_front: row.identity_front.map(DocumentId::from_uuid),
                identity_back: row.identity_back.map(DocumentId::from_uuid),
                address_proof: row.address_proof.map(DocumentId::from_uuid),
            },
            accepted: row.accepted,
            initial_shares,
        })
    }
}

/// Maps a sqlx failure to a storage `DomainError` with context.
pub(super) fn db_error(action: &str, err: sqlx::Error) -> DomainError {
    DomainError::new(ErrorCode::DatabaseError, format!("Failed to {}: {}", action, err))
}
