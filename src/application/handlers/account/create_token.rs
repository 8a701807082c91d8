//! CreateTokenHandler - Command handler for password login.

use std::sync::Arc;

use super::{normalize_email, signing_failed};
use crate::domain::account::AccountError;
use crate::domain::foundation::Principal;
use crate::ports::{AccountRepository, IssuedToken, PasswordHasher, TokenIssuer};

/// Command to exchange credentials for a bearer token.
#[derive(Debug, Clone)]
pub struct CreateTokenCommand {
    pub email: String,
    pub password: String,
}

/// Handler for password login.
///
/// Checks run in a fixed order: unknown email, then wrong password, then
/// unconfirmed account.
pub struct CreateTokenHandler {
    accounts: Arc<dyn AccountRepository>,
    hasher: Arc<dyn PasswordHasher>,
    issuer: Arc<dyn TokenIssuer>,
}

impl CreateTokenHandler {
    pub fn new(
        accounts: Arc<dyn AccountRepository>,
        hasher: Arc<dyn PasswordHasher>,
        issuer: Arc<dyn TokenIssuer>,
    ) -> Self {
        Self {
            accounts,
            hasher,
            issuer,
        }
    }

    pub async fn handle(&self, cmd: CreateTokenCommand) -> Result<IssuedToken, AccountError> {
        let email = normalize_email(&cmd.email);
        let account = self
            .accounts
            .find_by_email(&email)
            .await?
            .ok_or_else(|| AccountError::email_unknown(email.clone()))?;

        if !self
            .hasher
            .verify(&cmd.password, &account.password_hash)
            .await?
        {
            tracing::debug!(account_id = %account.id, "Password mismatch");
            return Err(AccountError::PasswordInvalid);
        }

        if !account.is_confirmed() {
            return Err(AccountError::NotConfirmed);
        }

        self.issuer
            .issue(&Principal::new(account.id, account.role))
            .map_err(signing_failed)
    }
}
