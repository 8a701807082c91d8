//! ResetPasswordHandler - Command handler for completing a password reset.

use std::sync::Arc;

use super::{normalize_email, signing_failed};
use crate::domain::account::{AccountError, OneTimeToken};
use crate::ports::{AccountRepository, IssuedToken, PasswordHasher, TokenIssuer};

/// Command to set a new password with the mailed reset token.
#[derive(Debug, Clone)]
pub struct ResetPasswordCommand {
    pub email: String,
    pub password: String,
    pub token: String,
}

/// Handler for completing a password reset.
///
/// A successful reset also confirms the account, since the member proved
/// control of the mailbox, and clears both one-time tokens.
pub struct ResetPasswordHandler {
    accounts: Arc<dyn AccountRepository>,
    hasher: Arc<dyn PasswordHasher>,
    issuer: Arc<dyn TokenIssuer>,
}

impl ResetPasswordHandler {
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

    pub async fn handle(&self, cmd: ResetPasswordCommand) -> Result<IssuedToken, AccountError> {
        let email = normalize_email(&cmd.email);
        if cmd.password.is_empty() {
            return Err(AccountError::validation("password", "Password cannot be empty"));
        }
        if !self.accounts.email_exists(&email).await? {
            return Err(AccountError::email_unknown(email));
        }

        let token = OneTimeToken::parse(&cmd.token).map_err(|_| AccountError::BadToken)?;
        let password_hash = self.hasher.hash(&cmd.password).await?;

        let principal = self
            .accounts
            .consume_reset_token(&email, &token, &password_hash)
            .await?
            .ok_or(AccountError::BadToken)?;

        tracing::info!(account_id = %principal.account_id, "Password reset");
        self.issuer.issue(&principal).map_err(signing_failed)
    }
}
