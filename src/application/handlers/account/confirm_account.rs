//! ConfirmAccountHandler - Command handler for email confirmation.

use std::sync::Arc;

use super::{normalize_email, signing_failed};
use crate::domain::account::{AccountError, OneTimeToken};
use crate::ports::{AccountRepository, IssuedToken, TokenIssuer};

/// Command to confirm an account with the mailed token.
#[derive(Debug, Clone)]
pub struct ConfirmAccountCommand {
    pub email: String,
    pub token: String,
}

/// Handler for account confirmation.
///
/// The token is checked and cleared by one conditional write, so a token
/// can confirm an account only once, and a token replaced by a newer one no
/// longer works.
pub struct ConfirmAccountHandler {
    accounts: Arc<dyn AccountRepository>,
    issuer: Arc<dyn TokenIssuer>,
}

impl ConfirmAccountHandler {
    pub fn new(accounts: Arc<dyn AccountRepository>, issuer: Arc<dyn TokenIssuer>) -> Self {
        Self { accounts, issuer }
    }

    pub async fn handle(&self, cmd: ConfirmAccountCommand) -> Result<IssuedToken, AccountError> {
        let email = normalize_email(&cmd.email);
        if !self.accounts.email_exists(&email).await? {
            return Err(AccountError::email_unknown(email));
        }

        let token = OneTimeToken::parse(&cmd.token).map_err(|_| AccountError::BadToken)?;
        let principal = self
            .accounts
            .consume_confirm_token(&email, &token)
            .await?
            .ok_or(AccountError::BadToken)?;

        tracing::info!(account_id = %principal.account_id, "Account confirmed");
        self.issuer.issue(&principal).map_err(signing_failed)
    }
}
