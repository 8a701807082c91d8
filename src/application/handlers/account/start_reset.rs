//! StartResetHandler - Command handler for requesting a password reset.

use std::sync::Arc;

use super::normalize_email;
use crate::domain::account::{AccountError, OneTimeToken};
use crate::ports::{AccountRepository, Notification, NotificationSender, NotificationTemplate};

/// Command to mail a password reset token.
#[derive(Debug, Clone)]
pub struct StartResetCommand {
    pub email: String,
}

/// Handler that stores a fresh reset token and mails it.
pub struct StartResetHandler {
    accounts: Arc<dyn AccountRepository>,
    notifier: Arc<dyn NotificationSender>,
}

impl StartResetHandler {
    pub fn new(
        accounts: Arc<dyn AccountRepository>,
        notifier: Arc<dyn NotificationSender>,
    ) -> Self {
        Self { accounts, notifier }
    }

    pub async fn handle(&self, cmd: StartResetCommand) -> Result<(), AccountError> {
        let email = normalize_email(&cmd.email);
        let account = self
            .accounts
            .find_by_email(&email)
            .await?
            .ok_or_else(|| AccountError::email_unknown(email.clone()))?;

        let token = OneTimeToken::generate();
        self.accounts.replace_reset_token(&account.id, &token).await?;

        self.notifier
            .send(Notification {
                to: account.email,
                template: NotificationTemplate::ResetAccount,
                token,
            })
            .await?;

        tracing::info!(account_id = %account.id, "Reset token sent");
        Ok(())
    }
}
