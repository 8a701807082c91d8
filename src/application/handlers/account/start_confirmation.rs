//! StartConfirmationHandler - Command handler for re-sending the confirm token.

use std::sync::Arc;

use super::normalize_email;
use crate::domain::account::{AccountError, OneTimeToken};
use crate::ports::{AccountRepository, Notification, NotificationSender, NotificationTemplate};

/// Command to mail a fresh confirm token.
#[derive(Debug, Clone)]
pub struct StartConfirmationCommand {
    pub email: String,
}

/// Handler that replaces the confirm token of an unconfirmed account and
/// mails the new one. Earlier tokens stop working.
pub struct StartConfirmationHandler {
    accounts: Arc<dyn AccountRepository>,
    notifier: Arc<dyn NotificationSender>,
}

impl StartConfirmationHandler {
    pub fn new(
        accounts: Arc<dyn AccountRepository>,
        notifier: Arc<dyn NotificationSender>,
    ) -> Self {
        Self { accounts, notifier }
    }

    pub async fn handle(&self, cmd: StartConfirmationCommand) -> Result<(), AccountError> {
        let email = normalize_email(&cmd.email);
        let account = self
            .accounts
            .find_by_email(&email)
            .await?
            .ok_or_else(|| AccountError::email_unknown(email.clone()))?;

        if account.is_confirmed() {
            return Err(AccountError::AlreadyConfirmed);
        }

        let token = OneTimeToken::generate();
        // Confirmed in between: the conditional write refuses.
        if !self.accounts.replace_confirm_token(&account.id, &token).await? {
            return Err(AccountError::AlreadyConfirmed);
        }

        self.notifier
            .send(Notification {
                to: account.email,
                template: NotificationTemplate::ConfirmAccount,
                token,
            })
            .await?;

        tracing::info!(account_id = %account.id, "Confirm token re-sent");
        Ok(())
    }
}
