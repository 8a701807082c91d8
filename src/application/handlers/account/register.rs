//! RegisterHandler - Command handler for member registration.

use std::sync::Arc;

use crate::domain::account::{Account, AccountError, OneTimeToken, Registration, RegistrationInput};
use crate::domain::foundation::{AccountId, DomainError, ErrorCode};
use crate::ports::{
    AccountRepository, CreateCustomerRequest, Notification, NotificationSender,
    NotificationTemplate, PasswordHasher, PaymentProvider,
};

/// Command to register a new member.
#[derive(Debug, Clone)]
pub struct RegisterCommand {
    pub input: RegistrationInput,
}

/// Result of a successful registration.
#[derive(Debug, Clone)]
pub struct RegisterResult {
    pub account_id: AccountId,
}

/// Handler for registering members.
///
/// Creates the payment customer, stores the unconfirmed account with a fresh
/// confirm token, then mails the token. If the mail fails the account stays
/// and the member asks for a new token.
pub struct RegisterHandler {
    accounts: Arc<dyn AccountRepository>,
    payment_provider: Arc<dyn PaymentProvider>,
    hasher: Arc<dyn PasswordHasher>,
    notifier: Arc<dyn NotificationSender>,
}

impl RegisterHandler {
    pub fn new(
        accounts: Arc<dyn AccountRepository>,
        payment_provider: Arc<dyn PaymentProvider>,
        hasher: Arc<dyn PasswordHasher>,
        notifier: Arc<dyn NotificationSender>,
    ) -> Self {
        Self {
            accounts,
            payment_provider,
            hasher,
            notifier,
        }
    }

    pub async fn handle(&self, cmd: RegisterCommand) -> Result<RegisterResult, AccountError> {
        // 1. Validate input
        let registration = Registration::try_new(cmd.input)?;
        let email = registration.email.clone();

        // 2. Refuse known emails before touching the payment provider
        if self.accounts.email_exists(&email).await? {
            return Err(AccountError::email_in_use(email));
        }

        // 3. Hash the password and create the payment customer
        let password_hash = self.hasher.hash(&registration.password).await?;
        let customer = self
            .payment_provider
            .create_customer(CreateCustomerRequest {
                email: email.clone(),
                name: registration.profile.full_name(),
                phone: Some(registration.profile.phone_number.clone()),
            })
            .await
            .map_err(DomainError::from)?;

        // 4. Persist; the unique constraint settles concurrent registrations
        let confirm_token = OneTimeToken::generate();
        let account = Account::register(
            registration,
            password_hash,
            customer.id,
            confirm_token.clone(),
        );
        self.accounts.insert(&account).await.map_err(|e| {
            if e.code == ErrorCode::EmailInUse {
                AccountError::email_in_use(email.clone())
            } else {
                e.into()
            }
        })?;

        tracing::info!(account_id = %account.id, "Account registered");

        // 5. Mail the confirm token
        self.notifier
            .send(Notification {
                to: email,
                template: NotificationTemplate::ConfirmAccount,
                token: confirm_token,
            })
            .await?;

        Ok(RegisterResult {
            account_id: account.id,
        })
    }
}
