//! Outbound email notifications.
//!
//! Only two messages exist: the confirmation token mailed at registration
//! (or on request) and the password reset token.

use async_trait::async_trait;

use crate::domain::account::OneTimeToken;
use crate::domain::foundation::DomainError;

/// Which transactional email to send.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationTemplate {
    ConfirmAccount,
    ResetAccount,
}

impl NotificationTemplate {
    /// Template name on the mail provider.
    pub fn name(&self) -> &'static str {
        match self {
            NotificationTemplate::ConfirmAccount => "confirm-account",
            NotificationTemplate::ResetAccount => "reset-account",
        }
    }

    pub fn subject(&self) -> &'static str {
        match self {
            NotificationTemplate::ConfirmAccount => "Confirm your account",
            NotificationTemplate::ResetAccount => "Reset your password",
        }
    }
}

/// One email carrying a one-time token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub to: String,
    pub template: NotificationTemplate,
    pub token: OneTimeToken,
}

/// Port for sending transactional email.
///
/// Failures surface as `ExternalServiceError`. Nothing is retried.
#[async_trait]
pub trait NotificationSender: Send + Sync {
    async fn send(&self, notification: Notification) -> Result<(), DomainError>;
}
