//! In-memory `NotificationSender` that keeps every message it is handed.
//!
//! Used in tests and by the development server when no mail provider is
//! configured.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use crate::domain::foundation::{DomainError, ErrorCode};
use crate::ports::{Notification, NotificationSender, NotificationTemplate};

#[derive(Default)]
struct State {
    sent: Vec<Notification>,
    fail: bool,
}

/// Records notifications instead of delivering them.
#[derive(Clone, Default)]
pub struct RecordingNotificationSender {
    state: Arc<Mutex<State>>,
}

impl RecordingNotificationSender {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following `send` fail.
    pub fn fail_sends(&self) {
        self.lock().fail = true;
    }

    pub fn sent(&self) -> Vec<Notification> {
        self.lock().sent.clone()
    }

    /// Most recent notification of the given kind sent to `to`.
    pub fn last_to(&self, to: &str, template: NotificationTemplate) -> Option<Notification> {
        self.lock()
            .sent
            .iter()
            .rev()
            .find(|n| n.to == to && n.template == template)
            .cloned()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl NotificationSender for RecordingNotificationSender {
    async fn send(&self, notification: Notification) -> Result<(), DomainError> {
        let mut state = self.lock();
        if state.fail {
            return Err(DomainError::new(
                ErrorCode::ExternalServiceError,
                "Mail delivery disabled",
            ));
        }
        tracing::debug!(
            to = %notification.to,
            template = notification.template.name(),
            "Recorded notification"
        );
        state.sent.push(notification);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::account::OneTimeToken;

    #[tokio::test]
    async fn records_and_finds_latest_message() {
        let sender = RecordingNotificationSender::new();
        let first = OneTimeToken::generate();
        let second = OneTimeToken::generate();
        for token in [first, second.clone()] {
            sender
                .send(Notification {
                    to: "a@b.c".to_string(),
                    template: NotificationTemplate::ConfirmAccount,
                    token,
                })
                .await
                .unwrap();
        }

        assert_eq!(sender.sent().len(), 2);
        let last = sender
            .last_to("a@b.c", NotificationTemplate::ConfirmAccount)
            .unwrap();
        assert_eq!(last.token, second);
        assert!(sender
            .last_to("a@b.c", NotificationTemplate::ResetAccount)
            .is_none());
    }

    #[tokio::test]
    async fn failing_sender_reports_external_error() {
        let sender = RecordingNotificationSender::new();
        sender.fail_sends();
        let err = sender
            .send(Notification {
                to: "a@b.c".to_string(),
                template: NotificationTemplate::ResetAccount,
                token: OneTimeToken::generate(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ExternalServiceError);
        assert!(sender.sent().is_empty());
    }
}
