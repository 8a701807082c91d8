//! Mailgun implementation of `NotificationSender`.
//!
//! Messages are sent through stored Mailgun templates. The one-time token is
//! passed as a template variable; the template builds the link around it.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use std::time::Duration;

use crate::config::EmailConfig;
use crate::domain::foundation::{DomainError, ErrorCode};
use crate::ports::{Notification, NotificationSender};

/// Sends template emails through the Mailgun messages API.
pub struct MailgunSender {
    api_key: SecretString,
    messages_url: String,
    from: String,
    http_client: reqwest::Client,
}

impl MailgunSender {
    pub fn new(config: &EmailConfig) -> Result<Self, DomainError> {
        Self::with_timeout(config, config.request_timeout())
    }

    fn with_timeout(config: &EmailConfig, timeout: Duration) -> Result<Self, DomainError> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DomainError::internal(format!("Failed to build mail client: {}", e)))?;
        Ok(Self {
            api_key: SecretString::new(config.mailgun_api_key.clone()),
            messages_url: config.messages_url(),
            from: config.from_header(),
            http_client,
        })
    }
}

/// Form fields for one templated message.
fn message_params(from: &str, notification: &Notification) -> Vec<(String, String)> {
    let variables = json!({ "token": notification.token.as_str() });
    vec![
        ("from".to_string(), from.to_string()),
        ("to".to_string(), notification.to.clone()),
        (
            "subject".to_string(),
            notification.template.subject().to_string(),
        ),
        (
            "template".to_string(),
            notification.template.name().to_string(),
        ),
        ("h:X-Mailgun-Variables".to_string(), variables.to_string()),
    ]
}

#[async_trait]
impl NotificationSender for MailgunSender {
    async fn send(&self, notification: Notification) -> Result<(), DomainError> {
        let params = message_params(&self.from, &notification);
        let response = self
            .http_client
            .post(&self.messages_url)
            .basic_auth("api", Some(self.api_key.expose_secret()))
            .form(&params)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Mailgun request failed");
                DomainError::new(ErrorCode::ExternalServiceError, "Failed to send email")
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(
                status = %status,
                template = notification.template.name(),
                body = %body,
                "Mailgun rejected message"
            );
            return Err(DomainError::new(
                ErrorCode::ExternalServiceError,
                format!("Mail provider returned {}", status),
            ));
        }

        tracing::info!(template = notification.template.name(), "Email sent");
        Ok(())
    }
}
