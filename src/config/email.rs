//! Email configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Email configuration (Mailgun)
#[derive(Debug, Clone, Deserialize)]
pub struct EmailConfig {
    pub mailgun_api_key: String,

    /// Sending domain registered with Mailgun
    pub mailgun_domain: String,

    /// API base, `https://api.eu.mailgun.net` for EU domains
    #[serde(default = "default_api_base")]
    pub mailgun_api_base: String,

    #[serde(default = "default_from_email")]
    pub from_email: String,

    #[serde(default = "default_from_name")]
    pub from_name: String,

    #[serde(default = "default_timeout")]
    pub request_timeout_secs: u64,
}

impl EmailConfig {
    /// Get formatted "From" header value
    pub fn from_header(&self) -> String {
        format!("{} <{}>", self.from_name, self.from_email)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Messages endpoint for the configured domain.
    pub fn messages_url(&self) -> String {
        format!(
            "{}/v3/{}/messages",
            self.mailgun_api_base.trim_end_matches('/'),
            self.mailgun_domain
        )
    }

    /// Validate email configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.mailgun_api_key.is_empty() {
            return Err(ValidationError::MissingRequired("MAILGUN_API_KEY"));
        }
        if self.mailgun_domain.is_empty() {
            return Err(ValidationError::MissingRequired("MAILGUN_DOMAIN"));
        }
        if !self.from_email.contains('@') {
            return Err(ValidationError::InvalidFromEmail);
        }
        if self.request_timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            mailgun_api_key: String::new(),
            mailgun_domain: String::new(),
            mailgun_api_base: default_api_base(),
            from_email: default_from_email(),
            from_name: default_from_name(),
            request_timeout_secs: default_timeout(),
        }
    }
}

fn default_api_base() -> String {
    "https://api.mailgun.net".to_string()
}

fn default_from_email() -> String {
    "noreply@coop.example".to_string()
}

fn default_from_name() -> String {
    "Cooperative".to_string()
}

fn default_timeout() -> u64 {
    10
}
