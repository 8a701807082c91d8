//! Email adapters.
//!
//! - `MailgunSender` - Template mail through the Mailgun HTTP API
//! - `RecordingNotificationSender` - Keeps messages in memory

mod mailgun_sender;
mod recording_sender;

pub use mailgun_sender::MailgunSender;
pub use recording_sender::RecordingNotificationSender;
