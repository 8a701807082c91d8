//! Account handlers.
//!
//! ## Commands
//! - Registration, confirmation and password reset (token mailed first)
//! - Bearer token creation (login)
//! - Identity document upload
//!
//! ## Queries
//! - The caller's own summary with share balance

mod confirm_account;
mod create_token;
mod get_me;
mod register;
mod reset_password;
mod start_confirmation;
mod start_reset;
mod upload_documents;

use crate::domain::account::AccountError;
use crate::domain::foundation::AuthError;

// Commands
pub use confirm_account::{ConfirmAccountCommand, ConfirmAccountHandler};
pub use create_token::{CreateTokenCommand, CreateTokenHandler};
pub use register::{RegisterCommand, RegisterHandler, RegisterResult};
pub use reset_password::{ResetPasswordCommand, ResetPasswordHandler};
pub use start_confirmation::{StartConfirmationCommand, StartConfirmationHandler};
pub use start_reset::{StartResetCommand, StartResetHandler};
pub use upload_documents::{DocumentUpload, UploadDocumentsCommand, UploadDocumentsHandler};

// Queries
pub use get_me::{GetMeHandler, GetMeQuery, GetMeResult};

/// Token signing failures are server faults in account flows.
fn signing_failed(err: AuthError) -> AccountError {
    tracing::error!(error = %err, "Failed to issue bearer token");
    AccountError::infrastructure("Failed to issue token")
}

/// Emails are matched case-insensitively; registration stores them lowercased.
fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
