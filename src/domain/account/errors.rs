//! Account-flow error types.
//!
//! # HTTP Status Mapping
//!
//! | Error | Code | HTTP Status |
//! |-------|------|-------------|
//! | EmailUnknown | `email-unknown` | 400 |
//! | IdUnknown | `id-unknown` | 400 |
//! | EmailInUse | `email-used` | 400 |
//! | PasswordInvalid | `password-invalid` | 400 |
//! | NotConfirmed | `not-confirmed` | 401 |
//! | AlreadyConfirmed | `confirmed` | 400 |
//! | BadToken | `bad-token` | 401 |
//! | ValidationFailed | `bad-request` | 400 |
//! | Infrastructure | `internal` | 500 |

use crate::domain::foundation::{AccountId, DomainError, ErrorCode, ValidationError};

/// Errors raised by registration, login, confirmation and reset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountError {
    /// No account is registered with this email.
    EmailUnknown(String),

    /// No account exists with this id.
    IdUnknown(AccountId),

    /// Another account already uses this email.
    EmailInUse(String),

    PasswordInvalid,

    /// Login attempted before the email was confirmed.
    NotConfirmed,

    /// Confirmation requested for an account that is already confirmed.
    AlreadyConfirmed,

    /// The one-time token does not match, was already used, or was replaced.
    BadToken,

    ValidationFailed {
        field: String,
        message: String,
    },

    /// Storage or provider failure, or an impossible state.
    Infrastructure {
        code: ErrorCode,
        message: String,
    },
}

impl AccountError {
    pub fn email_unknown(email: impl Into<String>) -> Self {
        AccountError::EmailUnknown(email.into())
    }

    pub fn email_in_use(email: impl Into<String>) -> Self {
        AccountError::EmailInUse(email.into())
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        AccountError::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn infrastructure(message: impl Into<String>) -> Self {
        AccountError::Infrastructure {
            code: ErrorCode::InternalError,
            message: message.into(),
        }
    }

    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            AccountError::EmailUnknown(_) => ErrorCode::EmailUnknown,
            AccountError::IdUnknown(_) => ErrorCode::IdUnknown,
            AccountError::EmailInUse(_) => ErrorCode::EmailInUse,
            AccountError::PasswordInvalid => ErrorCode::PasswordInvalid,
            AccountError::NotConfirmed => ErrorCode::NotConfirmed,
            AccountError::AlreadyConfirmed => ErrorCode::AlreadyConfirmed,
            AccountError::BadToken => ErrorCode::BadToken,
            AccountError::ValidationFailed { .. } => ErrorCode::ValidationFailed,
            AccountError::Infrastructure { code, .. } => *code,
        }
    }

    /// Returns a user-facing error message.
    pub fn message(&self) -> String {
        match self {
            AccountError::EmailUnknown(_) => "No user exists with this email address.".to_string(),
            AccountError::IdUnknown(_) => "No user exists with this ID.".to_string(),
            AccountError::EmailInUse(_) => {
                "A user with this email address already exists.".to_string()
            }
            AccountError::PasswordInvalid => "This password is invalid.".to_string(),
            AccountError::NotConfirmed => "This account is not confirmed.".to_string(),
            AccountError::AlreadyConfirmed => "This account is already confirmed.".to_string(),
            AccountError::BadToken => "This token is invalid.".to_string(),
            AccountError::ValidationFailed { field, message } => {
                format!("Validation failed for '{}': {}", field, message)
            }
            AccountError::Infrastructure { message, .. } => message.clone(),
        }
    }
}

impl std::fmt::Display for AccountError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for AccountError {}

impl From<DomainError> for AccountError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::ValidationFailed => AccountError::ValidationFailed {
                field: err.details.get("field").cloned().unwrap_or_default(),
                message: err.message,
            },
            code => AccountError::Infrastructure {
                code,
                message: err.message,
            },
        }
    }
}

impl From<ValidationError> for AccountError {
    fn from(err: ValidationError) -> Self {
        DomainError::from(err).into()
    }
}

impl From<AccountError> for DomainError {
    fn from(err: AccountError) -> Self {
        DomainError::new(err.code(), err.message())
    }
}
