//! Error types for the domain layer.

use std::collections::HashMap;
use std::error::Error;
use std::fmt;
use thiserror::Error;

/// Errors that occur during value object construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Field '{field}' cannot be empty")]
    EmptyField { field: String },

    #[error("Field '{field}' must be between {min} and {max}, got {actual}")]
    OutOfRange {
        field: String,
        min: i64,
        max: i64,
        actual: i64,
    },

    #[error("Field '{field}' has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

impl ValidationError {
    /// Creates an empty field validation error.
    pub fn empty_field(field: impl Into<String>) -> Self {
        ValidationError::EmptyField { field: field.into() }
    }

    /// Creates an out of range validation error.
    pub fn out_of_range(field: impl Into<String>, min: i64, max: i64, actual: i64) -> Self {
        ValidationError::OutOfRange {
            field: field.into(),
            min,
            max,
            actual,
        }
    }

    /// Creates an invalid format validation error.
    pub fn invalid_format(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::InvalidFormat {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Machine-readable error kinds surfaced to callers.
///
/// Every kind renders to a distinct code string via [`ErrorCode::as_str`],
/// except the infrastructure kinds which all collapse to `internal`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Request validation
    ValidationFailed,

    // Bearer token checks
    AuthorizationHeaderMissing,
    TokenInvalid,
    TokenExpired,
    NotAdmin,

    // Lookups
    NotFound,
    EmailUnknown,
    IdUnknown,

    // Account flows
    EmailInUse,
    PasswordInvalid,
    NotConfirmed,
    AlreadyConfirmed,
    BadToken,

    // Gift redemption
    AlreadyClaimed,
    NotYetFunded,

    // Webhook authenticity
    AuthenticationFailed,

    // Infrastructure
    DatabaseError,
    ExternalServiceError,
    InternalError,
}

impl ErrorCode {
    /// Returns the code string callers match on.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::ValidationFailed => "bad-request",
            ErrorCode::AuthorizationHeaderMissing => "authorization-header-missing",
            ErrorCode::TokenInvalid => "token-invalid",
            ErrorCode::TokenExpired => "token-expired",
            ErrorCode::NotAdmin => "not-admin",
            ErrorCode::NotFound => "not-found",
            ErrorCode::EmailUnknown => "email-unknown",
            ErrorCode::IdUnknown => "id-unknown",
            ErrorCode::EmailInUse => "email-used",
            ErrorCode::PasswordInvalid => "password-invalid",
            ErrorCode::NotConfirmed => "not-confirmed",
            ErrorCode::AlreadyConfirmed => "confirmed",
            ErrorCode::BadToken => "bad-token",
            ErrorCode::AlreadyClaimed => "gift-code-claimed",
            ErrorCode::NotYetFunded => "gift-code-not-funded",
            ErrorCode::AuthenticationFailed => "authentication-failed",
            ErrorCode::DatabaseError
            | ErrorCode::ExternalServiceError
            | ErrorCode::InternalError => "internal",
        }
    }

    /// True for storage, provider and unexpected-state faults.
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            ErrorCode::DatabaseError | ErrorCode::ExternalServiceError | ErrorCode::InternalError
        )
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Standard domain error with code, message, and optional details.
#[derive(Debug, Clone)]
pub struct DomainError {
    pub code: ErrorCode,
    pub message: String,
    pub details: HashMap<String, String>,
}

impl DomainError {
    /// Creates a new domain error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: HashMap::new(),
        }
    }

    /// Creates a validation error for a specific field.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValidationFailed, message).with_detail("field", field.into())
    }

    /// Creates a storage failure.
    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::DatabaseError, message)
    }

    /// Creates an unexpected-state failure.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// Adds a detail to the error.
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl Error for DomainError {}

impl From<ValidationError> for DomainError {
    fn from(err: ValidationError) -> Self {
        let field = match &err {
            ValidationError::EmptyField { field }
            | ValidationError::OutOfRange { field, .. }
            | ValidationError::InvalidFormat { field, .. } => field.clone(),
        };
        DomainError::validation(field, err.to_string())
    }
}
