//! Payment intake error types.
//!
//! Authenticity failures and malformed payloads are 4xx so the processor
//! stops redelivering them. Storage faults and consistency faults are 5xx.
//! Nothing here retries on its own.

use thiserror::Error;

use crate::domain::foundation::{DomainError, ErrorCode, GiftCodeId};

/// Errors that occur while ingesting a payment notification.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntakeError {
    /// Signature does not match the payload.
    #[error("Invalid signature")]
    InvalidSignature,

    /// Signed more than five minutes ago.
    #[error("Timestamp out of range")]
    TimestampOutOfRange,

    /// Signed in the future beyond clock skew tolerance.
    #[error("Invalid timestamp")]
    InvalidTimestamp,

    /// The `Stripe-Signature` header is missing or unparseable.
    #[error("Malformed signature header: {0}")]
    MalformedHeader(String),

    /// Authentic payload that is not a well-formed event.
    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    #[error("Missing metadata: {0}")]
    MissingMetadata(&'static str),

    #[error("Invalid metadata '{field}': {reason}")]
    InvalidMetadata { field: &'static str, reason: String },

    /// The payment references a gift that was never created.
    #[error("Gift {0} referenced by payment does not exist")]
    GiftMissing(GiftCodeId),

    /// A different payment event already funds this gift.
    #[error("Gift {0} is already funded by another payment")]
    GiftAlreadyFunded(GiftCodeId),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl IntakeError {
    pub fn code(&self) -> ErrorCode {
        match self {
            IntakeError::InvalidSignature
            | IntakeError::TimestampOutOfRange
            | IntakeError::InvalidTimestamp
            | IntakeError::MalformedHeader(_) => ErrorCode::AuthenticationFailed,
            IntakeError::MalformedPayload(_)
            | IntakeError::MissingMetadata(_)
            | IntakeError::InvalidMetadata { .. } => ErrorCode::ValidationFailed,
            IntakeError::GiftMissing(_) | IntakeError::GiftAlreadyFunded(_) => {
                ErrorCode::InternalError
            }
            IntakeError::Storage(_) => ErrorCode::DatabaseError,
        }
    }

    /// True when the notification could not be authenticated.
    pub fn is_authentication_failure(&self) -> bool {
        self.code() == ErrorCode::AuthenticationFailed
    }
}

impl From<DomainError> for IntakeError {
    fn from(err: DomainError) -> Self {
        IntakeError::Storage(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signature_failures_are_authentication_failures() {
        assert!(IntakeError::InvalidSignature.is_authentication_failure());
        assert!(IntakeError::TimestampOutOfRange.is_authentication_failure());
        assert!(IntakeError::InvalidTimestamp.is_authentication_failure());
        assert!(IntakeError::MalformedHeader("x".into()).is_authentication_failure());
        assert_eq!(IntakeError::InvalidSignature.code().as_str(), "authentication-failed");
    }

    #[test]
    fn metadata_problems_are_validation_failures() {
        assert_eq!(IntakeError::MissingMetadata("userID").code(), ErrorCode::ValidationFailed);
        assert_eq!(
            IntakeError::InvalidMetadata { field: "shares", reason: "zero".into() }.code(),
            ErrorCode::ValidationFailed
        );
    }

    #[test]
    fn missing_gift_is_internal() {
        assert_eq!(IntakeError::GiftMissing(GiftCodeId::new()).code().as_str(), "internal");
    }

    #[test]
    fn display_names_the_gift() {
        let id = GiftCodeId::new();
        assert!(IntakeError::GiftMissing(id).to_string().contains(&id.to_string()));
    }
}
