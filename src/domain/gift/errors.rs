//! Gift redemption errors.

use thiserror::Error;

use crate::domain::foundation::{DomainError, ErrorCode};

/// Why a gift code could not be redeemed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RedeemError {
    #[error("Gift not found.")]
    NotFound,

    /// Someone, possibly the caller, already holds this gift.
    #[error("Gift code already claimed.")]
    AlreadyClaimed,

    /// The checkout that created the gift has not been paid yet.
    #[error("Gift code is not funded yet.")]
    NotYetFunded,

    #[error("Invalid gift code: {0}")]
    InvalidCode(String),

    #[error("{message}")]
    Infrastructure { code: ErrorCode, message: String },
}

impl RedeemError {
    pub fn code(&self) -> ErrorCode {
        match self {
            RedeemError::NotFound => ErrorCode::NotFound,
            RedeemError::AlreadyClaimed => ErrorCode::AlreadyClaimed,
            RedeemError::NotYetFunded => ErrorCode::NotYetFunded,
            RedeemError::InvalidCode(_) => ErrorCode::ValidationFailed,
            RedeemError::Infrastructure { code, .. } => *code,
        }
    }
}

impl From<DomainError> for RedeemError {
    fn from(err: DomainError) -> Self {
        RedeemError::Infrastructure {
            code: err.code,
            message: err.message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redeem_errors_map_to_distinct_codes() {
        assert_eq!(RedeemError::NotFound.code().as_str(), "not-found");
        assert_eq!(RedeemError::AlreadyClaimed.code().as_str(), "gift-code-claimed");
        assert_eq!(RedeemError::NotYetFunded.code().as_str(), "gift-code-not-funded");
    }

    #[test]
    fn storage_failures_surface_as_internal() {
        let err: RedeemError = DomainError::database("deadlock detected").into();
        assert_eq!(err.code().as_str(), "internal");
    }
}
