//! Foundation module - Shared domain primitives.
//!
//! Contains identifiers, timestamps, authentication and error types that
//! form the vocabulary of the share ledger.

mod auth;
mod errors;
mod ids;
mod timestamp;

pub use auth::{AuthError, Principal, Role};
pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{AccountId, DocumentId, GiftCodeId, PaymentId};
pub use timestamp::Timestamp;
