//! Bearer token port.
//!
//! Tokens are self-contained: verification needs only the signing key, never
//! a storage lookup. There is no revocation; a token lives until it expires.
//!
//! # Contract
//!
//! Implementations must:
//! - Return `AuthError::InvalidToken` for malformed tokens and bad signatures
//! - Return `AuthError::TokenExpired` once `exp` is in the past
//! - Round-trip the principal exactly: `verify(issue(p).token) == p`

use crate::domain::foundation::{AuthError, Principal, Timestamp};

/// A signed bearer token and its expiry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: Timestamp,
}

/// Issues and verifies signed bearer tokens.
pub trait TokenIssuer: Send + Sync {
    fn issue(&self, principal: &Principal) -> Result<IssuedToken, AuthError>;

    fn verify(&self, token: &str) -> Result<Principal, AuthError>;
}
