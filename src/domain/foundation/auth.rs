//! Authentication types for the domain layer.
//!
//! A [`Principal`] is produced once per request by the HTTP auth middleware
//! after the bearer token has been verified by a `TokenIssuer`, then handed to
//! handlers through typed extractors. Nothing downstream looks identity up by
//! string key.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{AccountId, DomainError, ErrorCode};

/// Capability level carried in a bearer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Member,
    Admin,
}

impl Role {
    /// Maps the stored `admin` flag to a role.
    pub fn from_admin_flag(admin: bool) -> Self {
        if admin {
            Role::Admin
        } else {
            Role::Member
        }
    }
}

/// Verified identity of the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Principal {
    pub account_id: AccountId,
    pub role: Role,
}

impl Principal {
    pub fn new(account_id: AccountId, role: Role) -> Self {
        Self { account_id, role }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Admin gate. Fails with [`AuthError::NotAdmin`] for members.
    pub fn require_admin(&self) -> Result<(), AuthError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(AuthError::NotAdmin)
        }
    }
}

/// Failures of bearer-token authentication and the admin gate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// Neither a `token` query parameter nor a bearer header was present.
    #[error("Authorization header missing")]
    HeaderMissing,

    /// The token is malformed or its signature does not verify.
    #[error("Invalid token")]
    InvalidToken,

    #[error("Token expired")]
    TokenExpired,

    #[error("Admin role required")]
    NotAdmin,

    /// Signing failed or the key material is unusable.
    #[error("Token service failure: {0}")]
    Internal(String),
}

impl AuthError {
    pub fn code(&self) -> ErrorCode {
        match self {
            AuthError::HeaderMissing => ErrorCode::AuthorizationHeaderMissing,
            AuthError::InvalidToken => ErrorCode::TokenInvalid,
            AuthError::TokenExpired => ErrorCode::TokenExpired,
            AuthError::NotAdmin => ErrorCode::NotAdmin,
            AuthError::Internal(_) => ErrorCode::InternalError,
        }
    }
}

impl From<AuthError> for DomainError {
    fn from(err: AuthError) -> Self {
        DomainError::new(err.code(), err.to_string())
    }
}
