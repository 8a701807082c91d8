//! Document Storage Port - identity documents uploaded by members.
//!
//! Files are opaque bytes keyed by a generated [`DocumentId`] and grouped per
//! account:
//!
//! ```text
//! {base_path}/uploads/{account_id}/{document_id}
//! ```
//!
//! Reading is scoped by account, so an admin fetching a document must name
//! the owner it was attached to.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::foundation::{AccountId, DocumentId, DomainError, ErrorCode};

/// Port for identity document bytes.
#[async_trait]
pub trait DocumentStorage: Send + Sync {
    /// Stores a document and returns its new key.
    ///
    /// Creates the account directory if needed. Writes atomically
    /// (temp file + rename).
    async fn store(&self, owner: &AccountId, content: &[u8]) -> Result<DocumentId, StorageError>;

    /// Reads a document back.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if no such document exists for `owner`.
    async fn fetch(&self, owner: &AccountId, document: &DocumentId)
        -> Result<Vec<u8>, StorageError>;
}

/// Errors that can occur during document storage operations.
#[derive(Debug, Clone, Error)]
pub enum StorageError {
    #[error("File not found: {path}")]
    NotFound { path: String },

    #[error("Permission denied: {path}")]
    PermissionDenied { path: String },

    #[error("IO error: {message}")]
    Io { message: String },

    #[error("File too large: {size_bytes} bytes (max: {max_bytes})")]
    FileTooLarge { size_bytes: u64, max_bytes: u64 },
}

impl StorageError {
    pub fn not_found(path: impl Into<String>) -> Self {
        Self::NotFound { path: path.into() }
    }

    pub fn permission_denied(path: impl Into<String>) -> Self {
        Self::PermissionDenied { path: path.into() }
    }

    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    pub fn file_too_large(size_bytes: u64, max_bytes: u64) -> Self {
        Self::FileTooLarge {
            size_bytes,
            max_bytes,
        }
    }
}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => StorageError::not_found(err.to_string()),
            std::io::ErrorKind::PermissionDenied => {
                StorageError::permission_denied(err.to_string())
            }
            _ => StorageError::io(err.to_string()),
        }
    }
}

impl From<StorageError> for DomainError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound { .. } => {
                DomainError::new(ErrorCode::NotFound, "Document not found")
            }
            StorageError::FileTooLarge { .. } => {
                DomainError::new(ErrorCode::ValidationFailed, err.to_string())
            }
            _ => DomainError::internal(err.to_string()),
        }
    }
}
