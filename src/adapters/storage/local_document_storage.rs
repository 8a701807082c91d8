//! Local Filesystem Storage Adapter - Implementation of DocumentStorage.
//!
//! Stores identity documents as opaque files grouped by account.

use async_trait::async_trait;
use std::path::PathBuf;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::domain::foundation::{AccountId, DocumentId};
use crate::ports::{DocumentStorage, StorageError};

/// Local filesystem storage for identity documents.
///
/// # Directory Structure
///
/// ```text
/// {base_path}/
/// ├── {account_id}/
/// │   ├── {document_id}
/// │   └── {document_id}
/// └── {account_id}/
///     └── {document_id}
/// ```
///
/// # Atomic Writes
///
/// Content is written to `{document_id}.tmp`, synced, then renamed into
/// place, so a crash never leaves a partial document under its final name.
#[derive(Debug, Clone)]
pub struct LocalDocumentStorage {
    base_path: PathBuf,
    max_bytes: u64,
}

impl LocalDocumentStorage {
    pub fn new(base_path: impl Into<PathBuf>, max_bytes: u64) -> Self {
        Self {
            base_path: base_path.into(),
            max_bytes,
        }
    }

    fn account_dir(&self, owner: &AccountId) -> PathBuf {
        self.base_path.join(owner.to_string())
    }

    fn document_path(&self, owner: &AccountId, document: &DocumentId) -> PathBuf {
        self.account_dir(owner).join(document.to_string())
    }

    fn temp_path(&self, owner: &AccountId, document: &DocumentId) -> PathBuf {
        self.account_dir(owner).join(format!("{}.tmp", document))
    }
}

#[async_trait]
impl DocumentStorage for LocalDocumentStorage {
    async fn store(&self, owner: &AccountId, content: &[u8]) -> Result<DocumentId, StorageError> {
        let size = content.len() as u64;
        if size > self.max_bytes {
            return Err(StorageError::file_too_large(size, self.max_bytes));
        }

        let dir = self.account_dir(owner);
        fs::create_dir_all(&dir).await.map_err(|e| {
            StorageError::io(format!(
                "Failed to create account directory {}: {}",
                dir.display(),
                e
            ))
        })?;

        let document = DocumentId::new();
        let temp_path = self.temp_path(owner, &document);
        let final_path = self.document_path(owner, &document);

        let mut file = fs::File::create(&temp_path).await.map_err(|e| {
            StorageError::io(format!(
                "Failed to create temp file {}: {}",
                temp_path.display(),
                e
            ))
        })?;
        file.write_all(content).await.map_err(|e| {
            StorageError::io(format!("Failed to write {}: {}", temp_path.display(), e))
        })?;
        file.sync_all().await.map_err(|e| {
            StorageError::io(format!("Failed to sync {}: {}", temp_path.display(), e))
        })?;

        fs::rename(&temp_path, &final_path).await.map_err(|e| {
            StorageError::io(format!(
                "Failed to rename {} to {}: {}",
                temp_path.display(),
                final_path.display(),
                e
            ))
        })?;

        tracing::debug!(account_id = %owner, document_id = %document, size, "Document stored");
        Ok(document)
    }

    async fn fetch(
        &self,
        owner: &AccountId,
        document: &DocumentId,
    ) -> Result<Vec<u8>, StorageError> {
        let path = self.document_path(owner, document);
        match fs::read(&path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::not_found(path.display().to_string()))
            }
            Err(e) => Err(StorageError::from(e)),
        }
    }
}
