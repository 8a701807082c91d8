//! UploadDocumentsHandler - Command handler for identity document upload.

use std::sync::Arc;

use crate::domain::account::IdentityDocuments;
use crate::domain::foundation::{AccountId, DocumentId, DomainError, ErrorCode};
use crate::ports::{AccountRepository, DocumentStorage};

/// One uploaded file.
#[derive(Debug, Clone)]
pub struct DocumentUpload {
    pub content: Vec<u8>,
}

/// Command to attach identity documents to an account.
///
/// The front of the identity card and the proof of address are required;
/// the back is optional.
#[derive(Debug, Clone)]
pub struct UploadDocumentsCommand {
    pub account_id: AccountId,
    pub identity_front: DocumentUpload,
    pub identity_back: Option<DocumentUpload>,
    pub address_proof: DocumentUpload,
}

/// Handler storing the files, then recording their keys on the account.
///
/// A new upload replaces the references of a previous one; old files stay
/// on disk.
pub struct UploadDocumentsHandler {
    accounts: Arc<dyn AccountRepository>,
    storage: Arc<dyn DocumentStorage>,
}

impl UploadDocumentsHandler {
    pub fn new(accounts: Arc<dyn AccountRepository>, storage: Arc<dyn DocumentStorage>) -> Self {
        Self { accounts, storage }
    }

    pub async fn handle(&self, cmd: UploadDocumentsCommand) -> Result<IdentityDocuments, DomainError> {
        for (field, upload) in [
            ("identity_front", Some(&cmd.identity_front)),
            ("identity_back", cmd.identity_back.as_ref()),
            ("address_proof", Some(&cmd.address_proof)),
        ] {
            if upload.is_some_and(|u| u.content.is_empty()) {
                return Err(DomainError::validation(field, "Uploaded file is empty"));
            }
        }

        let documents = IdentityDocuments {
            identity_front: Some(self.store(&cmd.account_id, &cmd.identity_front).await?),
            identity_back: match &cmd.identity_back {
                Some(upload) => Some(self.store(&cmd.account_id, upload).await?),
                None => None,
            },
            address_proof: Some(self.store(&cmd.account_id, &cmd.address_proof).await?),
        };

        if !self.accounts.set_documents(&cmd.account_id, &documents).await? {
            return Err(DomainError::new(ErrorCode::NotFound, "Account not found"));
        }

        tracing::info!(account_id = %cmd.account_id, "Identity documents uploaded");
        Ok(documents)
    }

    async fn store(
        &self,
        account_id: &AccountId,
        upload: &DocumentUpload,
    ) -> Result<DocumentId, DomainError> {
        Ok(self.storage.store(account_id, &upload.content).await?)
    }
}
