//! GetDocumentHandler - Query handler for downloading an identity document.

use std::sync::Arc;

use super::id_unknown;
use crate::domain::foundation::{AccountId, DocumentId, DomainError, ErrorCode, Principal};
use crate::ports::{AccountRepository, DocumentStorage};

#[derive(Debug, Clone)]
pub struct GetDocumentQuery {
    pub principal: Principal,
    pub account_id: AccountId,
    pub document_id: DocumentId,
}

/// Serves a document only if it is one the account currently references.
pub struct GetDocumentHandler {
    accounts: Arc<dyn AccountRepository>,
    storage: Arc<dyn DocumentStorage>,
}

impl GetDocumentHandler {
    pub fn new(accounts: Arc<dyn AccountRepository>, storage: Arc<dyn DocumentStorage>) -> Self {
        Self { accounts, storage }
    }

    pub async fn handle(&self, query: GetDocumentQuery) -> Result<Vec<u8>, DomainError> {
        query.principal.require_admin()?;
        let account = self
            .accounts
            .find_by_id(&query.account_id)
            .await?
            .ok_or_else(|| id_unknown(query.account_id))?;

        if !account.documents.all().any(|d| d == query.document_id) {
            return Err(DomainError::new(ErrorCode::NotFound, "Document not found"));
        }

        Ok(self
            .storage
            .fetch(&query.account_id, &query.document_id)
            .await?)
    }
}
