//! Storage adapters.
//!
//! - `LocalDocumentStorage` - Identity documents on the local filesystem

mod local_document_storage;

pub use local_document_storage::LocalDocumentStorage;
