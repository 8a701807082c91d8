//! Local storage configuration

use serde::Deserialize;
use std::path::PathBuf;

use super::error::ValidationError;

/// Where uploaded documents and rendering assets live.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Root directory; documents go under `{data_path}/uploads`
    #[serde(default = "default_data_path")]
    pub data_path: PathBuf,

    /// SVG template for gift cards; the built-in one is used when unset
    pub gift_card_template: Option<PathBuf>,

    /// Largest accepted single document, in bytes
    #[serde(default = "default_max_document_bytes")]
    pub max_document_bytes: u64,
}

impl StorageConfig {
    pub fn uploads_path(&self) -> PathBuf {
        self.data_path.join("uploads")
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.data_path.as_os_str().is_empty() {
            return Err(ValidationError::MissingRequired("STORAGE__DATA_PATH"));
        }
        if self.max_document_bytes == 0 {
            return Err(ValidationError::InvalidUploadLimit);
        }
        Ok(())
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_path: default_data_path(),
            gift_card_template: None,
            max_document_bytes: default_max_document_bytes(),
        }
    }
}

fn default_data_path() -> PathBuf {
    PathBuf::from("data")
}

fn default_max_document_bytes() -> u64 {
    10 * 1024 * 1024
}
