//! Error taxonomy shared by the storage substrates and the stores built on them

use crate::storage::encrypted::EncryptedStorageError;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Keyring error: {0}")]
    Keyring(#[from] keyring::Error),
    #[error("Encrypted storage error: {0}")]
    Encrypted(#[from] EncryptedStorageError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Corrupted entry for key {0}")]
    Corrupted(String),
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    pub fn corrupted(key: impl Into<String>) -> Self {
        Self::Corrupted(key.into())
    }

    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable(reason.into())
    }

    /// True when the stored bytes exist but cannot be turned back into a value.
    pub fn is_corruption(&self) -> bool {
        match self {
            Self::Corrupted(_) | Self::Serde(_) => true,
            Self::Encrypted(e) => !matches!(
                e,
                EncryptedStorageError::Io(_) | EncryptedStorageError::Task(_)
            ),
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;
