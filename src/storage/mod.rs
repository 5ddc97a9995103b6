//! Key-value substrates the stores are built on
//!
//! - [`SecureStore`]: encrypted, OS-backed values (session tokens)
//! - [`KeyValueStore`]: plain persisted strings (preference documents)

pub mod cache;
pub mod encrypted;
pub mod keyring_store;
pub mod memory;

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;

pub use cache::FileKeyValueStore;
pub use encrypted::EncryptedFileStore;
pub use keyring_store::KeyringStore;
pub use memory::{MemoryKeyValueStore, MemorySecureStore};

#[async_trait]
pub trait SecureStore: Send + Sync {
    /// Read the value stored under `key`, `None` if nothing is stored
    async fn get_item(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value
    async fn set_item(&self, key: &str, value: &str) -> Result<()>;

    /// Delete the value under `key`. Deleting an absent key succeeds.
    async fn delete_item(&self, key: &str) -> Result<()>;
}

#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get_item(&self, key: &str) -> Result<Option<String>>;

    async fn set_item(&self, key: &str, value: &str) -> Result<()>;

    async fn remove_item(&self, key: &str) -> Result<()>;
}

#[async_trait]
impl<T: SecureStore + ?Sized> SecureStore for Arc<T> {
    async fn get_item(&self, key: &str) -> Result<Option<String>> {
        (**self).get_item(key).await
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<()> {
        (**self).set_item(key, value).await
    }

    async fn delete_item(&self, key: &str) -> Result<()> {
        (**self).delete_item(key).await
    }
}

#[async_trait]
impl<T: KeyValueStore + ?Sized> KeyValueStore for Arc<T> {
    async fn get_item(&self, key: &str) -> Result<Option<String>> {
        (**self).get_item(key).await
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<()> {
        (**self).set_item(key, value).await
    }

    async fn remove_item(&self, key: &str) -> Result<()> {
        (**self).remove_item(key).await
    }
}
