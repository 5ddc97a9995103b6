//! Self-healing token cache over a [`SecureStore`]

use async_trait::async_trait;

use crate::auth::TokenCache;
use crate::error::Result;
use crate::storage::SecureStore;

/// Adapts a [`SecureStore`] to the `{get, save}` shape an auth provider expects.
///
/// Values are opaque and passed through unchanged. Every failure is absorbed at this
/// boundary: a read that fails evicts the entry and reports it as absent, a write that fails
/// is dropped. [`try_get`](Self::try_get) and [`try_save`](Self::try_save) expose the
/// underlying errors for diagnostics.
pub struct SecureCredentialCache<S> {
    store: S,
}

impl<S: SecureStore> SecureCredentialCache<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub async fn try_get(&self, key: &str) -> Result<Option<String>> {
        self.store.get_item(key).await
    }

    pub async fn try_save(&self, key: &str, value: &str) -> Result<()> {
        self.store.set_item(key, value).await
    }

    /// Stored value for `key`; `None` when absent or unreadable.
    ///
    /// An unreadable entry is deleted so the next [`save`](Self::save) starts clean.
    pub async fn get(&self, key: &str) -> Option<String> {
        match self.try_get(key).await {
            Ok(value) => value,
            Err(e) => {
                log::warn!("Failed to read credential {}: {}; evicting", key, e);
                self.evict(key).await;
                None
            }
        }
    }

    pub async fn save(&self, key: &str, value: &str) {
        if let Err(e) = self.try_save(key, value).await {
            log::warn!("Failed to save credential {}: {}", key, e);
        }
    }

    async fn evict(&self, key: &str) {
        match self.store.delete_item(key).await {
            Ok(()) => log::debug!("Evicted unreadable credential {}", key),
            Err(e) => log::debug!("Eviction of credential {} failed: {}", key, e),
        }
    }
}

#[async_trait]
impl<S: SecureStore> TokenCache for SecureCredentialCache<S> {
    async fn get_token(&self, key: &str) -> Option<String> {
        self.get(key).await
    }

    async fn save_token(&self, key: &str, token: &str) {
        self.save(key, token).await
    }
}
