//! In-memory substrates with fault injection

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;

use super::{KeyValueStore, SecureStore};
use crate::error::{Result, StoreError};

#[derive(Debug, Default)]
struct Faults {
    reads: AtomicBool,
    writes: AtomicBool,
    deletes: AtomicBool,
}

impl Faults {
    fn check(flag: &AtomicBool, op: &str) -> Result<()> {
        if flag.load(Ordering::SeqCst) {
            Err(StoreError::unavailable(format!("simulated {} failure", op)))
        } else {
            Ok(())
        }
    }
}

/// Volatile [`SecureStore`].
///
/// [`poison`](Self::poison) makes reads of one key fail as corrupted until that key is
/// deleted or overwritten, mimicking a keychain entry that can no longer be decrypted.
#[derive(Debug, Default)]
pub struct MemorySecureStore {
    items: RwLock<HashMap<String, String>>,
    poisoned: RwLock<HashSet<String>>,
    faults: Faults,
}

impl MemorySecureStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn poison(&self, key: &str) {
        self.poisoned.write().await.insert(key.to_string());
    }

    pub async fn is_poisoned(&self, key: &str) -> bool {
        self.poisoned.read().await.contains(key)
    }

    pub fn fail_reads(&self, fail: bool) {
        self.faults.reads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_writes(&self, fail: bool) {
        self.faults.writes.store(fail, Ordering::SeqCst);
    }

    pub fn fail_deletes(&self, fail: bool) {
        self.faults.deletes.store(fail, Ordering::SeqCst);
    }

    /// Stored value, bypassing poison and fault flags
    pub async fn raw_get(&self, key: &str) -> Option<String> {
        self.items.read().await.get(key).cloned()
    }

    pub async fn len(&self) -> usize {
        self.items.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.items.read().await.is_empty()
    }
}

#[async_trait]
impl SecureStore for MemorySecureStore {
    async fn get_item(&self, key: &str) -> Result<Option<String>> {
        Faults::check(&self.faults.reads, "read")?;
        if self.is_poisoned(key).await {
            return Err(StoreError::corrupted(key));
        }
        Ok(self.items.read().await.get(key).cloned())
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<()> {
        Faults::check(&self.faults.writes, "write")?;
        self.items
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        self.poisoned.write().await.remove(key);
        Ok(())
    }

    async fn delete_item(&self, key: &str) -> Result<()> {
        Faults::check(&self.faults.deletes, "delete")?;
        self.items.write().await.remove(key);
        self.poisoned.write().await.remove(key);
        Ok(())
    }
}

/// Volatile [`KeyValueStore`]
#[derive(Debug, Default)]
pub struct MemoryKeyValueStore {
    items: RwLock<HashMap<String, String>>,
    faults: Faults,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_reads(&self, fail: bool) {
        self.faults.reads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_writes(&self, fail: bool) {
        self.faults.writes.store(fail, Ordering::SeqCst);
    }

    pub fn fail_deletes(&self, fail: bool) {
        self.faults.deletes.store(fail, Ordering::SeqCst);
    }

    pub async fn raw_get(&self, key: &str) -> Option<String> {
        self.items.read().await.get(key).cloned()
    }

    /// Plant `value` directly, ignoring fault flags
    pub async fn raw_set(&self, key: &str, value: &str) {
        self.items
            .write()
            .await
            .insert(key.to_string(), value.to_string());
    }
}

#[async_trait]
impl KeyValueStore for MemoryKeyValueStore {
    async fn get_item(&self, key: &str) -> Result<Option<String>> {
        Faults::check(&self.faults.reads, "read")?;
        Ok(self.items.read().await.get(key).cloned())
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<()> {
        Faults::check(&self.faults.writes, "write")?;
        self.raw_set(key, value).await;
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> Result<()> {
        Faults::check(&self.faults.deletes, "delete")?;
        self.items.write().await.remove(key);
        Ok(())
    }
}
