//! Non-sensitive key-value persistence in a single JSON file

use async_trait::async_trait;
use std::collections::HashMap;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tokio::fs;

use super::KeyValueStore;
use crate::error::{Result, StoreError};

pub const DEFAULT_FILE_NAME: &str = "kv_store.json";

/// [`KeyValueStore`] that keeps every key in one JSON object on disk.
///
/// Each operation reads the file; writes go to a uniquely named temporary file that is renamed
/// over the original, so a crash never leaves a half-written document behind. Concurrent
/// writers never fail, but the last rename wins.
pub struct FileKeyValueStore {
    path: PathBuf,
}

impl FileKeyValueStore {
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self::with_file_name(data_dir, DEFAULT_FILE_NAME)
    }

    pub fn with_file_name(data_dir: impl AsRef<Path>, file_name: &str) -> Self {
        Self {
            path: data_dir.as_ref().join(file_name),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<HashMap<String, String>> {
        match fs::read_to_string(&self.path).await {
            Ok(json) => Ok(serde_json::from_str(&json)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(HashMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn persist(&self, items: &HashMap<String, String>) -> Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir).await?;

        let json = serde_json::to_string_pretty(items)?;
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || -> std::io::Result<()> {
            // Unique per writer, so concurrent writers never rename each other's file away
            let mut tmp = NamedTempFile::new_in(&dir)?;
            tmp.write_all(json.as_bytes())?;
            tmp.as_file().sync_all()?;
            tmp.persist(&path).map_err(|e| e.error)?;
            Ok(())
        })
        .await
        .map_err(|e| StoreError::unavailable(e.to_string()))??;
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for FileKeyValueStore {
    async fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.load().await?.remove(key))
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let mut items = self.load().await?;
        items.insert(key.to_string(), value.to_string());
        self.persist(&items).await
    }

    async fn remove_item(&self, key: &str) -> Result<()> {
        let mut items = self.load().await?;
        if items.remove(key).is_some() {
            self.persist(&items).await?;
        }
        Ok(())
    }
}
