//! Whole-document persistence for [`NotificationSettings`]

use super::model::{NotificationSettings, ReminderConfig};
use crate::error::Result;
use crate::storage::KeyValueStore;

/// Reads and writes the settings document stored as JSON under a single key.
///
/// Every change is a full read-modify-write of the document. Nothing serializes concurrent
/// [`mutate`](Self::mutate) calls: two that interleave both load the same document and the
/// later save discards the earlier one's entry.
pub struct SettingsRepository<K> {
    store: K,
    key: String,
}

impl<K: KeyValueStore> SettingsRepository<K> {
    pub fn new(store: K, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn store(&self) -> &K {
        &self.store
    }

    /// Absent or empty content is an empty document. Content that is not a JSON object is an
    /// error; individual entries are never validated.
    pub async fn load(&self) -> Result<NotificationSettings> {
        match self.store.get_item(&self.key).await? {
            Some(json) if !json.is_empty() => Ok(serde_json::from_str(&json)?),
            _ => Ok(NotificationSettings::default()),
        }
    }

    pub async fn save(&self, settings: &NotificationSettings) -> Result<()> {
        let json = serde_json::to_string(settings)?;
        self.store.set_item(&self.key, &json).await
    }

    /// Replace the entry `name` with `f(previous)` and write the document back.
    ///
    /// A stored document that cannot be parsed is replaced by one holding only the new entry.
    pub async fn mutate<F>(&self, name: &str, f: F) -> Result<NotificationSettings>
    where
        F: FnOnce(Option<ReminderConfig>) -> ReminderConfig + Send,
    {
        let mut settings = match self.load().await {
            Ok(settings) => settings,
            Err(e) if e.is_corruption() => {
                log::warn!("Discarding unreadable settings document {}: {}", self.key, e);
                NotificationSettings::default()
            }
            Err(e) => return Err(e),
        };

        let previous = settings.remove(name);
        settings.insert(name, f(previous));
        self.save(&settings).await?;
        Ok(settings)
    }

    pub async fn clear(&self) -> Result<()> {
        self.store.remove_item(&self.key).await
    }
}
