//! Best-effort notification preference store

use super::model::{NotificationSettings, ReminderConfig, ReminderOptions};
use super::repository::SettingsRepository;
use crate::storage::KeyValueStore;

pub const SETTINGS_KEY: &str = "@daisy_notification_settings";
pub const DAILY_CHECKIN: &str = "dailyCheckin";
pub const EVENING_REFLECTION: &str = "eveningReflection";

/// Named reminder preferences kept in one settings document.
///
/// No operation reports failure: storage errors are logged and reads fall back to an empty
/// document.
pub struct LocalSettingsStore<K> {
    repository: SettingsRepository<K>,
}

impl<K: KeyValueStore> LocalSettingsStore<K> {
    pub fn new(store: K) -> Self {
        Self::with_key(store, SETTINGS_KEY)
    }

    pub fn with_key(store: K, key: impl Into<String>) -> Self {
        Self {
            repository: SettingsRepository::new(store, key),
        }
    }

    pub fn repository(&self) -> &SettingsRepository<K> {
        &self.repository
    }

    /// Store `options` as the reminder `name`, replacing any previous entry of that name.
    /// `enabled` is `true` unless the options say otherwise.
    pub async fn set_reminder(&self, name: &str, options: ReminderOptions) {
        if let Err(e) = self
            .repository
            .mutate(name, move |_| options.into_config())
            .await
        {
            log::error!("Error saving notification setting {}: {}", name, e);
        }
    }

    pub async fn get_reminder(&self, name: &str) -> Option<ReminderConfig> {
        self.get_settings().await.remove(name)
    }

    pub async fn get_settings(&self) -> NotificationSettings {
        match self.repository.load().await {
            Ok(settings) => settings,
            Err(e) => {
                log::error!("Error getting notification settings: {}", e);
                NotificationSettings::default()
            }
        }
    }

    /// Delete every reminder at once
    pub async fn clear_all(&self) {
        if let Err(e) = self.repository.clear().await {
            log::error!("Error clearing notification settings: {}", e);
        }
    }

    /// Write the daily check-in (09:00) and evening reflection (20:00) reminders.
    ///
    /// Always returns `true`; the two writes are independent and a failed one is not rolled
    /// back or reported.
    pub async fn setup_defaults(&self) -> bool {
        self.set_reminder(DAILY_CHECKIN, ReminderOptions::at(9, 0)).await;
        self.set_reminder(EVENING_REFLECTION, ReminderOptions::at(20, 0)).await;
        true
    }
}
