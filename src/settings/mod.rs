//! Notification preferences persisted as one JSON document of named reminders

pub mod model;
pub mod repository;
pub mod store;

pub use model::{NotificationSettings, ReminderConfig, ReminderOptions};
pub use repository::SettingsRepository;
pub use store::{LocalSettingsStore, DAILY_CHECKIN, EVENING_REFLECTION, SETTINGS_KEY};
