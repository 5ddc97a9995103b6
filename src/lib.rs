//! Local persistence for the Daisy app: a self-healing session token cache and the
//! notification reminder preferences.

pub mod auth;
pub mod config;
pub mod credential_cache;
pub mod error;
pub mod notifications;
pub mod settings;
pub mod storage;

pub use auth::TokenCache;
pub use config::PersistenceConfig;
pub use credential_cache::SecureCredentialCache;
pub use error::{Result, StoreError};
pub use notifications::{DisabledScheduler, NotificationScheduler, NotificationService};
pub use settings::{LocalSettingsStore, NotificationSettings, ReminderConfig, ReminderOptions};

use storage::{EncryptedFileStore, FileKeyValueStore, KeyringStore};

/// Token cache backed by the OS keychain
pub fn open_keyring_cache(config: &PersistenceConfig) -> SecureCredentialCache<KeyringStore> {
    SecureCredentialCache::new(KeyringStore::new(config.service_name.clone()))
}

/// Token cache backed by encrypted files, for platforms without a usable keychain
pub fn open_encrypted_cache(config: &PersistenceConfig) -> SecureCredentialCache<EncryptedFileStore> {
    SecureCredentialCache::new(EncryptedFileStore::new(
        config.vault_dir(),
        config.vault_passphrase.clone(),
    ))
}

pub fn open_settings_store(config: &PersistenceConfig) -> LocalSettingsStore<FileKeyValueStore> {
    LocalSettingsStore::with_key(
        FileKeyValueStore::with_file_name(&config.data_dir, &config.kv_file_name),
        config.settings_key.clone(),
    )
}
