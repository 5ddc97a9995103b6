//! Where and how the stores persist their data

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::settings::SETTINGS_KEY;
use crate::storage::{cache::DEFAULT_FILE_NAME, keyring_store::DEFAULT_SERVICE_NAME};

const APP_DIR_NAME: &str = "daisy";
const VAULT_DIR_NAME: &str = "vault";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PersistenceConfig {
    /// Keychain service the credential entries are filed under
    pub service_name: String,
    /// Key holding the notification settings document
    pub settings_key: String,
    pub data_dir: PathBuf,
    pub kv_file_name: String,
    /// Passphrase for the encrypted file store; the machine identity is used when unset
    pub vault_passphrase: Option<String>,
}

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(APP_DIR_NAME)
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            service_name: DEFAULT_SERVICE_NAME.to_string(),
            settings_key: SETTINGS_KEY.to_string(),
            data_dir: default_data_dir(),
            kv_file_name: DEFAULT_FILE_NAME.to_string(),
            vault_passphrase: None,
        }
    }
}

impl PersistenceConfig {
    /// Defaults overridden by `DAISY_SERVICE_NAME`, `DAISY_DATA_DIR` and `DAISY_VAULT_PASSPHRASE`
    pub fn from_env() -> Self {
        Self::default().with_overrides(|name| std::env::var(name).ok())
    }

    /// Read a JSON config file; fields it omits keep their defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    fn with_overrides(mut self, var: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(service_name) = var("DAISY_SERVICE_NAME") {
            self.service_name = service_name;
        }
        if let Some(data_dir) = var("DAISY_DATA_DIR") {
            self.data_dir = PathBuf::from(data_dir);
        }
        if let Some(passphrase) = var("DAISY_VAULT_PASSPHRASE") {
            self.vault_passphrase = Some(passphrase);
        }
        self
    }

    pub fn vault_dir(&self) -> PathBuf {
        self.data_dir.join(VAULT_DIR_NAME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = PersistenceConfig::default();
        assert_eq!(config.settings_key, "@daisy_notification_settings");
        assert_eq!(config.service_name, DEFAULT_SERVICE_NAME);
        assert!(config.data_dir.ends_with(APP_DIR_NAME));
        assert_eq!(config.vault_passphrase, None);
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            ("DAISY_DATA_DIR", "/var/lib/daisy"),
            ("DAISY_VAULT_PASSPHRASE", "hunter2"),
        ]
        .into_iter()
        .collect();

        let config = PersistenceConfig::default()
            .with_overrides(|name| vars.get(name).map(|v| v.to_string()));

        assert_eq!(config.data_dir, PathBuf::from("/var/lib/daisy"));
        assert_eq!(config.vault_dir(), PathBuf::from("/var/lib/daisy/vault"));
        assert_eq!(config.vault_passphrase.as_deref(), Some("hunter2"));
        assert_eq!(config.service_name, DEFAULT_SERVICE_NAME);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("persistence.json");
        std::fs::write(&path, r#"{ "service_name": "com.daisy.staging" }"#).unwrap();

        let config = PersistenceConfig::from_file(&path).unwrap();
        assert_eq!(config.service_name, "com.daisy.staging");
        assert_eq!(config.settings_key, SETTINGS_KEY);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        assert!(PersistenceConfig::from_file(Path::new("/nonexistent/daisy.json")).is_err());
    }
}
