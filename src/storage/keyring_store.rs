//! OS Keychain integration for secure credential storage
//! - Windows: Credential Manager
//! - macOS: Keychain
//! - Linux: Secret Service (GNOME Keyring / KWallet)

use async_trait::async_trait;
use keyring::Entry;

use super::SecureStore;
use crate::error::{Result, StoreError};

pub const DEFAULT_SERVICE_NAME: &str = "com.daisy.app";

/// [`SecureStore`] backed by one keychain entry per key under a shared service name
#[derive(Debug, Clone)]
pub struct KeyringStore {
    service: String,
}

impl KeyringStore {
    pub fn new(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
        }
    }

    pub fn service(&self) -> &str {
        &self.service
    }

    fn entry(&self, key: &str) -> Result<Entry> {
        Ok(Entry::new(&self.service, key)?)
    }
}

impl Default for KeyringStore {
    fn default() -> Self {
        Self::new(DEFAULT_SERVICE_NAME)
    }
}

/// Absent entries read as `None`; undecodable ones are corruption of that key.
fn read_result(key: &str, result: keyring::Result<String>) -> Result<Option<String>> {
    match result {
        Ok(password) => Ok(Some(password)),
        Err(keyring::Error::NoEntry) => Ok(None),
        Err(keyring::Error::BadEncoding(_)) => Err(StoreError::corrupted(key)),
        Err(e) => Err(e.into()),
    }
}

fn delete_result(result: keyring::Result<()>) -> Result<()> {
    match result {
        Ok(()) => Ok(()),
        Err(keyring::Error::NoEntry) => Ok(()), // Already deleted
        Err(e) => Err(e.into()),
    }
}

#[async_trait]
impl SecureStore for KeyringStore {
    async fn get_item(&self, key: &str) -> Result<Option<String>> {
        let entry = self.entry(key)?;
        read_result(key, entry.get_password())
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let entry = self.entry(key)?;
        entry.set_password(value)?;
        Ok(())
    }

    async fn delete_item(&self, key: &str) -> Result<()> {
        let entry = self.entry(key)?;
        delete_result(entry.delete_credential())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_entry_reads_as_none() {
        let read = read_result("__clerk_client_jwt", Err(keyring::Error::NoEntry)).unwrap();
        assert_eq!(read, None);
    }

    #[test]
    fn test_bad_encoding_is_corruption() {
        let err = read_result("__clerk_client_jwt", Err(keyring::Error::BadEncoding(vec![0xff])))
            .unwrap_err();
        assert!(err.is_corruption());
    }

    #[test]
    fn test_other_failures_are_not_corruption() {
        let err = read_result("k", Err(keyring::Error::NoStorageAccess("locked".into())))
            .unwrap_err();
        assert!(matches!(err, StoreError::Keyring(_)));
        assert!(!err.is_corruption());
    }

    #[test]
    fn test_delete_of_absent_entry_succeeds() {
        assert!(delete_result(Err(keyring::Error::NoEntry)).is_ok());
    }

    #[test]
    fn test_default_service_name() {
        assert_eq!(KeyringStore::default().service(), DEFAULT_SERVICE_NAME);
    }
}
