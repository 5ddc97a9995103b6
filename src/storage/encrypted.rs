//! AES-256-GCM encrypted file storage for platforms without a usable keychain

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Nonce,
};
use argon2::Argon2;
use async_trait::async_trait;
use base64::{
    engine::general_purpose::{STANDARD as BASE64, URL_SAFE_NO_PAD},
    Engine,
};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;

use super::SecureStore;

const NONCE_SIZE: usize = 12;
const SALT_SIZE: usize = 16;
const FILE_EXTENSION: &str = "enc";

#[derive(Debug, thiserror::Error)]
pub enum EncryptedStorageError {
    #[error("Encryption error")]
    Encryption,
    #[error("Decryption error")]
    Decryption,
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Base64 error: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("Key derivation error")]
    KeyDerivation,
    #[error("Crypto task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, EncryptedStorageError>;

#[derive(Serialize, Deserialize)]
struct EncryptedBlob {
    salt: String,       // Base64 encoded
    nonce: String,      // Base64 encoded
    ciphertext: String, // Base64 encoded
}

/// Derive a 256-bit key from a password using Argon2id
fn derive_key(password: &str, salt: &[u8]) -> Result<[u8; 32]> {
    let mut key = [0u8; 32];
    Argon2::default()
        .hash_password_into(password.as_bytes(), salt, &mut key)
        .map_err(|_| EncryptedStorageError::KeyDerivation)?;
    Ok(key)
}

/// Machine-bound key source used when no passphrase is configured
fn machine_id() -> String {
    let host = hostname::get()
        .map(|h| h.to_string_lossy().to_string())
        .unwrap_or_else(|_| "unknown".to_string());

    format!("daisy@{}", host)
}

fn seal(plaintext: &str, password: &str) -> Result<EncryptedBlob> {
    let mut salt = [0u8; SALT_SIZE];
    let mut nonce_bytes = [0u8; NONCE_SIZE];
    let mut rng = rand::rng();
    rng.fill_bytes(&mut salt);
    rng.fill_bytes(&mut nonce_bytes);

    let key = derive_key(password, &salt)?;
    let cipher =
        Aes256Gcm::new_from_slice(&key).map_err(|_| EncryptedStorageError::Encryption)?;

    let ciphertext = cipher
        .encrypt(Nonce::from_slice(&nonce_bytes), plaintext.as_bytes())
        .map_err(|_| EncryptedStorageError::Encryption)?;

    Ok(EncryptedBlob {
        salt: BASE64.encode(salt),
        nonce: BASE64.encode(nonce_bytes),
        ciphertext: BASE64.encode(ciphertext),
    })
}

fn open(blob: &EncryptedBlob, password: &str) -> Result<String> {
    let salt = BASE64.decode(&blob.salt)?;
    let nonce_bytes = BASE64.decode(&blob.nonce)?;
    let ciphertext = BASE64.decode(&blob.ciphertext)?;

    if nonce_bytes.len() != NONCE_SIZE {
        return Err(EncryptedStorageError::Decryption);
    }

    let key = derive_key(password, &salt)?;
    let cipher =
        Aes256Gcm::new_from_slice(&key).map_err(|_| EncryptedStorageError::Decryption)?;

    let plaintext = cipher
        .decrypt(Nonce::from_slice(&nonce_bytes), ciphertext.as_ref())
        .map_err(|_| EncryptedStorageError::Decryption)?;

    String::from_utf8(plaintext).map_err(|_| EncryptedStorageError::Decryption)
}

/// Run key derivation and the cipher on the blocking pool; Argon2id is too slow for a runtime
/// worker.
async fn run_blocking<T, F>(f: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f).await?
}

/// [`SecureStore`] keeping each value in its own encrypted file under `dir`
pub struct EncryptedFileStore {
    dir: PathBuf,
    passphrase: Option<String>,
}

impl EncryptedFileStore {
    pub fn new(dir: impl Into<PathBuf>, passphrase: Option<String>) -> Self {
        Self {
            dir: dir.into(),
            passphrase,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file holding `key`. Keys are encoded so any string maps to a valid name.
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir
            .join(format!("{}.{}", URL_SAFE_NO_PAD.encode(key), FILE_EXTENSION))
    }

    fn key_source(&self) -> String {
        self.passphrase.clone().unwrap_or_else(machine_id)
    }

    async fn read(&self, key: &str) -> Result<Option<String>> {
        let blob_json = match fs::read_to_string(self.path_for(key)).await {
            Ok(json) => json,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let blob: EncryptedBlob = serde_json::from_str(&blob_json)?;
        let password = self.key_source();
        run_blocking(move || open(&blob, &password)).await.map(Some)
    }

    async fn write(&self, key: &str, value: &str) -> Result<()> {
        let (plaintext, password) = (value.to_string(), self.key_source());
        let blob = run_blocking(move || seal(&plaintext, &password)).await?;
        let blob_json = serde_json::to_string_pretty(&blob)?;

        fs::create_dir_all(&self.dir).await?;
        fs::write(self.path_for(key), blob_json).await?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        match fs::remove_file(self.path_for(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl SecureStore for EncryptedFileStore {
    async fn get_item(&self, key: &str) -> crate::error::Result<Option<String>> {
        Ok(self.read(key).await?)
    }

    async fn set_item(&self, key: &str, value: &str) -> crate::error::Result<()> {
        Ok(self.write(key, value).await?)
    }

    async fn delete_item(&self, key: &str) -> crate::error::Result<()> {
        Ok(self.delete(key).await?)
    }
}
