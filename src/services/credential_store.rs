// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Durable key-value storage for session credentials.
//!
//! Two implementations:
//! - [`MemoryCredentialStore`] for tests and ephemeral sessions
//! - [`SealedFileStore`], one AES-256-GCM sealed file per key
//!
//! A missing key is `Ok(None)`; every I/O or crypto failure is an error.

use crate::error::StorageError;
use async_trait::async_trait;
use base64::{
    engine::general_purpose::{STANDARD as BASE64, URL_SAFE_NO_PAD},
    Engine as _,
};
use dashmap::DashMap;
use hkdf::Hkdf;
use ring::aead::{Aad, LessSafeKey, Nonce, UnboundKey, AES_256_GCM, NONCE_LEN};
use ring::rand::{SecureRandom, SystemRandom};
use sha2::Sha256;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Secure, durable key-value store.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Read a value; `Ok(None)` when the key is absent.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write a value, replacing any previous one.
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove a value. Removing an absent key succeeds.
    async fn delete(&self, key: &str) -> Result<(), StorageError>;
}

// ─────────────────────────────────────────────────────────────────────────────
// In-memory store
// ─────────────────────────────────────────────────────────────────────────────

/// Process-local store. Clones share the same entries.
#[derive(Clone, Default)]
pub struct MemoryCredentialStore {
    entries: Arc<DashMap<String, String>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `key` currently has a value.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).map(|v| v.value().clone()))
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        self.entries.remove(key);
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Sealed file store
// ─────────────────────────────────────────────────────────────────────────────

/// HKDF context for the sealing key.
const SEAL_KEY_INFO: &[u8] = b"gezgin credential store v1";
const SEAL_KEY_SALT: &[u8] = b"gezgin-client";
const SEALED_EXTENSION: &str = "sealed";

/// File-backed store that encrypts each value with AES-256-GCM.
///
/// The key is derived from a device secret with HKDF-SHA256. The entry name is
/// bound as AAD, so a sealed file renamed to another key fails to open.
pub struct SealedFileStore {
    dir: PathBuf,
    key: LessSafeKey,
    rng: SystemRandom,
}

impl SealedFileStore {
    /// Create a store rooted at `dir`. The directory is created lazily on the
    /// first write.
    pub fn new<P: AsRef<Path>>(dir: P, device_secret: &[u8]) -> Result<Self, StorageError> {
        if device_secret.is_empty() {
            return Err(StorageError::Seal("device secret is empty".to_string()));
        }

        let hk = Hkdf::<Sha256>::new(Some(SEAL_KEY_SALT), device_secret);
        let mut okm = [0u8; 32];
        hk.expand(SEAL_KEY_INFO, &mut okm)
            .map_err(|e| StorageError::Seal(format!("key derivation failed: {}", e)))?;

        let unbound = UnboundKey::new(&AES_256_GCM, &okm)
            .map_err(|_| StorageError::Seal("invalid sealing key".to_string()))?;

        Ok(Self {
            dir: dir.as_ref().to_path_buf(),
            key: LessSafeKey::new(unbound),
            rng: SystemRandom::new(),
        })
    }

    /// Path of the sealed file backing `key`.
    pub fn entry_path(&self, key: &str) -> PathBuf {
        let name = URL_SAFE_NO_PAD.encode(key.as_bytes());
        self.dir.join(format!("{}.{}", name, SEALED_EXTENSION))
    }

    /// Encrypt a value. Returns base64(nonce || ciphertext || tag).
    fn seal(&self, key: &str, plaintext: &str) -> Result<String, StorageError> {
        let mut nonce_bytes = [0u8; NONCE_LEN];
        self.rng
            .fill(&mut nonce_bytes)
            .map_err(|_| StorageError::Seal("nonce generation failed".to_string()))?;

        let mut in_out = plaintext.as_bytes().to_vec();
        self.key
            .seal_in_place_append_tag(
                Nonce::assume_unique_for_key(nonce_bytes),
                Aad::from(key.as_bytes()),
                &mut in_out,
            )
            .map_err(|_| StorageError::Seal("encryption failed".to_string()))?;

        let mut sealed = Vec::with_capacity(NONCE_LEN + in_out.len());
        sealed.extend_from_slice(&nonce_bytes);
        sealed.extend_from_slice(&in_out);
        Ok(BASE64.encode(sealed))
    }

    /// Decrypt a value produced by [`Self::seal`].
    fn open(&self, key: &str, encoded: &str) -> Result<String, StorageError> {
        let mut sealed = BASE64
            .decode(encoded.trim())
            .map_err(|e| StorageError::Seal(format!("base64 decode failed: {}", e)))?;

        if sealed.len() < NONCE_LEN {
            return Err(StorageError::Seal("sealed entry is truncated".to_string()));
        }

        let (nonce_bytes, ciphertext) = sealed.split_at_mut(NONCE_LEN);
        let nonce = Nonce::try_assume_unique_for_key(nonce_bytes)
            .map_err(|_| StorageError::Seal("invalid nonce".to_string()))?;

        let plaintext = self
            .key
            .open_in_place(nonce, Aad::from(key.as_bytes()), ciphertext)
            .map_err(|_| StorageError::Seal("decryption failed".to_string()))?;

        String::from_utf8(plaintext.to_vec())
            .map_err(|e| StorageError::Seal(format!("UTF-8 decode failed: {}", e)))
    }
}

#[async_trait]
impl CredentialStore for SealedFileStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.entry_path(key);
        let encoded = match tokio::fs::read_to_string(&path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(StorageError::Read {
                    key: key.to_string(),
                    reason: e.to_string(),
                })
            }
        };

        self.open(key, &encoded).map(Some)
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let write_err = |e: std::io::Error| StorageError::Write {
            key: key.to_string(),
            reason: e.to_string(),
        };

        let sealed = self.seal(key, value)?;

        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(write_err)?;

        // Write to a sibling file and rename so readers never see a partial entry
        let path = self.entry_path(key);
        let tmp_path = path.with_extension("tmp");
        write_private(&tmp_path, sealed.as_bytes())
            .await
            .map_err(write_err)?;
        tokio::fs::rename(&tmp_path, &path)
            .await
            .map_err(write_err)?;

        tracing::debug!(path = %path.display(), "Credential sealed to disk");
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        match tokio::fs::remove_file(self.entry_path(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::Delete {
                key: key.to_string(),
                reason: e.to_string(),
            }),
        }
    }
}

/// Write `contents` to a file readable only by the current user.
async fn write_private(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    use tokio::io::AsyncWriteExt;

    let mut options = tokio::fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    options.mode(0o600);

    let mut file = options.open(path).await?;
    file.write_all(contents).await?;
    file.sync_all().await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_store_roundtrip_and_delete() {
        let store = MemoryCredentialStore::new();
        assert_eq!(store.get("k").await.unwrap(), None);

        store.set("k", "v").await.unwrap();
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("v"));
        assert!(store.contains("k"));

        store.delete("k").await.unwrap();
        store.delete("k").await.unwrap();
        assert!(!store.contains("k"));
    }

    #[test]
    fn test_seal_open_binds_key_name() {
        let store = SealedFileStore::new("unused", b"secret").unwrap();
        let sealed = store.seal("my-jwt", "token-value").unwrap();

        assert_eq!(store.open("my-jwt", &sealed).unwrap(), "token-value");
        assert!(store.open("other-key", &sealed).is_err());
    }

    #[test]
    fn test_seal_uses_fresh_nonce() {
        let store = SealedFileStore::new("unused", b"secret").unwrap();
        let a = store.seal("k", "same").unwrap();
        let b = store.seal("k", "same").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_empty_device_secret_rejected() {
        assert!(SealedFileStore::new("unused", b"").is_err());
    }

    #[test]
    fn test_open_rejects_truncated_entry() {
        let store = SealedFileStore::new("unused", b"secret").unwrap();
        let short = BASE64.encode([0u8; 4]);
        assert!(matches!(
            store.open("k", &short),
            Err(StorageError::Seal(_))
        ));
    }
}
