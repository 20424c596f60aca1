//! Key-value secret storage.
//!
//! Reads and writes are separate awaited operations with no transaction
//! spanning them. Two concurrent runs may interleave a read and a replacement;
//! the loser uses a stale key until its next call fails.

use std::collections::{BTreeMap, HashMap};
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Mutex;

use async_trait::async_trait;
use tracing::debug;

use crate::atomic::{restrict_to_owner, write_atomically};
use crate::error::CredentialError;

/// Storage for secrets keyed by a slot name.
#[async_trait]
pub trait SecretStore: Send + Sync {
    /// Read a slot. `Ok(None)` when nothing is stored.
    async fn get(&self, slot: &str) -> Result<Option<String>, CredentialError>;

    /// Overwrite a slot.
    async fn set(&self, slot: &str, value: &str) -> Result<(), CredentialError>;

    /// Remove a slot. Returns whether anything was removed.
    async fn delete(&self, slot: &str) -> Result<bool, CredentialError>;
}

/// Secrets persisted as a JSON object in a single owner-only file.
#[derive(Debug, Clone)]
pub struct FileSecretStore {
    path: PathBuf,
}

impl FileSecretStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    async fn load(&self) -> Result<BTreeMap<String, String>, CredentialError> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => {
                return Err(CredentialError::ReadFailed {
                    path: self.path.display().to_string(),
                    source: e,
                });
            }
        };

        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        serde_json::from_str(&content).map_err(|e| CredentialError::Malformed {
            path: self.path.display().to_string(),
            reason: e.to_string(),
        })
    }

    async fn save(&self, entries: BTreeMap<String, String>) -> Result<(), CredentialError> {
        let path = self.path.clone();
        let json = serde_json::to_vec_pretty(&entries).map_err(|e| CredentialError::Malformed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        let result = tokio::task::spawn_blocking(move || -> std::io::Result<()> {
            write_atomically(&path, &json)?;
            restrict_to_owner(&path)
        })
        .await
        .map_err(std::io::Error::other)
        .and_then(|inner| inner);

        result.map_err(|e| CredentialError::WriteFailed {
            path: self.path.display().to_string(),
            source: e,
        })
    }
}

#[async_trait]
impl SecretStore for FileSecretStore {
    async fn get(&self, slot: &str) -> Result<Option<String>, CredentialError> {
        let mut entries = self.load().await?;
        Ok(entries.remove(slot))
    }

    async fn set(&self, slot: &str, value: &str) -> Result<(), CredentialError> {
        let mut entries = self.load().await?;
        entries.insert(slot.to_string(), value.to_string());
        self.save(entries).await?;
        debug!("Stored secret slot '{}' in {}", slot, self.path.display());
        Ok(())
    }

    async fn delete(&self, slot: &str) -> Result<bool, CredentialError> {
        let mut entries = self.load().await?;
        if entries.remove(slot).is_none() {
            return Ok(false);
        }
        self.save(entries).await?;
        debug!("Removed secret slot '{}' from {}", slot, self.path.display());
        Ok(true)
    }
}

/// In-process secret store. Nothing survives the process.
#[derive(Debug, Default)]
pub struct MemorySecretStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemorySecretStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store with one slot already filled.
    pub fn with_entry(slot: &str, value: &str) -> Self {
        let store = Self::default();
        store.lock().insert(slot.to_string(), value.to_string());
        store
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        // A poisoned map is still a valid map.
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl SecretStore for MemorySecretStore {
    async fn get(&self, slot: &str) -> Result<Option<String>, CredentialError> {
        Ok(self.lock().get(slot).cloned())
    }

    async fn set(&self, slot: &str, value: &str) -> Result<(), CredentialError> {
        self.lock().insert(slot.to_string(), value.to_string());
        Ok(())
    }

    async fn delete(&self, slot: &str) -> Result<bool, CredentialError> {
        Ok(self.lock().remove(slot).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_file_store_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSecretStore::new(dir.path().join("credentials.json"));

        assert_eq!(store.get("active-api-key").await.unwrap(), None);
        assert!(!store.delete("active-api-key").await.unwrap());
    }

    #[tokio::test]
    async fn test_file_store_set_then_get() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/credentials.json");
        let store = FileSecretStore::new(&path);

        store.set("active-api-key", "k-1").await.unwrap();
        assert_eq!(
            store.get("active-api-key").await.unwrap().as_deref(),
            Some("k-1")
        );

        // A fresh handle on the same file sees the value
        let reopened = FileSecretStore::new(&path);
        assert_eq!(
            reopened.get("active-api-key").await.unwrap().as_deref(),
            Some("k-1")
        );
    }

    #[tokio::test]
    async fn test_file_store_overwrite_keeps_other_slots() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSecretStore::new(dir.path().join("credentials.json"));

        store.set("a", "1").await.unwrap();
        store.set("b", "2").await.unwrap();
        store.set("a", "3").await.unwrap();

        assert_eq!(store.get("a").await.unwrap().as_deref(), Some("3"));
        assert_eq!(store.get("b").await.unwrap().as_deref(), Some("2"));
    }

    #[tokio::test]
    async fn test_file_store_delete() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSecretStore::new(dir.path().join("credentials.json"));

        store.set("active-api-key", "k").await.unwrap();
        assert!(store.delete("active-api-key").await.unwrap());
        assert_eq!(store.get("active-api-key").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_file_store_malformed_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credentials.json");
        std::fs::write(&path, "not json").unwrap();

        let store = FileSecretStore::new(&path);
        let result = store.get("active-api-key").await;
        assert!(matches!(result, Err(CredentialError::Malformed { .. })));
    }

    #[tokio::test]
    #[cfg(unix)]
    async fn test_file_store_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credentials.json");
        let store = FileSecretStore::new(&path);

        store.set("active-api-key", "k").await.unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[tokio::test]
    async fn test_memory_store_roundtrip() {
        let store = MemorySecretStore::with_entry("slot", "v1");
        assert_eq!(store.get("slot").await.unwrap().as_deref(), Some("v1"));

        store.set("slot", "v2").await.unwrap();
        assert_eq!(store.get("slot").await.unwrap().as_deref(), Some("v2"));

        assert!(store.delete("slot").await.unwrap());
        assert_eq!(store.get("slot").await.unwrap(), None);
    }
}
