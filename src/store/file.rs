//! File-backed storage.
//!
//! `FileStore` keeps one file per key under a directory; `DirectoryPayloadStore`
//! keeps generated audio payloads as plain files. Values are replaced by
//! writing a sibling temp file and renaming it over the target, so a crash
//! mid-write never leaves a half-written value behind.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tracing::debug;

use super::traits::{KeyValueStore, PayloadStore, validate_name};
use crate::error::StorageError;

/// Key-value store with one `<key>.json` file per key.
pub struct FileStore {
    base_path: PathBuf,
}

impl FileStore {
    /// Create a store rooted at `base_path`. The directory is created lazily.
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    /// Ensure the store directory exists.
    pub async fn ensure_dirs(&self) -> Result<(), StorageError> {
        fs::create_dir_all(&self.base_path).await?;
        Ok(())
    }

    fn key_path(&self, key: &str) -> Result<PathBuf, StorageError> {
        validate_name(key)?;
        Ok(self.base_path.join(format!("{key}.json")))
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        let path = self.key_path(key)?;
        match fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::Read {
                key: key.to_string(),
                reason: e.to_string(),
            }),
        }
    }

    async fn set(&self, key: &str, value: &[u8]) -> Result<(), StorageError> {
        let path = self.key_path(key)?;
        write_replacing(&path, value)
            .await
            .map_err(|e| StorageError::Write {
                key: key.to_string(),
                reason: e.to_string(),
            })?;
        debug!(key, bytes = value.len(), "Stored value");
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        let path = self.key_path(key)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::Write {
                key: key.to_string(),
                reason: e.to_string(),
            }),
        }
    }
}

/// Audio payloads stored as files in one directory.
pub struct DirectoryPayloadStore {
    base_path: PathBuf,
}

impl DirectoryPayloadStore {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    /// Ensure the payload directory exists.
    pub async fn ensure_dirs(&self) -> Result<(), StorageError> {
        fs::create_dir_all(&self.base_path).await?;
        Ok(())
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }
}

#[async_trait]
impl PayloadStore for DirectoryPayloadStore {
    fn path_for(&self, file_name: &str) -> PathBuf {
        self.base_path.join(file_name)
    }

    async fn write(&self, file_name: &str, bytes: &[u8]) -> Result<PathBuf, StorageError> {
        validate_name(file_name)?;
        let path = self.path_for(file_name);
        write_replacing(&path, bytes)
            .await
            .map_err(|e| StorageError::Payload {
                file_name: file_name.to_string(),
                reason: e.to_string(),
            })?;
        debug!(file_name, bytes = bytes.len(), "Wrote audio payload");
        Ok(path)
    }

    async fn remove(&self, file_name: &str) -> Result<(), StorageError> {
        validate_name(file_name)?;
        fs::remove_file(self.path_for(file_name))
            .await
            .map_err(|e| StorageError::Payload {
                file_name: file_name.to_string(),
                reason: e.to_string(),
            })
    }
}

/// Write `bytes` to a temp sibling of `path`, then rename it into place.
async fn write_replacing(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await?;
    }
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);
    fs::write(&tmp, bytes).await?;
    fs::rename(&tmp, path).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_store() -> (FileStore, TempDir) {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path().join("store"));
        (store, dir)
    }

    #[tokio::test]
    async fn read_write_roundtrip() {
        let (store, _dir) = test_store();
        store.set("audioFiles", b"[]").await.unwrap();
        let value = store.get("audioFiles").await.unwrap();
        assert_eq!(value.as_deref(), Some(&b"[]"[..]));
    }

    #[tokio::test]
    async fn missing_key_is_none() {
        let (store, _dir) = test_store();
        assert!(store.get("nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn overwrite_replaces_whole_value() {
        let (store, _dir) = test_store();
        store.set("k", b"a much longer first value").await.unwrap();
        store.set("k", b"short").await.unwrap();
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some(&b"short"[..]));
    }

    #[tokio::test]
    async fn remove_is_idempotent() {
        let (store, _dir) = test_store();
        store.set("k", b"v").await.unwrap();
        store.remove("k").await.unwrap();
        store.remove("k").await.unwrap();
        assert!(store.get("k").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn rejects_path_like_keys() {
        let (store, _dir) = test_store();
        assert!(matches!(
            store.set("../escape", b"x").await,
            Err(StorageError::InvalidKey(_))
        ));
    }

    #[tokio::test]
    async fn payload_write_and_remove() {
        let dir = TempDir::new().unwrap();
        let payloads = DirectoryPayloadStore::new(dir.path().join("audio"));
        payloads.ensure_dirs().await.unwrap();

        let path = payloads.write("meditation_1.mp3", b"ID3").await.unwrap();
        assert_eq!(path, dir.path().join("audio").join("meditation_1.mp3"));
        assert_eq!(std::fs::read(&path).unwrap(), b"ID3");

        payloads.remove("meditation_1.mp3").await.unwrap();
        assert!(!path.exists());
        assert!(payloads.remove("meditation_1.mp3").await.is_err());
    }
}
