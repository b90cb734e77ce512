//! In-memory storage backends for tests and ephemeral sessions.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::traits::{KeyValueStore, PayloadStore, validate_name};
use crate::error::StorageError;

/// Key-value store held in a `HashMap`.
///
/// Writes can be made to fail on demand to exercise persist-failure paths.
#[derive(Default)]
pub struct MemoryStore {
    values: RwLock<HashMap<String, Vec<u8>>>,
    fail_writes: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `set`/`remove` fail (or succeed again).
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of keys currently stored.
    pub async fn len(&self) -> usize {
        self.values.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.values.read().await.is_empty()
    }

    fn check_writable(&self, key: &str) -> Result<(), StorageError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::Write {
                key: key.to_string(),
                reason: "writes disabled".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        validate_name(key)?;
        Ok(self.values.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &[u8]) -> Result<(), StorageError> {
        validate_name(key)?;
        self.check_writable(key)?;
        self.values
            .write()
            .await
            .insert(key.to_string(), value.to_vec());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        validate_name(key)?;
        self.check_writable(key)?;
        self.values.write().await.remove(key);
        Ok(())
    }
}

/// Payload store held in memory, rooted at a virtual directory.
pub struct MemoryPayloadStore {
    root: PathBuf,
    files: RwLock<HashMap<String, Vec<u8>>>,
    fail_writes: AtomicBool,
    fail_removes: AtomicBool,
}

impl Default for MemoryPayloadStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryPayloadStore {
    pub fn new() -> Self {
        Self {
            root: PathBuf::from("memory://audio"),
            files: RwLock::new(HashMap::new()),
            fail_writes: AtomicBool::new(false),
            fail_removes: AtomicBool::new(false),
        }
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_removes(&self, fail: bool) {
        self.fail_removes.store(fail, Ordering::SeqCst);
    }

    pub async fn contains(&self, file_name: &str) -> bool {
        self.files.read().await.contains_key(file_name)
    }

    pub async fn read(&self, file_name: &str) -> Option<Vec<u8>> {
        self.files.read().await.get(file_name).cloned()
    }

    pub async fn len(&self) -> usize {
        self.files.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.files.read().await.is_empty()
    }
}

#[async_trait]
impl PayloadStore for MemoryPayloadStore {
    fn path_for(&self, file_name: &str) -> PathBuf {
        self.root.join(file_name)
    }

    async fn write(&self, file_name: &str, bytes: &[u8]) -> Result<PathBuf, StorageError> {
        validate_name(file_name)?;
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::Payload {
                file_name: file_name.to_string(),
                reason: "writes disabled".to_string(),
            });
        }
        self.files
            .write()
            .await
            .insert(file_name.to_string(), bytes.to_vec());
        Ok(self.path_for(file_name))
    }

    async fn remove(&self, file_name: &str) -> Result<(), StorageError> {
        validate_name(file_name)?;
        if self.fail_removes.load(Ordering::SeqCst) {
            return Err(StorageError::Payload {
                file_name: file_name.to_string(),
                reason: "removes disabled".to_string(),
            });
        }
        match self.files.write().await.remove(file_name) {
            Some(_) => Ok(()),
            None => Err(StorageError::Payload {
                file_name: file_name.to_string(),
                reason: "not found".to_string(),
            }),
        }
    }
}
