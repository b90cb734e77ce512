//! Storage capabilities injected into the onboarding manager and the audio
//! library.
//!
//! Both traits are whole-value: a key is read or replaced in one call, and a
//! payload file is written once and removed as a unit.

use std::path::PathBuf;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::StorageError;

/// Durable key-value storage, the equivalent of the platform's user defaults.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the full value stored under `key`, or `None` when absent.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError>;

    /// Replace the value stored under `key`.
    async fn set(&self, key: &str, value: &[u8]) -> Result<(), StorageError>;

    /// Remove `key`. Removing an absent key is not an error.
    async fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Local storage for generated audio payloads.
#[async_trait]
pub trait PayloadStore: Send + Sync {
    /// Location a payload with this file name lives at. Pure; no I/O.
    fn path_for(&self, file_name: &str) -> PathBuf;

    /// Write a new payload and return its path.
    async fn write(&self, file_name: &str, bytes: &[u8]) -> Result<PathBuf, StorageError>;

    /// Remove a payload.
    async fn remove(&self, file_name: &str) -> Result<(), StorageError>;
}

/// Read and decode a JSON value. Decode failures are returned, not swallowed;
/// callers that want lenient recovery match on the error.
pub async fn get_json<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> Result<Option<T>, StorageError> {
    match store.get(key).await? {
        Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
        None => Ok(None),
    }
}

/// Encode a value as JSON and store it under `key`.
pub async fn set_json<T: Serialize + ?Sized + Sync>(
    store: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let bytes = serde_json::to_vec(value)?;
    store.set(key, &bytes).await
}

/// Validate a storage key or payload file name: non-empty, no path
/// separators, no parent references.
pub(crate) fn validate_name(name: &str) -> Result<(), StorageError> {
    let ok = !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains('/')
        && !name.contains('\\')
        && !name.contains('\0');
    if ok {
        Ok(())
    } else {
        Err(StorageError::InvalidKey(name.to_string()))
    }
}
