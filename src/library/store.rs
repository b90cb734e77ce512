//! AudioLibraryStore: the persisted, newest-first collection of generated
//! meditations.
//!
//! Every mutation rewrites the whole collection under one durable key while
//! holding the collection lock, so two concurrent mutations can never both
//! start from the same stale snapshot. If the write fails the in-memory
//! change stands and `LibraryError::PersistFailed` is returned.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::model::AudioFile;
use crate::error::LibraryError;
use crate::store::{KeyValueStore, PayloadStore, get_json, keys, set_json};

/// Ordered collection of `AudioFile` records, newest first.
pub struct AudioLibraryStore {
    files: Mutex<Vec<AudioFile>>,
    storage: Arc<dyn KeyValueStore>,
    payloads: Arc<dyn PayloadStore>,
}

impl AudioLibraryStore {
    /// Load the collection from durable storage.
    ///
    /// A missing or undecodable blob yields an empty library.
    pub async fn load(storage: Arc<dyn KeyValueStore>, payloads: Arc<dyn PayloadStore>) -> Arc<Self> {
        let files = read_collection(storage.as_ref()).await;
        info!(count = files.len(), "Audio library loaded");
        Arc::new(Self {
            files: Mutex::new(files),
            storage,
            payloads,
        })
    }

    /// Re-read durable storage, replacing the in-memory collection.
    pub async fn reload(&self) -> Vec<AudioFile> {
        let mut files = self.files.lock().await;
        *files = read_collection(self.storage.as_ref()).await;
        files.clone()
    }

    /// Insert a new record at the front and persist.
    ///
    /// A record whose id is already present is ignored, so an id always
    /// names exactly one record.
    pub async fn insert_new(&self, file: AudioFile) -> Result<(), LibraryError> {
        let mut files = self.files.lock().await;
        if files.iter().any(|f| f.id == file.id) {
            warn!(id = %file.id, "Insert of duplicate audio file id ignored");
            return Ok(());
        }
        info!(id = %file.id, file_name = %file.file_name, "Audio file added");
        files.insert(0, file);
        self.persist(&files).await
    }

    /// Remove a record and its payload. Absent ids are a no-op.
    ///
    /// The payload is removed only after the metadata write succeeds; a
    /// failed payload removal is logged and does not restore the record.
    pub async fn delete(&self, id: Uuid) -> Result<(), LibraryError> {
        let removed = {
            let mut files = self.files.lock().await;
            let Some(index) = files.iter().position(|f| f.id == id) else {
                debug!(%id, "Delete of unknown audio file ignored");
                return Ok(());
            };
            let removed = files.remove(index);
            info!(%id, file_name = %removed.file_name, "Audio file deleted");
            self.persist(&files).await?;
            removed
        };

        if let Err(e) = self.payloads.remove(&removed.file_name).await {
            warn!(%id, file_name = %removed.file_name, error = %e, "Failed to remove audio payload");
        }
        Ok(())
    }

    /// Flip the favorite flag. Returns the new value, or `None` if absent.
    pub async fn toggle_favorite(&self, id: Uuid) -> Result<Option<bool>, LibraryError> {
        let mut files = self.files.lock().await;
        let Some(file) = files.iter_mut().find(|f| f.id == id) else {
            debug!(%id, "Favorite toggle of unknown audio file ignored");
            return Ok(None);
        };
        file.is_favorite = !file.is_favorite;
        let is_favorite = file.is_favorite;
        info!(%id, is_favorite, "Audio file favorite toggled");
        self.persist(&files).await?;
        Ok(Some(is_favorite))
    }

    /// Record that a meditation has been listened to. One-way.
    pub async fn mark_played(&self, id: Uuid) -> Result<(), LibraryError> {
        let mut files = self.files.lock().await;
        let Some(file) = files.iter_mut().find(|f| f.id == id) else {
            debug!(%id, "Mark-played of unknown audio file ignored");
            return Ok(());
        };
        if file.has_been_played {
            return Ok(());
        }
        file.has_been_played = true;
        info!(%id, "Audio file marked played");
        self.persist(&files).await
    }

    /// Snapshot of the collection in stored order.
    pub async fn all(&self) -> Vec<AudioFile> {
        self.files.lock().await.clone()
    }

    pub async fn get(&self, id: Uuid) -> Option<AudioFile> {
        self.files.lock().await.iter().find(|f| f.id == id).cloned()
    }

    /// Favorites, newest first.
    pub async fn favorites(&self) -> Vec<AudioFile> {
        self.files
            .lock()
            .await
            .iter()
            .filter(|f| f.is_favorite)
            .cloned()
            .collect()
    }

    pub async fn len(&self) -> usize {
        self.files.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.files.lock().await.is_empty()
    }

    /// Payload location for a record.
    pub fn payload_path(&self, file: &AudioFile) -> PathBuf {
        self.payloads.path_for(&file.file_name)
    }

    /// Payload storage backing this library.
    pub fn payloads(&self) -> &Arc<dyn PayloadStore> {
        &self.payloads
    }

    async fn persist(&self, files: &[AudioFile]) -> Result<(), LibraryError> {
        set_json(self.storage.as_ref(), keys::AUDIO_FILES, files)
            .await
            .map_err(|e| {
                warn!(error = %e, count = files.len(), "Failed to persist audio library");
                LibraryError::PersistFailed(e)
            })
    }
}

async fn read_collection(storage: &dyn KeyValueStore) -> Vec<AudioFile> {
    match get_json::<Vec<AudioFile>>(storage, keys::AUDIO_FILES).await {
        Ok(Some(files)) => files,
        Ok(None) => Vec::new(),
        Err(e) => {
            warn!(error = %e, "Audio library blob unreadable, starting empty");
            Vec::new()
        }
    }
}
