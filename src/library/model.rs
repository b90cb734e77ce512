//! Audio file records: one generated meditation each.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Metadata for a generated meditation whose audio lives in local storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioFile {
    pub id: Uuid,
    /// Name of the payload file in the audio directory.
    pub file_name: String,
    pub creation_date: DateTime<Utc>,
    /// Prompt text the meditation was generated from.
    pub message: String,
    pub themes: Vec<String>,
    pub is_favorite: bool,
    /// Older records predate this field.
    #[serde(default)]
    pub has_been_played: bool,
}

impl AudioFile {
    /// New unplayed, non-favorite record with a fresh id.
    pub fn new(
        file_name: impl Into<String>,
        message: impl Into<String>,
        themes: Vec<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            file_name: file_name.into(),
            creation_date: Utc::now(),
            message: message.into(),
            themes,
            is_favorite: false,
            has_been_played: false,
        }
    }

    /// Builder: use a specific id.
    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = id;
        self
    }

    /// Builder: use a specific creation date.
    pub fn with_creation_date(mut self, date: DateTime<Utc>) -> Self {
        self.creation_date = date;
        self
    }

    /// Location of the payload, derived from the file name.
    pub fn url(&self, audio_dir: &Path) -> PathBuf {
        audio_dir.join(&self.file_name)
    }
}

/// Fresh payload file name for a generation finishing at `now`.
///
/// The random suffix keeps two generations in the same millisecond apart.
pub fn new_file_name(now: DateTime<Utc>) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("meditation_{}_{}.mp3", now.timestamp_millis(), &suffix[..8])
}
