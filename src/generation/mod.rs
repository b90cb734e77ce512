//! Meditation generation: request audio from the service, store the payload,
//! and add the record to the library.
//!
//! The workflow is all-or-nothing from the library's point of view: if the
//! request fails, times out, or the payload cannot be written, the library is
//! not touched. When a credit counter is attached, a generation is refused
//! once the free allowance is spent, and one credit is used per meditation
//! that reaches the library.

pub mod client;
pub mod credits;

pub use client::{GenerationRequest, HttpMeditationGenerator, MeditationGenerator};
pub use credits::{MAX_FREE_CREDITS, MeditationCredits};

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use crate::error::{Error, GenerationError};
use crate::library::{AudioFile, AudioLibraryStore, new_file_name};
use crate::store::PayloadStore;

/// Themes offered when creating a meditation.
pub const AVAILABLE_THEMES: &[&str] = &["Relaxation", "Focus", "Sleep", "Anxiety Relief", "Mindfulness"];

/// Generates meditations and records them in the library.
pub struct MeditationService {
    generator: Arc<dyn MeditationGenerator>,
    library: Arc<AudioLibraryStore>,
    credits: Option<Arc<MeditationCredits>>,
}

impl MeditationService {
    pub fn new(generator: Arc<dyn MeditationGenerator>, library: Arc<AudioLibraryStore>) -> Self {
        Self {
            generator,
            library,
            credits: None,
        }
    }

    /// Builder: meter generations against a free-credit allowance.
    pub fn with_credits(mut self, credits: Arc<MeditationCredits>) -> Self {
        self.credits = Some(credits);
        self
    }

    pub fn library(&self) -> &Arc<AudioLibraryStore> {
        &self.library
    }

    /// Generate one meditation and insert it at the front of the library.
    ///
    /// A `LibraryError::PersistFailed` means the record is in the library
    /// but may not survive a restart.
    pub async fn generate(&self, request: GenerationRequest) -> Result<AudioFile, Error> {
        if request.message.trim().is_empty() && request.themes.is_empty() {
            warn!("Generation requested with no message and no themes");
        }

        if let Some(credits) = &self.credits {
            if !credits.has_credit().await {
                return Err(GenerationError::OutOfCredits {
                    max_free: credits.max_free_credits(),
                }
                .into());
            }
        }

        let audio = self.generator.generate(&request).await?;

        let now = Utc::now();
        let file_name = new_file_name(now);
        self.library
            .payloads()
            .write(&file_name, &audio)
            .await
            .map_err(GenerationError::Payload)?;

        let file = AudioFile::new(file_name, request.message, request.themes).with_creation_date(now);
        self.library.insert_new(file.clone()).await?;

        // Record is stored; a counter write failure is only logged.
        if let Some(credits) = &self.credits {
            if let Err(e) = credits.use_credit().await {
                warn!(error = %e, "Failed to persist credit usage");
            }
        }

        info!(id = %file.id, bytes = audio.len(), "Meditation generated");
        Ok(file)
    }
}
