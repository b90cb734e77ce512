//! Persistence layer: key-value storage and audio payload files.

pub mod file;
pub mod memory;
pub mod traits;

pub use file::{DirectoryPayloadStore, FileStore};
pub use memory::{MemoryPayloadStore, MemoryStore};
pub use traits::{KeyValueStore, PayloadStore, get_json, set_json};

/// Durable keys shared by onboarding, the audio library and the credit counter.
pub mod keys {
    /// Serialized `AudioFile` collection.
    pub const AUDIO_FILES: &str = "audioFiles";
    /// Boolean flag set once onboarding completes.
    pub const ONBOARDING_COMPLETE: &str = "isOnboardingComplete";
    /// Display name carried forward from onboarding.
    pub const USER_NAME: &str = "userName";
    /// Terminal `OnboardingData` record.
    pub const ONBOARDING_DATA: &str = "onboardingData";
    /// Number of free generations already used.
    pub const CREDITS_USED: &str = "creditsUsed";
}
