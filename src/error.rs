//! Error types for meditate-core.

use std::time::Duration;

/// Top-level error type for the core.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Library error: {0}")]
    Library(#[from] LibraryError),

    #[error("Generation error: {0}")]
    Generation(#[from] GenerationError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Durable key-value and payload storage errors.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Failed to read key {key}: {reason}")]
    Read { key: String, reason: String },

    #[error("Failed to write key {key}: {reason}")]
    Write { key: String, reason: String },

    #[error("Invalid key {0:?}")]
    InvalidKey(String),

    #[error("Payload {file_name} failed: {reason}")]
    Payload { file_name: String, reason: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Audio library errors.
///
/// A `PersistFailed` means the in-memory collection already reflects the
/// mutation; only its durability is in doubt.
#[derive(Debug, thiserror::Error)]
pub enum LibraryError {
    #[error("Persist failed, change may not survive a restart: {0}")]
    PersistFailed(#[source] StorageError),
}

/// Meditation generation errors.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("Generation request timed out after {timeout:?}")]
    Timeout { timeout: Duration },

    #[error("Generation request failed: {reason}")]
    Transport { reason: String },

    #[error("Generation service returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Generation service returned an empty audio body")]
    EmptyAudio,

    #[error("All {max_free} free credits have been used")]
    OutOfCredits { max_free: u32 },

    #[error("Failed to store generated audio: {0}")]
    Payload(#[from] StorageError),
}

impl GenerationError {
    /// Whether the user can reasonably try the same request again.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Timeout { .. } | Self::Transport { .. } | Self::EmptyAudio => true,
            Self::Status { status, .. } => *status >= 500 || *status == 429,
            Self::OutOfCredits { .. } | Self::Payload(_) => false,
        }
    }

    /// Short message suitable for showing to the user.
    pub fn user_message(&self) -> &'static str {
        if let Self::OutOfCredits { .. } = self {
            "You've used all your free meditations."
        } else if self.is_retryable() {
            "We couldn't create your meditation right now. Please try again."
        } else {
            "Something went wrong creating your meditation."
        }
    }
}

/// Result type alias for the core.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retryable_classification() {
        assert!(GenerationError::Timeout { timeout: Duration::from_secs(1) }.is_retryable());
        assert!(GenerationError::Status { status: 503, body: String::new() }.is_retryable());
        assert!(GenerationError::Status { status: 429, body: String::new() }.is_retryable());
        assert!(!GenerationError::Status { status: 400, body: String::new() }.is_retryable());
        assert!(!GenerationError::Payload(StorageError::InvalidKey("x".into())).is_retryable());
        assert!(!GenerationError::OutOfCredits { max_free: 3 }.is_retryable());
    }

    #[test]
    fn library_error_wraps_into_top_level() {
        let err: Error = LibraryError::PersistFailed(StorageError::Write {
            key: "audioFiles".into(),
            reason: "disk full".into(),
        })
        .into();
        let message = err.to_string();
        assert!(message.contains("Persist failed"));
        assert!(message.contains("disk full"));
    }
}
