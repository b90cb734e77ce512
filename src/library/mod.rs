//! Audio library: generated meditations and their persisted metadata.

pub mod model;
pub mod store;

pub use model::{AudioFile, new_file_name};
pub use store::AudioLibraryStore;
