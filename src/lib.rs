//! meditate-core: onboarding flow, audio library, and meditation generation.

pub mod config;
pub mod error;
pub mod generation;
pub mod library;
pub mod logging;
pub mod onboarding;
pub mod store;

pub use error::{Error, Result};
