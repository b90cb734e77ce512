//! Onboarding system: the first-launch wizard.
//!
//! A linear sequence of screens collects the user's name, wellness ratings,
//! experience and goals into `OnboardingData`. Once complete, the answers are
//! handed off to durable storage and the app switches to the library screen.

pub mod controller;
pub mod manager;
pub mod model;
pub mod score;
pub mod state;

pub use controller::OnboardingFlowController;
pub use manager::{OnboardingManager, OnboardingStatus};
pub use model::{ExperienceBucket, OnboardingData, RatingDimension, parse_daily_goal};
pub use score::{InnerPeaceScore, focus_area, inner_peace_score};
pub use state::{MAX_STEP, OnboardingStep};
