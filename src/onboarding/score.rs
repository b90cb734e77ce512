//! Inner Peace score shown at the end of onboarding.
//!
//! `current` is the mean wellness across the five ratings (100 minus each
//! severity). `potential` closes between half and 80% of the remaining gap,
//! the fraction drawn from the caller's RNG.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::model::{OnboardingData, RATING_MAX, RatingDimension};

/// Lower bound of the fraction of the remaining gap `potential` closes.
pub const POTENTIAL_GAIN_MIN: f64 = 0.5;
/// Upper bound of that fraction.
pub const POTENTIAL_GAIN_MAX: f64 = 0.8;

/// Current and projected wellness, both in 0..=100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InnerPeaceScore {
    pub current: u8,
    pub potential: u8,
}

/// Compute the score. Always satisfies `current <= potential <= 100`.
pub fn inner_peace_score<R: Rng + ?Sized>(data: &OnboardingData, rng: &mut R) -> InnerPeaceScore {
    let current = current_score(data);
    let gap = (RATING_MAX - current) as f64;
    let gain = rng.gen_range(POTENTIAL_GAIN_MIN..=POTENTIAL_GAIN_MAX);
    let potential = (current as f64 + (gap * gain).round()).min(RATING_MAX as f64) as u8;
    InnerPeaceScore { current, potential }
}

/// Mean wellness, rounded.
pub fn current_score(data: &OnboardingData) -> u8 {
    let total: u32 = data
        .ratings()
        .iter()
        .map(|(_, severity)| (RATING_MAX - (*severity).min(RATING_MAX)) as u32)
        .sum();
    ((total as f64) / RatingDimension::ALL.len() as f64).round() as u8
}

/// The dimension the user struggles with most, used to theme the first
/// meditation. Ties resolve to the earliest dimension.
pub fn focus_area(data: &OnboardingData) -> RatingDimension {
    let mut best = RatingDimension::Anxiety;
    for (dimension, severity) in data.ratings() {
        if severity > data.rating(best) {
            best = dimension;
        }
    }
    best
}
