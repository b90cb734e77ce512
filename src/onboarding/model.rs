//! Onboarding answers and the option lists the screens offer.

use std::collections::BTreeSet;

use serde::{Deserialize, Deserializer, Serialize};

/// Lowest and highest value a wellness rating can hold.
pub const RATING_MIN: u8 = 0;
pub const RATING_MAX: u8 = 100;

/// Neutral midpoint new ratings start at.
pub const RATING_DEFAULT: u8 = 50;

/// Highest self-reported meditation experience level.
pub const EXPERIENCE_MAX: u8 = 5;

/// Reasons to meditate offered on the goals screen.
pub const MEDITATION_GOALS: &[&str] = &[
    "Reduce Anxiety",
    "Reduce Depression",
    "Boost Self Esteem",
    "Improve Focus",
    "Improve Sleep",
    "Relaxation",
];

/// Daily goal choices as shown on the daily-goal screen.
pub const DAILY_GOAL_OPTIONS: &[(&str, &str)] = &[
    ("5 min / day", "Casual"),
    ("10 min / day", "Regular"),
    ("15 min / day", "Serious"),
    ("20 min / day", "Intense"),
];

/// The five wellness questions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RatingDimension {
    Anxiety,
    Depression,
    Trauma,
    Relationship,
    Esteem,
}

impl RatingDimension {
    pub const ALL: [RatingDimension; 5] = [
        Self::Anxiety,
        Self::Depression,
        Self::Trauma,
        Self::Relationship,
        Self::Esteem,
    ];

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Anxiety => "Anxiety",
            Self::Depression => "Depression",
            Self::Trauma => "Trauma",
            Self::Relationship => "Relationships",
            Self::Esteem => "Self-Esteem",
        }
    }
}

impl std::fmt::Display for RatingDimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Everything collected during onboarding.
///
/// Ratings are severity levels: 0 means "not at all", 100 means "very much".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OnboardingData {
    pub name: String,
    pub age: u32,
    pub email: String,
    #[serde(deserialize_with = "deserialize_rating")]
    pub anxiety: u8,
    #[serde(deserialize_with = "deserialize_rating")]
    pub depression: u8,
    #[serde(deserialize_with = "deserialize_rating")]
    pub trauma: u8,
    #[serde(deserialize_with = "deserialize_rating")]
    pub relationship: u8,
    #[serde(deserialize_with = "deserialize_rating")]
    pub esteem: u8,
    /// 0 when unanswered, otherwise 1..=5.
    #[serde(deserialize_with = "deserialize_experience")]
    pub experience: u8,
    pub meditation_goals: BTreeSet<String>,
    pub daily_goal_minutes: u32,
}

impl Default for OnboardingData {
    fn default() -> Self {
        Self {
            name: String::new(),
            age: 0,
            email: String::new(),
            anxiety: RATING_DEFAULT,
            depression: RATING_DEFAULT,
            trauma: RATING_DEFAULT,
            relationship: RATING_DEFAULT,
            esteem: RATING_DEFAULT,
            experience: 0,
            meditation_goals: BTreeSet::new(),
            daily_goal_minutes: 0,
        }
    }
}

impl OnboardingData {
    pub fn rating(&self, dimension: RatingDimension) -> u8 {
        match dimension {
            RatingDimension::Anxiety => self.anxiety,
            RatingDimension::Depression => self.depression,
            RatingDimension::Trauma => self.trauma,
            RatingDimension::Relationship => self.relationship,
            RatingDimension::Esteem => self.esteem,
        }
    }

    pub(crate) fn rating_mut(&mut self, dimension: RatingDimension) -> &mut u8 {
        match dimension {
            RatingDimension::Anxiety => &mut self.anxiety,
            RatingDimension::Depression => &mut self.depression,
            RatingDimension::Trauma => &mut self.trauma,
            RatingDimension::Relationship => &mut self.relationship,
            RatingDimension::Esteem => &mut self.esteem,
        }
    }

    /// All five ratings in declaration order.
    pub fn ratings(&self) -> [(RatingDimension, u8); 5] {
        RatingDimension::ALL.map(|d| (d, self.rating(d)))
    }

    /// Experience bucket used to pick the feedback message.
    pub fn experience_bucket(&self) -> ExperienceBucket {
        ExperienceBucket::from_level(self.experience)
    }
}

/// Clamp an arbitrary slider value into the rating range.
pub fn clamp_rating(value: i64) -> u8 {
    value.clamp(RATING_MIN as i64, RATING_MAX as i64) as u8
}

/// Clamp an arbitrary experience answer into 0..=5.
pub fn clamp_experience(value: i64) -> u8 {
    value.clamp(0, EXPERIENCE_MAX as i64) as u8
}

// Stored blobs may predate clamping or be edited by hand.
fn deserialize_rating<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u8, D::Error> {
    i64::deserialize(deserializer).map(clamp_rating)
}

fn deserialize_experience<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u8, D::Error> {
    i64::deserialize(deserializer).map(clamp_experience)
}

/// Coarse grouping of the experience answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExperienceBucket {
    Beginner,
    Intermediate,
    Advanced,
}

impl ExperienceBucket {
    /// Unanswered and level 1 both count as beginners.
    pub fn from_level(level: u8) -> Self {
        match level {
            2..=3 => Self::Intermediate,
            4..=5 => Self::Advanced,
            _ => Self::Beginner,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Self::Beginner => "Okay, we'll start fresh!",
            Self::Intermediate => "Okay, we'll build on what you know!",
            Self::Advanced => "Wow, that's great!",
        }
    }
}

/// Parse a daily goal label such as `"10 min / day"` into minutes.
///
/// Returns 0 when the label does not start with a number.
pub fn parse_daily_goal(label: &str) -> u32 {
    label
        .split_whitespace()
        .next()
        .and_then(|n| n.parse().ok())
        .unwrap_or(0)
}
