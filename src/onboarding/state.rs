//! Onboarding step machine: which screen the user is on.

use serde::{Deserialize, Serialize};

use super::model::RatingDimension;

/// Number of onboarding screens.
pub const MAX_STEP: u8 = 20;

/// The onboarding screens, in the order they are shown.
///
/// Progresses linearly from `Welcome` (step 1) to `FirstMeditation`
/// (step 20). The only transitions are one step forward or back.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OnboardingStep {
    #[default]
    Welcome,
    Intro,
    SelfieIntro,
    QuestionsIntro,
    Experience,
    AnxietyRating,
    DepressionRating,
    TraumaRating,
    RelationshipRating,
    EsteemRating,
    ExperienceFeedback,
    Goals,
    DailyGoal,
    Reminders,
    Name,
    Age,
    Email,
    ScoreReveal,
    WidgetPromo,
    FirstMeditation,
}

impl OnboardingStep {
    /// All steps in screen order.
    pub const ALL: [OnboardingStep; MAX_STEP as usize] = [
        Self::Welcome,
        Self::Intro,
        Self::SelfieIntro,
        Self::QuestionsIntro,
        Self::Experience,
        Self::AnxietyRating,
        Self::DepressionRating,
        Self::TraumaRating,
        Self::RelationshipRating,
        Self::EsteemRating,
        Self::ExperienceFeedback,
        Self::Goals,
        Self::DailyGoal,
        Self::Reminders,
        Self::Name,
        Self::Age,
        Self::Email,
        Self::ScoreReveal,
        Self::WidgetPromo,
        Self::FirstMeditation,
    ];

    pub const FIRST: OnboardingStep = Self::Welcome;
    pub const LAST: OnboardingStep = Self::FirstMeditation;

    /// 1-based screen index.
    pub fn index(&self) -> u8 {
        *self as u8 + 1
    }

    /// Step for a 1-based index, if in range.
    pub fn from_index(index: u8) -> Option<OnboardingStep> {
        index
            .checked_sub(1)
            .and_then(|i| Self::ALL.get(i as usize).copied())
    }

    /// The following step, or `None` at the last screen.
    pub fn next(&self) -> Option<OnboardingStep> {
        Self::from_index(self.index() + 1)
    }

    /// The preceding step, or `None` at the first screen.
    pub fn previous(&self) -> Option<OnboardingStep> {
        Self::from_index(self.index() - 1)
    }

    /// Check if a transition from `self` to `target` is valid.
    pub fn can_transition_to(&self, target: OnboardingStep) -> bool {
        self.next() == Some(target) || self.previous() == Some(target)
    }

    /// The rating this screen collects, for the five slider screens.
    pub fn rating_dimension(&self) -> Option<RatingDimension> {
        match self {
            Self::AnxietyRating => Some(RatingDimension::Anxiety),
            Self::DepressionRating => Some(RatingDimension::Depression),
            Self::TraumaRating => Some(RatingDimension::Trauma),
            Self::RelationshipRating => Some(RatingDimension::Relationship),
            Self::EsteemRating => Some(RatingDimension::Esteem),
            _ => None,
        }
    }

    /// Fraction of the flow completed when this screen is shown, for the
    /// progress bar.
    pub fn progress(&self) -> f32 {
        self.index() as f32 / MAX_STEP as f32
    }
}

impl std::fmt::Display for OnboardingStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Welcome => "welcome",
            Self::Intro => "intro",
            Self::SelfieIntro => "selfie_intro",
            Self::QuestionsIntro => "questions_intro",
            Self::Experience => "experience",
            Self::AnxietyRating => "anxiety_rating",
            Self::DepressionRating => "depression_rating",
            Self::TraumaRating => "trauma_rating",
            Self::RelationshipRating => "relationship_rating",
            Self::EsteemRating => "esteem_rating",
            Self::ExperienceFeedback => "experience_feedback",
            Self::Goals => "goals",
            Self::DailyGoal => "daily_goal",
            Self::Reminders => "reminders",
            Self::Name => "name",
            Self::Age => "age",
            Self::Email => "email",
            Self::ScoreReveal => "score_reveal",
            Self::WidgetPromo => "widget_promo",
            Self::FirstMeditation => "first_meditation",
        };
        write!(f, "{s}")
    }
}
