//! OnboardingFlowController: the single source of truth for which screen
//! is shown and what has been answered so far.
//!
//! Every operation is an in-memory mutation that cannot fail: navigation
//! saturates at the first and last screens, and answers are clamped into
//! range.

use std::collections::BTreeSet;

use rand::Rng;
use tracing::debug;

use super::model::{OnboardingData, RatingDimension, clamp_experience, clamp_rating};
use super::score::{InnerPeaceScore, focus_area, inner_peace_score};
use super::state::OnboardingStep;

/// Drives the onboarding screens and accumulates the user's answers.
#[derive(Debug, Clone, Default)]
pub struct OnboardingFlowController {
    step: OnboardingStep,
    data: OnboardingData,
    completed: bool,
}

impl OnboardingFlowController {
    /// Start at the first screen with default answers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Move forward one screen. No-op on the last screen.
    pub fn advance(&mut self) {
        if let Some(next) = self.step.next() {
            debug!(from = %self.step, to = %next, "Onboarding advanced");
            self.step = next;
        }
    }

    /// Move back one screen. No-op on the first screen.
    pub fn retreat(&mut self) {
        if let Some(previous) = self.step.previous() {
            debug!(from = %self.step, to = %previous, "Onboarding retreated");
            self.step = previous;
        }
    }

    /// Store a rating, clamped to 0..=100.
    pub fn record_rating(&mut self, dimension: RatingDimension, value: i64) {
        let clamped = clamp_rating(value);
        if clamped as i64 != value {
            debug!(%dimension, value, clamped, "Rating clamped");
        }
        *self.data.rating_mut(dimension) = clamped;
    }

    /// Replace the selected meditation goals.
    pub fn record_goals<I, S>(&mut self, goals: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.data.meditation_goals = goals.into_iter().map(Into::into).collect::<BTreeSet<_>>();
    }

    pub fn record_name(&mut self, name: impl Into<String>) {
        self.data.name = name.into().trim().to_string();
    }

    pub fn record_age(&mut self, age: u32) {
        self.data.age = age;
    }

    pub fn record_email(&mut self, email: impl Into<String>) {
        self.data.email = email.into().trim().to_string();
    }

    /// Store the experience level, clamped to 0..=5.
    pub fn record_experience(&mut self, level: i64) {
        self.data.experience = clamp_experience(level);
    }

    pub fn record_daily_goal(&mut self, minutes: u32) {
        self.data.daily_goal_minutes = minutes;
    }

    /// 1-based index of the current screen.
    pub fn current_step_index(&self) -> u8 {
        self.step.index()
    }

    pub fn current_step(&self) -> OnboardingStep {
        self.step
    }

    /// Copy of everything answered so far.
    pub fn snapshot_data(&self) -> OnboardingData {
        self.data.clone()
    }

    /// Borrow the answers without cloning.
    pub fn data(&self) -> &OnboardingData {
        &self.data
    }

    /// Mark onboarding finished and hand off the final answers.
    ///
    /// The controller itself has no terminal state: navigation still works
    /// afterwards, and calling `complete` again returns the current answers.
    pub fn complete(&mut self) -> OnboardingData {
        self.completed = true;
        self.data.clone()
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn inner_peace_score<R: Rng + ?Sized>(&self, rng: &mut R) -> InnerPeaceScore {
        inner_peace_score(&self.data, rng)
    }

    pub fn focus_area(&self) -> RatingDimension {
        focus_area(&self.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::onboarding::state::MAX_STEP;

    #[test]
    fn starts_at_first_step() {
        let controller = OnboardingFlowController::new();
        assert_eq!(controller.current_step_index(), 1);
        assert_eq!(controller.current_step(), OnboardingStep::Welcome);
        assert!(!controller.is_completed());
    }

    #[test]
    fn advance_and_retreat_saturate() {
        let mut controller = OnboardingFlowController::new();
        for _ in 0..19 {
            controller.advance();
        }
        assert_eq!(controller.current_step_index(), 20);
        controller.advance();
        assert_eq!(controller.current_step_index(), 20);

        for _ in 0..25 {
            controller.retreat();
        }
        assert_eq!(controller.current_step_index(), 1);
    }

    #[test]
    fn step_stays_in_range_for_mixed_sequences() {
        let mut controller = OnboardingFlowController::new();
        // Deterministic pseudo-random walk
        let mut x: u32 = 12345;
        for _ in 0..2000 {
            x = x.wrapping_mul(1_103_515_245).wrapping_add(12_345);
            if (x >> 16) % 3 == 0 {
                controller.retreat();
            } else {
                controller.advance();
            }
            let index = controller.current_step_index();
            assert!((1..=MAX_STEP).contains(&index));
        }
    }

    #[test]
    fn advance_max_step_times_reaches_last() {
        let mut controller = OnboardingFlowController::new();
        for _ in 0..MAX_STEP {
            controller.advance();
        }
        assert_eq!(controller.current_step(), OnboardingStep::LAST);
    }

    #[test]
    fn record_rating_clamps() {
        let mut controller = OnboardingFlowController::new();
        for (value, expected) in [(-10, 0), (0, 0), (37, 37), (100, 100), (140, 100)] {
            controller.record_rating(RatingDimension::Trauma, value);
            assert_eq!(controller.data().trauma, expected, "value {value}");
        }
        // Other ratings untouched
        assert_eq!(controller.data().anxiety, 50);
    }

    #[test]
    fn record_goals_replaces_set() {
        let mut controller = OnboardingFlowController::new();
        controller.record_goals(["Improve Sleep", "Relaxation"]);
        controller.record_goals(vec!["Improve Focus".to_string(), "Improve Focus".to_string()]);
        let goals: Vec<_> = controller.data().meditation_goals.iter().cloned().collect();
        assert_eq!(goals, vec!["Improve Focus".to_string()]);
    }

    #[test]
    fn record_experience_clamps() {
        let mut controller = OnboardingFlowController::new();
        controller.record_experience(9);
        assert_eq!(controller.data().experience, 5);
        controller.record_experience(-1);
        assert_eq!(controller.data().experience, 0);
        controller.record_experience(3);
        assert_eq!(controller.data().experience, 3);
    }

    #[test]
    fn complete_hands_off_answers() {
        let mut controller = OnboardingFlowController::new();
        controller.record_name("  Ada ");
        controller.record_age(31);
        controller.record_email("ada@example.com");
        controller.record_daily_goal(10);

        let data = controller.complete();
        assert!(controller.is_completed());
        assert_eq!(data.name, "Ada");
        assert_eq!(data.age, 31);
        assert_eq!(data, controller.snapshot_data());
    }

    #[test]
    fn snapshot_is_independent_copy() {
        let mut controller = OnboardingFlowController::new();
        let before = controller.snapshot_data();
        controller.record_rating(RatingDimension::Anxiety, 90);
        assert_eq!(before.anxiety, 50);
        assert_eq!(controller.snapshot_data().anxiety, 90);
    }
}
