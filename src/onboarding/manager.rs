//! OnboardingManager: couples the flow controller with durable storage.
//!
//! The controller itself never touches storage. The manager reads the
//! "onboarding complete" flag at launch and, on completion, writes the final
//! answers, the display name and the flag.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::error::StorageError;
use crate::store::{KeyValueStore, get_json, keys, set_json};

use super::controller::OnboardingFlowController;
use super::model::OnboardingData;
use super::state::OnboardingStep;

/// Snapshot of onboarding for the presentation layer.
#[derive(Debug, Clone, serde::Serialize)]
pub struct OnboardingStatus {
    pub onboarding_completed: bool,
    pub step: OnboardingStep,
    pub step_index: u8,
    pub data: OnboardingData,
}

/// Owns the controller for one onboarding session.
pub struct OnboardingManager {
    store: Arc<dyn KeyValueStore>,
    controller: RwLock<OnboardingFlowController>,
}

impl OnboardingManager {
    /// Start a fresh session at the first screen.
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            controller: RwLock::new(OnboardingFlowController::new()),
        }
    }

    /// Whether onboarding already finished in an earlier session.
    ///
    /// A missing or undecodable flag counts as not complete.
    pub async fn is_complete(store: &dyn KeyValueStore) -> bool {
        match get_json::<bool>(store, keys::ONBOARDING_COMPLETE).await {
            Ok(flag) => flag.unwrap_or(false),
            Err(e) => {
                warn!(error = %e, "Could not read onboarding flag, assuming incomplete");
                false
            }
        }
    }

    /// Display name saved at the end of onboarding, empty if none.
    pub async fn stored_user_name(store: &dyn KeyValueStore) -> String {
        match get_json::<String>(store, keys::USER_NAME).await {
            Ok(name) => name.unwrap_or_default(),
            Err(e) => {
                warn!(error = %e, "Could not read stored user name");
                String::new()
            }
        }
    }

    /// Answers saved at the end of onboarding, if any.
    pub async fn stored_data(store: &dyn KeyValueStore) -> Option<OnboardingData> {
        match get_json::<OnboardingData>(store, keys::ONBOARDING_DATA).await {
            Ok(data) => data,
            Err(e) => {
                warn!(error = %e, "Stored onboarding data is unreadable");
                None
            }
        }
    }

    /// Run `f` against the controller. Navigation and answer recording go
    /// through here.
    pub async fn update<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&mut OnboardingFlowController) -> T,
    {
        let mut controller = self.controller.write().await;
        f(&mut controller)
    }

    pub async fn current_step(&self) -> OnboardingStep {
        self.controller.read().await.current_step()
    }

    pub async fn get_status(&self) -> OnboardingStatus {
        let controller = self.controller.read().await;
        OnboardingStatus {
            onboarding_completed: controller.is_completed(),
            step: controller.current_step(),
            step_index: controller.current_step_index(),
            data: controller.snapshot_data(),
        }
    }

    /// Finish onboarding and persist the handoff.
    ///
    /// The flag is written last so a partial failure leaves onboarding
    /// incomplete and the user simply goes through it again.
    pub async fn complete(&self) -> Result<OnboardingData, StorageError> {
        let data = self.controller.write().await.complete();

        set_json(self.store.as_ref(), keys::ONBOARDING_DATA, &data).await?;
        set_json(self.store.as_ref(), keys::USER_NAME, &data.name).await?;
        set_json(self.store.as_ref(), keys::ONBOARDING_COMPLETE, &true).await?;

        info!(
            user = %data.name,
            goals = data.meditation_goals.len(),
            daily_goal_minutes = data.daily_goal_minutes,
            "Onboarding complete"
        );
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::onboarding::model::RatingDimension;
    use crate::store::MemoryStore;

    #[tokio::test]
    async fn fresh_store_is_not_complete() {
        let store = MemoryStore::new();
        assert!(!OnboardingManager::is_complete(&store).await);
        assert_eq!(OnboardingManager::stored_user_name(&store).await, "");
        assert!(OnboardingManager::stored_data(&store).await.is_none());
    }

    #[tokio::test]
    async fn complete_persists_flag_name_and_data() {
        let store = Arc::new(MemoryStore::new());
        let manager = OnboardingManager::new(store.clone());

        manager
            .update(|c| {
                c.advance();
                c.record_name("Ada");
                c.record_rating(RatingDimension::Anxiety, 80);
            })
            .await;

        let data = manager.complete().await.unwrap();
        assert_eq!(data.anxiety, 80);

        assert!(OnboardingManager::is_complete(store.as_ref()).await);
        assert_eq!(OnboardingManager::stored_user_name(store.as_ref()).await, "Ada");
        assert_eq!(OnboardingManager::stored_data(store.as_ref()).await, Some(data));

        let status = manager.get_status().await;
        assert!(status.onboarding_completed);
        assert_eq!(status.step_index, 2);
    }

    #[tokio::test]
    async fn failed_write_leaves_flag_unset() {
        let store = Arc::new(MemoryStore::new());
        let manager = OnboardingManager::new(store.clone());
        store.set_fail_writes(true);

        assert!(manager.complete().await.is_err());
        store.set_fail_writes(false);
        assert!(!OnboardingManager::is_complete(store.as_ref()).await);
    }

    #[tokio::test]
    async fn corrupt_flag_reads_as_incomplete() {
        let store = MemoryStore::new();
        store.set(keys::ONBOARDING_COMPLETE, b"not json").await.unwrap();
        assert!(!OnboardingManager::is_complete(&store).await);
    }

    #[tokio::test]
    async fn stored_data_clamps_out_of_range_values() {
        let store = MemoryStore::new();
        store
            .set(
                keys::ONBOARDING_DATA,
                br#"{"name":"Ada","anxiety":200,"experience":9}"#,
            )
            .await
            .unwrap();

        let data = OnboardingManager::stored_data(&store).await.unwrap();
        assert_eq!(data.name, "Ada");
        assert_eq!(data.anxiety, 100);
        assert_eq!(data.experience, 5);
    }

    #[tokio::test]
    async fn update_returns_closure_value() {
        let manager = OnboardingManager::new(Arc::new(MemoryStore::new()));
        let index = manager
            .update(|c| {
                c.advance();
                c.advance();
                c.current_step_index()
            })
            .await;
        assert_eq!(index, 3);
        assert_eq!(manager.current_step().await, OnboardingStep::SelfieIntro);
    }
}
