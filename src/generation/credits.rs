//! Free generation allowance, counted locally and kept in durable storage.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::error::StorageError;
use crate::store::{KeyValueStore, get_json, keys, set_json};

/// Generations a new user gets for free.
pub const MAX_FREE_CREDITS: u32 = 3;

/// Counter of free generations used so far.
pub struct MeditationCredits {
    store: Arc<dyn KeyValueStore>,
    used: Mutex<u32>,
    max_free: u32,
}

impl MeditationCredits {
    /// Read `creditsUsed` from storage. Missing or unreadable counts as 0.
    pub async fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let used = match get_json::<u32>(store.as_ref(), keys::CREDITS_USED).await {
            Ok(used) => used.unwrap_or(0),
            Err(e) => {
                warn!(error = %e, "Credit counter unreadable, starting from zero");
                0
            }
        };
        Self {
            store,
            used: Mutex::new(used),
            max_free: MAX_FREE_CREDITS,
        }
    }

    /// Builder: override the free allowance.
    pub fn with_max_free(mut self, max_free: u32) -> Self {
        self.max_free = max_free;
        self
    }

    pub fn max_free_credits(&self) -> u32 {
        self.max_free
    }

    pub async fn credits_used(&self) -> u32 {
        *self.used.lock().await
    }

    pub async fn remaining(&self) -> u32 {
        self.max_free.saturating_sub(self.credits_used().await)
    }

    pub async fn has_credit(&self) -> bool {
        self.remaining().await > 0
    }

    /// Use one credit. Returns `false` without changing anything when the
    /// allowance is already spent.
    ///
    /// On a storage error the in-memory count has still advanced.
    pub async fn use_credit(&self) -> Result<bool, StorageError> {
        let mut used = self.used.lock().await;
        if *used >= self.max_free {
            return Ok(false);
        }
        *used += 1;
        info!(used = *used, max_free = self.max_free, "Credit used");
        set_json(self.store.as_ref(), keys::CREDITS_USED, &*used).await?;
        Ok(true)
    }

    /// "`used` of `max` free credits used", as shown under the generate button.
    pub async fn summary(&self) -> String {
        format!(
            "{} of {} free credits used",
            self.credits_used().await,
            self.max_free
        )
    }
}
