//! Single-slot cache for the active policy.
//!
//! Only one policy is ever active, so the cache is a process-wide slot
//! holding the current one. The slot is written by policy activation and
//! by the decision path's lazy load on a miss.

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::types::Policy;

/// Process-wide holder of the currently active policy.
///
/// Cloning the cache clones a handle to the same slot.
#[derive(Clone, Default)]
pub struct ActivePolicyCache {
    slot: Arc<RwLock<Option<Arc<Policy>>>>,
}

impl ActivePolicyCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached active policy, if any.
    pub async fn get(&self) -> Option<Arc<Policy>> {
        self.slot.read().await.clone()
    }

    /// Replaces the slot with the given policy.
    ///
    /// Called by policy activation; after activation commits, the slot
    /// holds the newly active policy before control returns to the client.
    pub async fn set(&self, policy: Arc<Policy>) {
        let mut slot = self.slot.write().await;
        tracing::debug!(
            policy_id = policy.id,
            version = policy.version,
            "active-policy cache updated"
        );
        *slot = Some(policy);
    }

    /// Installs the given policy only if the slot is empty, and returns
    /// the slot's occupant.
    ///
    /// This is the lazy-load path: a concurrent activation may have filled
    /// the slot with a newer policy between the caller's read and this
    /// install, in which case that policy wins and is returned.
    pub async fn install_if_empty(&self, policy: Arc<Policy>) -> Arc<Policy> {
        let mut slot = self.slot.write().await;
        match &*slot {
            Some(current) => current.clone(),
            None => {
                tracing::debug!(
                    policy_id = policy.id,
                    version = policy.version,
                    "active-policy cache populated on miss"
                );
                *slot = Some(policy.clone());
                policy
            }
        }
    }
}
