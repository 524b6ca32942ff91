//! Policy creation, versioning and activation.

use std::sync::Arc;

use serde_json::Value;

use crate::AuthzResult;
use crate::cache::ActivePolicyCache;
use crate::storage::PolicyStore;
use crate::types::Policy;

/// Manages the versioned policy families and the single active policy.
#[derive(Clone)]
pub struct PolicyRegistry {
    store: Arc<dyn PolicyStore>,
    cache: ActivePolicyCache,
}

impl PolicyRegistry {
    /// Creates a new registry over the given store and cache.
    #[must_use]
    pub fn new(store: Arc<dyn PolicyStore>, cache: ActivePolicyCache) -> Self {
        Self { store, cache }
    }

    /// Creates a new, inactive policy version.
    ///
    /// The version is one greater than the highest existing version for
    /// this name, or 1 for the first insert. The content document is not
    /// validated here; malformed rules degrade at evaluation time.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    pub async fn create(&self, name: &str, content: Value) -> AuthzResult<Policy> {
        let version = self
            .store
            .latest_version(name)
            .await?
            .map_or(1, |latest| latest + 1);

        let policy = self.store.insert(name, version, &content).await?;
        tracing::info!(
            policy_id = policy.id,
            name = policy.name.as_str(),
            version = policy.version,
            "policy version created"
        );
        Ok(policy)
    }

    /// Activates the policy with the given id, deactivating any currently
    /// active policy in the same transaction, and installs the result in
    /// the active-policy cache before returning.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the id does not exist (no state is changed),
    /// or an error if the storage operation fails.
    pub async fn activate(&self, id: i64) -> AuthzResult<Policy> {
        let policy = self.store.activate(id).await?;
        self.cache.set(Arc::new(policy.clone())).await;
        tracing::info!(
            policy_id = policy.id,
            name = policy.name.as_str(),
            version = policy.version,
            "policy activated"
        );
        Ok(policy)
    }

    /// Returns the single active policy, or `None`.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    pub async fn active(&self) -> AuthzResult<Option<Policy>> {
        self.store.find_active().await
    }

    /// Lists policy versions ordered by version descending.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    pub async fn list(&self, skip: i64, limit: i64) -> AuthzResult<Vec<Policy>> {
        self.store.list(skip, limit).await
    }
}
