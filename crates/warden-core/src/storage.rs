//! Storage traits for roles, policies and the audit trail.
//!
//! These traits define the persistence interface the engine is written
//! against. Implementations are provided by storage backends (e.g.
//! PostgreSQL) and must be transactional per call.

use async_trait::async_trait;
use serde_json::Value;

use crate::AuthzResult;
use crate::types::{AuditEntry, Policy, Role};

// =============================================================================
// Role Store
// =============================================================================

/// Storage operations for roles and the role-inheritance edge set.
#[async_trait]
pub trait RoleStore: Send + Sync {
    /// Find a role by its name.
    ///
    /// Returns `None` if the role doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    async fn find_by_name(&self, name: &str) -> AuthzResult<Option<Role>>;

    /// Return the immediate parents of the given role.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    async fn parents_of(&self, role_id: i64) -> AuthzResult<Vec<Role>>;

    /// Create a role together with its inheritance edges, in one
    /// transaction.
    ///
    /// # Errors
    ///
    /// Returns `Conflict` if a role with the same name already exists, or
    /// an error if the storage operation fails.
    async fn create(
        &self,
        name: &str,
        description: Option<&str>,
        parent_ids: &[i64],
    ) -> AuthzResult<Role>;
}

// =============================================================================
// Policy Store
// =============================================================================

/// Storage operations for versioned policies.
///
/// The store upholds two invariants: versions are unique per policy name,
/// and at most one policy is active across the entire store.
#[async_trait]
pub trait PolicyStore: Send + Sync {
    /// Return the highest version stored for the given policy name, or
    /// `None` if no version exists yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    async fn latest_version(&self, name: &str) -> AuthzResult<Option<i32>>;

    /// Insert a new, inactive policy version.
    ///
    /// # Errors
    ///
    /// Returns `Conflict` if the `(name, version)` pair already exists, or
    /// an error if the storage operation fails.
    async fn insert(&self, name: &str, version: i32, content: &Value) -> AuthzResult<Policy>;

    /// Find a policy by its id.
    ///
    /// Returns `None` if the policy doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    async fn find_by_id(&self, id: i64) -> AuthzResult<Option<Policy>>;

    /// Return the single active policy, or `None`.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    async fn find_active(&self) -> AuthzResult<Option<Policy>>;

    /// Activate the policy with the given id.
    ///
    /// Deactivates every currently active policy and activates the target
    /// in one serializable transaction. If the target does not exist the
    /// transaction aborts without any state change.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the target id does not exist, or an error if
    /// the storage operation fails.
    async fn activate(&self, id: i64) -> AuthzResult<Policy>;

    /// List policies ordered by version descending.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    async fn list(&self, skip: i64, limit: i64) -> AuthzResult<Vec<Policy>>;
}

// =============================================================================
// Audit Store
// =============================================================================

/// Append-only storage for decision audit records.
#[async_trait]
pub trait AuditStore: Send + Sync {
    /// Append one audit record and return its newly assigned id.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    async fn append(&self, entry: &AuditEntry) -> AuthzResult<i64>;
}
