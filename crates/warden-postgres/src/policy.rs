//! Policy storage.
//!
//! Stores versioned policy documents. Activation deactivates every active
//! policy and activates the target inside one transaction, so readers
//! never observe two active policies, and a missing target leaves the
//! store untouched.

use std::sync::Arc;

use async_trait::async_trait;
use sqlx_core::query::query;
use sqlx_core::query_as::query_as;
use time::OffsetDateTime;

use warden_core::{AuthzError, AuthzResult, Policy, PolicyStore};

use crate::{PgPool, db_error};

/// Database row shape for a policy.
type PolicyRow = (i64, String, i32, serde_json::Value, bool, OffsetDateTime);

fn policy_from_row(row: PolicyRow) -> Policy {
    Policy {
        id: row.0,
        name: row.1,
        version: row.2,
        content: row.3,
        is_active: row.4,
        created_at: row.5,
    }
}

/// PostgreSQL-backed policy storage.
#[derive(Clone)]
pub struct PostgresPolicyStore {
    pool: Arc<PgPool>,
}

impl PostgresPolicyStore {
    /// Creates a new policy store over the given pool.
    #[must_use]
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PolicyStore for PostgresPolicyStore {
    async fn latest_version(&self, name: &str) -> AuthzResult<Option<i32>> {
        let row: (Option<i32>,) = query_as(
            r#"
            SELECT MAX(version)
            FROM policies
            WHERE name = $1
            "#,
        )
        .bind(name)
        .fetch_one(&*self.pool)
        .await
        .map_err(db_error)?;

        Ok(row.0)
    }

    async fn insert(
        &self,
        name: &str,
        version: i32,
        content: &serde_json::Value,
    ) -> AuthzResult<Policy> {
        let row: PolicyRow = query_as(
            r#"
            INSERT INTO policies (name, version, content, is_active)
            VALUES ($1, $2, $3, FALSE)
            RETURNING id, name, version, content, is_active, created_at
            "#,
        )
        .bind(name)
        .bind(version)
        .bind(content)
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| {
            if let sqlx_core::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return AuthzError::conflict(format!(
                    "policy '{name}' version {version} already exists"
                ));
            }
            db_error(e)
        })?;

        Ok(policy_from_row(row))
    }

    async fn find_by_id(&self, id: i64) -> AuthzResult<Option<Policy>> {
        let row: Option<PolicyRow> = query_as(
            r#"
            SELECT id, name, version, content, is_active, created_at
            FROM policies
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&*self.pool)
        .await
        .map_err(db_error)?;

        Ok(row.map(policy_from_row))
    }

    async fn find_active(&self) -> AuthzResult<Option<Policy>> {
        let row: Option<PolicyRow> = query_as(
            r#"
            SELECT id, name, version, content, is_active, created_at
            FROM policies
            WHERE is_active
            LIMIT 1
            "#,
        )
        .fetch_optional(&*self.pool)
        .await
        .map_err(db_error)?;

        Ok(row.map(policy_from_row))
    }

    async fn activate(&self, id: i64) -> AuthzResult<Policy> {
        let mut tx = self.pool.begin().await.map_err(db_error)?;

        query("UPDATE policies SET is_active = FALSE WHERE is_active")
            .execute(&mut *tx)
            .await
            .map_err(db_error)?;

        let row: Option<PolicyRow> = query_as(
            r#"
            UPDATE policies
            SET is_active = TRUE
            WHERE id = $1
            RETURNING id, name, version, content, is_active, created_at
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(db_error)?;

        let Some(row) = row else {
            tx.rollback().await.map_err(db_error)?;
            return Err(AuthzError::not_found(format!("Policy {id}")));
        };

        tx.commit().await.map_err(db_error)?;

        Ok(policy_from_row(row))
    }

    async fn list(&self, skip: i64, limit: i64) -> AuthzResult<Vec<Policy>> {
        let rows: Vec<PolicyRow> = query_as(
            r#"
            SELECT id, name, version, content, is_active, created_at
            FROM policies
            ORDER BY version DESC, id DESC
            OFFSET $1 LIMIT $2
            "#,
        )
        .bind(skip)
        .bind(limit)
        .fetch_all(&*self.pool)
        .await
        .map_err(db_error)?;

        Ok(rows.into_iter().map(policy_from_row).collect())
    }
}
