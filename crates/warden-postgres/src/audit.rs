//! Audit-trail storage.
//!
//! Append-only; rows are never updated or deleted. The generated id is
//! returned to the caller as the decision's trace id.

use std::sync::Arc;

use async_trait::async_trait;
use sqlx_core::query_as::query_as;

use warden_core::{AuditEntry, AuditStore, AuthzResult};

use crate::{PgPool, db_error};

/// PostgreSQL-backed audit storage.
#[derive(Clone)]
pub struct PostgresAuditStore {
    pool: Arc<PgPool>,
}

impl PostgresAuditStore {
    /// Creates a new audit store over the given pool.
    #[must_use]
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuditStore for PostgresAuditStore {
    async fn append(&self, entry: &AuditEntry) -> AuthzResult<i64> {
        let row: (i64,) = query_as(
            r#"
            INSERT INTO audit_logs (subject, action, resource, decision, explanation)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(&entry.subject)
        .bind(&entry.action)
        .bind(&entry.resource)
        .bind(entry.decision)
        .bind(&entry.explanation)
        .fetch_one(&*self.pool)
        .await
        .map_err(db_error)?;

        Ok(row.0)
    }
}
