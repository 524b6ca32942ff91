//! Role storage.
//!
//! Stores roles and their inheritance edges. A role and its edges are
//! written in one transaction so a partially linked role is never visible.

use std::sync::Arc;

use async_trait::async_trait;
use sqlx_core::query::query;
use sqlx_core::query_as::query_as;

use warden_core::{AuthzError, AuthzResult, Role, RoleStore};

use crate::{PgPool, db_error};

/// Database row shape for a role.
type RoleRow = (i64, String, Option<String>);

fn role_from_row(row: RoleRow) -> Role {
    Role {
        id: row.0,
        name: row.1,
        description: row.2,
    }
}

/// PostgreSQL-backed role storage.
#[derive(Clone)]
pub struct PostgresRoleStore {
    pool: Arc<PgPool>,
}

impl PostgresRoleStore {
    /// Creates a new role store over the given pool.
    #[must_use]
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RoleStore for PostgresRoleStore {
    async fn find_by_name(&self, name: &str) -> AuthzResult<Option<Role>> {
        let row: Option<RoleRow> = query_as(
            r#"
            SELECT id, name, description
            FROM roles
            WHERE name = $1
            "#,
        )
        .bind(name)
        .fetch_optional(&*self.pool)
        .await
        .map_err(db_error)?;

        Ok(row.map(role_from_row))
    }

    async fn parents_of(&self, role_id: i64) -> AuthzResult<Vec<Role>> {
        let rows: Vec<RoleRow> = query_as(
            r#"
            SELECT r.id, r.name, r.description
            FROM roles r
            JOIN role_inheritance ri ON ri.parent_id = r.id
            WHERE ri.child_id = $1
            ORDER BY r.id
            "#,
        )
        .bind(role_id)
        .fetch_all(&*self.pool)
        .await
        .map_err(db_error)?;

        Ok(rows.into_iter().map(role_from_row).collect())
    }

    async fn create(
        &self,
        name: &str,
        description: Option<&str>,
        parent_ids: &[i64],
    ) -> AuthzResult<Role> {
        let mut tx = self.pool.begin().await.map_err(db_error)?;

        let row: RoleRow = query_as(
            r#"
            INSERT INTO roles (name, description)
            VALUES ($1, $2)
            RETURNING id, name, description
            "#,
        )
        .bind(name)
        .bind(description)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if let sqlx_core::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return AuthzError::conflict(format!("role '{name}' already exists"));
            }
            db_error(e)
        })?;

        for parent_id in parent_ids {
            query(
                r#"
                INSERT INTO role_inheritance (parent_id, child_id)
                VALUES ($1, $2)
                "#,
            )
            .bind(parent_id)
            .bind(row.0)
            .execute(&mut *tx)
            .await
            .map_err(db_error)?;
        }

        tx.commit().await.map_err(db_error)?;

        Ok(role_from_row(row))
    }
}
