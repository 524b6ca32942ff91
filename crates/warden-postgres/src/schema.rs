//! Database schema bootstrap.
//!
//! The schema is small and changes rarely, so it is applied as idempotent
//! DDL at startup rather than through versioned migrations.

use sqlx_core::query::query;
use tracing::info;

use warden_core::AuthzResult;

use crate::{PgPool, db_error};

/// Idempotent DDL, applied in order at startup.
///
/// The partial unique index on `policies.is_active` backs the
/// at-most-one-active invariant at the store level; the unique
/// `(name, version)` index backs auto-versioning.
const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS roles (
        id          BIGSERIAL PRIMARY KEY,
        name        TEXT NOT NULL UNIQUE,
        description TEXT
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS role_inheritance (
        parent_id BIGINT NOT NULL REFERENCES roles (id),
        child_id  BIGINT NOT NULL REFERENCES roles (id),
        PRIMARY KEY (parent_id, child_id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS policies (
        id         BIGSERIAL PRIMARY KEY,
        name       TEXT NOT NULL,
        version    INTEGER NOT NULL,
        content    JSONB NOT NULL,
        is_active  BOOLEAN NOT NULL DEFAULT FALSE,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        UNIQUE (name, version)
    )
    "#,
    r#"
    CREATE UNIQUE INDEX IF NOT EXISTS policies_single_active
        ON policies (is_active)
        WHERE is_active
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS audit_logs (
        id          BIGSERIAL PRIMARY KEY,
        subject     TEXT NOT NULL,
        action      TEXT NOT NULL,
        resource    TEXT NOT NULL,
        decision    BOOLEAN NOT NULL,
        explanation TEXT,
        timestamp   TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
];

/// Creates all tables and indexes if they do not exist yet.
///
/// # Errors
///
/// Returns an error if any DDL statement fails.
pub async fn ensure_schema(pool: &PgPool) -> AuthzResult<()> {
    for statement in SCHEMA {
        query(statement).execute(pool).await.map_err(db_error)?;
    }

    info!("database schema ensured");
    Ok(())
}
