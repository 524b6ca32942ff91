//! PostgreSQL storage backend for the warden authorization service.
//!
//! Provides persistent storage for:
//!
//! - Roles and the role-inheritance edge set
//! - Versioned policies with the single-active-policy invariant
//! - The append-only decision audit trail
//!
//! The store structs implement the `warden-core` storage traits over a
//! shared connection pool. The schema is created idempotently at startup
//! by [`ensure_schema`].

pub mod audit;
pub mod policy;
pub mod pool;
pub mod role;
pub mod schema;

use sqlx_core::pool::Pool;
use sqlx_postgres::Postgres;

use warden_core::AuthzError;

/// PostgreSQL connection pool type alias.
pub type PgPool = Pool<Postgres>;

pub use audit::PostgresAuditStore;
pub use policy::PostgresPolicyStore;
pub use pool::{PgPoolOptions, connect, ping};
pub use role::PostgresRoleStore;
pub use schema::ensure_schema;

/// Maps a driver error to the core storage error.
pub(crate) fn db_error(err: sqlx_core::Error) -> AuthzError {
    AuthzError::storage(err.to_string())
}
