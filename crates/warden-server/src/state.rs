//! Shared application state.

use std::sync::Arc;

use warden_core::{
    ActivePolicyCache, Auditor, DecisionService, PolicyRegistry, RoleGraph,
};
use warden_postgres::{
    PgPool, PostgresAuditStore, PostgresPolicyStore, PostgresRoleStore,
};

use crate::config::AppConfig;

/// State shared by all handlers.
#[derive(Clone)]
pub struct AppState {
    /// The authorization decision pipeline.
    pub service: Arc<DecisionService>,

    /// Role management (creation, expansion).
    pub graph: RoleGraph,

    /// Policy management (creation, activation, listing).
    pub registry: PolicyRegistry,

    /// The active-policy cache slot shared with the service and registry.
    pub cache: ActivePolicyCache,

    /// Connection pool, used by the health check.
    pub pool: Arc<PgPool>,

    /// Bearer credential required on management endpoints.
    pub admin_api_key: Arc<str>,
}

impl AppState {
    /// Wires the core components over the PostgreSQL stores.
    #[must_use]
    pub fn new(pool: Arc<PgPool>, config: &AppConfig) -> Self {
        let cache = ActivePolicyCache::new();
        let graph = RoleGraph::new(Arc::new(PostgresRoleStore::new(pool.clone())));
        let registry = PolicyRegistry::new(
            Arc::new(PostgresPolicyStore::new(pool.clone())),
            cache.clone(),
        );
        let auditor = Auditor::new(Arc::new(PostgresAuditStore::new(pool.clone())));
        let service = Arc::new(DecisionService::new(
            graph.clone(),
            registry.clone(),
            cache.clone(),
            auditor,
        ));

        Self {
            service,
            graph,
            registry,
            cache,
            pool,
            admin_api_key: config.admin_api_key.as_str().into(),
        }
    }
}
