//! HTTP handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use serde_json::{Value, json};

use warden_core::{AuthRequest, AuthResponse, Policy, Role};

use crate::error::ApiError;
use crate::middleware::AdminKey;
use crate::state::AppState;

// =============================================================================
// Request Bodies
// =============================================================================

/// Body of `POST /roles/`.
#[derive(Debug, Deserialize)]
pub struct RoleCreate {
    /// Globally unique role name.
    pub name: String,

    /// Optional human-readable description.
    #[serde(default)]
    pub description: Option<String>,

    /// Names of parent roles; all must already exist.
    #[serde(default)]
    pub parent_names: Vec<String>,
}

/// Body of `POST /policies/`.
#[derive(Debug, Deserialize)]
pub struct PolicyCreate {
    /// Name grouping a family of versions.
    pub name: String,

    /// Policy document; the recognized key is `rules`.
    pub content: Value,
}

/// Query parameters of `GET /policies/`.
#[derive(Debug, Deserialize)]
pub struct Pagination {
    /// Number of entries to skip.
    #[serde(default)]
    pub skip: i64,

    /// Maximum number of entries to return.
    #[serde(default = "Pagination::default_limit")]
    pub limit: i64,
}

impl Pagination {
    fn default_limit() -> i64 {
        100
    }
}

// =============================================================================
// Decision Surface
// =============================================================================

/// `POST /access` - the master authorization endpoint.
pub async fn authorize(
    State(state): State<AppState>,
    Json(request): Json<AuthRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let response = state.service.authorize(&request).await?;
    Ok(Json(response))
}

/// `POST /access/batch` - evaluates multiple requests in order.
pub async fn authorize_batch(
    State(state): State<AppState>,
    Json(requests): Json<Vec<AuthRequest>>,
) -> Result<Json<Vec<AuthResponse>>, ApiError> {
    let responses = state.service.authorize_batch(&requests).await?;
    Ok(Json(responses))
}

// =============================================================================
// Management Surface
// =============================================================================

/// `POST /roles/` - creates a role. Requires the admin API key.
pub async fn create_role(
    State(state): State<AppState>,
    _admin: AdminKey,
    Json(body): Json<RoleCreate>,
) -> Result<Json<Role>, ApiError> {
    let role = state
        .graph
        .create(&body.name, body.description.as_deref(), &body.parent_names)
        .await?;
    Ok(Json(role))
}

/// `POST /policies/` - creates an inactive, auto-versioned policy.
/// Requires the admin API key.
pub async fn create_policy(
    State(state): State<AppState>,
    _admin: AdminKey,
    Json(body): Json<PolicyCreate>,
) -> Result<Json<Policy>, ApiError> {
    let policy = state.registry.create(&body.name, body.content).await?;
    Ok(Json(policy))
}

/// `POST /policies/{policy_id}/activate` - activates a policy version.
/// Requires the admin API key.
pub async fn activate_policy(
    State(state): State<AppState>,
    _admin: AdminKey,
    Path(policy_id): Path<i64>,
) -> Result<Json<Policy>, ApiError> {
    let policy = state.registry.activate(policy_id).await?;
    Ok(Json(policy))
}

/// `GET /policies/` - lists policy versions, newest version first.
/// Requires the admin API key.
pub async fn list_policies(
    State(state): State<AppState>,
    _admin: AdminKey,
    Query(pagination): Query<Pagination>,
) -> Result<Json<Vec<Policy>>, ApiError> {
    let policies = state
        .registry
        .list(pagination.skip.max(0), pagination.limit.clamp(0, 1000))
        .await?;
    Ok(Json(policies))
}

/// `GET /policies/active` - returns the active policy.
/// Requires the admin API key.
///
/// Reads through the cache without installing on a miss; the decision
/// path owns lazy population.
pub async fn get_active_policy(
    State(state): State<AppState>,
    _admin: AdminKey,
) -> Result<Json<Policy>, ApiError> {
    if let Some(policy) = state.cache.get().await {
        return Ok(Json((*policy).clone()));
    }

    state
        .registry
        .active()
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("No policy is currently active."))
}

// =============================================================================
// Health Surface
// =============================================================================

/// `GET /` - basic liveness banner.
pub async fn root() -> Json<Value> {
    Json(json!({"status": "Authorization service is operational"}))
}

/// `GET /health` - detailed health report.
///
/// Returns 200 when all checks pass and 503 when the database is
/// unreachable. A missing active policy is reported as a warning, not a
/// failure.
pub async fn health(State(state): State<AppState>) -> Response {
    let mut degraded = false;

    let database = match warden_postgres::ping(&state.pool).await {
        Ok(()) => json!({
            "status": "healthy",
            "message": "Database connection successful"
        }),
        Err(err) => {
            tracing::error!(error = %err, "database health check failed");
            degraded = true;
            json!({
                "status": "unhealthy",
                "message": format!("Database connection failed: {err}")
            })
        }
    };

    let cached = state.cache.get().await;
    let cache = json!({
        "status": "healthy",
        "message": "Cache operational",
        "has_active_policy": cached.is_some()
    });

    let policy = match state.registry.active().await {
        Ok(Some(active)) => json!({
            "status": "healthy",
            "message": "Active policy found",
            "policy_id": active.id
        }),
        Ok(None) => json!({
            "status": "warning",
            "message": "No active policy configured",
            "policy_id": null
        }),
        Err(err) => {
            tracing::error!(error = %err, "policy health check failed");
            json!({
                "status": "error",
                "message": format!("Policy check failed: {err}")
            })
        }
    };

    let status_code = if degraded {
        StatusCode::SERVICE_UNAVAILABLE
    } else {
        StatusCode::OK
    };
    let body = json!({
        "status": if degraded { "degraded" } else { "healthy" },
        "service": "warden",
        "version": env!("CARGO_PKG_VERSION"),
        "checks": {
            "database": database,
            "cache": cache,
            "policy": policy,
        }
    });

    (status_code, Json(body)).into_response()
}
