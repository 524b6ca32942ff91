//! Router assembly.

use axum::Router;
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Builds the application router.
///
/// The decision surface (`/access`) is unauthenticated; the management
/// surface under `/roles` and `/policies` is guarded per handler by the
/// admin-key extractor.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/access", post(handlers::authorize))
        .route("/access/batch", post(handlers::authorize_batch))
        .route("/roles/", post(handlers::create_role))
        .route(
            "/policies/",
            post(handlers::create_policy).get(handlers::list_policies),
        )
        .route("/policies/active", get(handlers::get_active_policy))
        .route(
            "/policies/{policy_id}/activate",
            post(handlers::activate_policy),
        )
        .layer(axum::middleware::from_fn(middleware::request_id))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
