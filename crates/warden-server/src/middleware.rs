//! HTTP middleware and extractors.

use axum::body::Body;
use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use axum::http::{HeaderName, HeaderValue, Request, header};
use axum::middleware::Next;
use axum::response::Response;
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

// =============================================================================
// Request Id
// =============================================================================

/// Middleware that ensures each request has an `x-request-id` and mirrors
/// it on the response.
pub async fn request_id(mut req: Request<Body>, next: Next) -> Response {
    let header_name = HeaderName::from_static("x-request-id");

    // If the incoming request already has a request-id, preserve it;
    // otherwise generate one.
    let req_id_value = req
        .headers()
        .get(&header_name)
        .cloned()
        .unwrap_or_else(|| {
            HeaderValue::from_str(&Uuid::new_v4().to_string())
                .expect("uuid is a valid header value")
        });

    // Add to request extensions for downstream usage (e.g. logging).
    req.extensions_mut().insert(req_id_value.clone());

    let mut res = next.run(req).await;

    res.headers_mut().insert(header_name, req_id_value);

    res
}

// =============================================================================
// Admin Key Extractor
// =============================================================================

/// The configured admin credential, extractable from the app state.
#[derive(Clone)]
pub struct AdminKeyConfig(pub std::sync::Arc<str>);

impl FromRef<AppState> for AdminKeyConfig {
    fn from_ref(state: &AppState) -> Self {
        Self(state.admin_api_key.clone())
    }
}

/// Extractor guarding management endpoints.
///
/// Requires `Authorization: Bearer <ADMIN_API_KEY>`; anything else is
/// rejected with 403.
pub struct AdminKey;

impl<S> FromRequestParts<S> for AdminKey
where
    S: Send + Sync,
    AdminKeyConfig: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let AdminKeyConfig(expected) = AdminKeyConfig::from_ref(state);

        let presented = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "));

        match presented {
            Some(key) if key == expected.as_ref() => Ok(Self),
            _ => {
                tracing::debug!("management access denied: invalid or missing API key");
                Err(ApiError::forbidden(
                    "Invalid or missing API Key for management access.",
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::routing::get;
    use axum::Router;
    use tower::util::ServiceExt;

    #[derive(Clone)]
    struct TestState {
        admin_api_key: std::sync::Arc<str>,
    }

    impl FromRef<TestState> for AdminKeyConfig {
        fn from_ref(state: &TestState) -> Self {
            Self(state.admin_api_key.clone())
        }
    }

    async fn guarded(_admin: AdminKey) -> &'static str {
        "ok"
    }

    fn app() -> Router {
        Router::new()
            .route("/guarded", get(guarded))
            .with_state(TestState {
                admin_api_key: "secret-key".into(),
            })
    }

    #[tokio::test]
    async fn test_missing_key_is_forbidden() {
        let response = app()
            .oneshot(Request::get("/guarded").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_wrong_key_is_forbidden() {
        let response = app()
            .oneshot(
                Request::get("/guarded")
                    .header("authorization", "Bearer wrong-key")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_correct_key_is_accepted() {
        let response = app()
            .oneshot(
                Request::get("/guarded")
                    .header("authorization", "Bearer secret-key")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_request_id_is_issued_and_mirrored() {
        let app = Router::new()
            .route("/", get(|| async { "ok" }))
            .layer(axum::middleware::from_fn(request_id));

        let response = app
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert!(response.headers().contains_key("x-request-id"));
    }

    #[tokio::test]
    async fn test_incoming_request_id_is_preserved() {
        let app = Router::new()
            .route("/", get(|| async { "ok" }))
            .layer(axum::middleware::from_fn(request_id));

        let response = app
            .oneshot(
                Request::get("/")
                    .header("x-request-id", "caller-chosen")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(
            response.headers().get("x-request-id").unwrap(),
            "caller-chosen"
        );
    }
}
