//! Route table and shared handler helpers.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{header, HeaderName, Method, Request};
use axum::routing::{get, post, MethodRouter};
use axum::Router;
use serde::de::DeserializeOwned;
use time::OffsetDateTime;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use crate::error::ApiError;
use crate::state::AppState;

pub mod agents;
pub mod checkout;
pub mod crypto;
pub mod health;
pub mod keys;
pub mod solana;
pub mod usage;
pub mod webhooks;

type Shared = Arc<AppState>;

pub fn router(state: Shared) -> Router {
    Router::new()
        .route("/api/health", endpoint(get(health::health)))
        .route("/api/build-info", endpoint(get(health::build_info)))
        .route("/api/solana", endpoint(post(solana::proxy)))
        .route("/api/checkout/session", endpoint(post(checkout::create_session)))
        .route("/api/crypto/solana-pay", endpoint(post(crypto::solana_pay)))
        .route("/api/keys/new", endpoint(post(keys::new_key)))
        .route(
            "/api/keys/verify",
            endpoint(get(keys::verify_key).post(keys::verify_key)),
        )
        .route("/api/webhooks/stripe", endpoint(post(webhooks::stripe)))
        .route("/api/agents", endpoint(get(agents::list)))
        .route("/api/agents/{agent_id}", endpoint(get(agents::get_agent)))
        .route("/api/usage/summary", endpoint(get(usage::summary)))
        .fallback(not_found)
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http().make_span_with(|req: &Request<Body>| {
                    let request_id = req
                        .headers()
                        .get("x-request-id")
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or("-");
                    tracing::info_span!(
                        "http",
                        method = %req.method(),
                        path = %req.uri().path(),
                        request_id = %request_id,
                    )
                }))
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(cors()),
        )
}

fn cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static("x-api-key"),
        ])
        .max_age(Duration::from_secs(86_400))
}

/// Unrouted methods get a JSON 405. `OPTIONS` never gets here: the CORS
/// layer answers it.
fn endpoint(route: MethodRouter<Shared>) -> MethodRouter<Shared> {
    route.fallback(|| async { ApiError::MethodNotAllowed })
}

async fn not_found() -> ApiError {
    ApiError::NotFound("Not Found".to_string())
}

/// Parse a JSON request body. An empty body reads as `{}`.
pub(crate) fn parse_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, ApiError> {
    let body: &[u8] = if body.iter().all(u8::is_ascii_whitespace) {
        b"{}"
    } else {
        body
    };
    serde_json::from_slice(body).map_err(|e| ApiError::bad_request(format!("Invalid JSON body: {e}")))
}

pub(crate) fn unix_now() -> i64 {
    OffsetDateTime::now_utc().unix_timestamp()
}
