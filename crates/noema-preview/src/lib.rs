//! noema-preview
//!
//! Demo back ends for the dashboard's staking and x404 pages. Every request
//! is appended to a JSON file under the data directory; nothing touches a
//! chain. Not for real bookkeeping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use noema_store::StoreError;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use thiserror::Error;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::error;

pub mod staking;
pub mod x404;

pub use staking::staking_router;
pub use x404::x404_router;

/// Default listen port of the staking preview.
pub const STAKING_PORT: u16 = 4010;
/// Default listen port of the x404 preview.
pub const X404_PORT: u16 = 4004;

#[derive(Debug, Error)]
pub enum PreviewError {
    #[error("{0}")]
    BadRequest(&'static str),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("ledger task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl IntoResponse for PreviewError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Store(_) | Self::Join(_) => {
                error!("preview request failed: {self}");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

/// Parse a request body as a JSON object, whatever its content type. An
/// empty body or a non-object JSON value reads as `{}`.
pub(crate) fn parse_body<T: DeserializeOwned + Default>(body: &[u8]) -> Result<T, PreviewError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    let value: Value =
        serde_json::from_slice(body).map_err(|_| PreviewError::BadRequest("Invalid JSON body"))?;
    if !value.is_object() {
        return Ok(T::default());
    }
    serde_json::from_value(value).map_err(|_| PreviewError::BadRequest("Invalid JSON body"))
}

/// Ledger calls do blocking file I/O; keep them off the async workers.
pub(crate) async fn blocking<T, F>(f: F) -> Result<T, PreviewError>
where
    F: FnOnce() -> Result<T, StoreError> + Send + 'static,
    T: Send + 'static,
{
    Ok(tokio::task::spawn_blocking(f).await??)
}

/// Shared outer layers of both services.
pub(crate) fn finish<S>(router: Router<S>, state: S) -> Router
where
    S: Clone + Send + Sync + 'static,
{
    router
        .route("/health", get(health))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "ok": true }))
}
