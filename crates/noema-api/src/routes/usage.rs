use std::sync::Arc;

use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::auth;
use crate::error::ApiError;
use crate::routes::agents::admit;
use crate::state::AppState;

/// Call counts and cost for the calling key.
pub async fn summary(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Result<Response, ApiError> {
    let (caller, limit) = match admit(&state, &headers).await? {
        Ok(admitted) => admitted,
        Err(rejected) => return Ok(rejected),
    };
    let summary = auth::usage_summary(&state, &caller).await?;
    Ok(limit.apply(Json(summary).into_response()))
}
