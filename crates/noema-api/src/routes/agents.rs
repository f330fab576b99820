//! Authenticated, metered reads of the on-chain agent registry.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use axum::Json;
use noema_solana_client::{validate_agent_id, MAX_LIST_LIMIT};
use serde::Deserialize;
use serde_json::json;

use crate::auth::{self, Caller, RateLimit};
use crate::error::ApiError;
use crate::routes::unix_now;
use crate::state::AppState;

pub const DEFAULT_LIST_LIMIT: usize = 100;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    limit: Option<String>,
}

/// Out-of-range or unparsable limits fall back to the default.
fn list_limit(raw: Option<&str>) -> usize {
    raw.and_then(|s| s.trim().parse::<usize>().ok())
        .filter(|n| *n > 0)
        .unwrap_or(DEFAULT_LIST_LIMIT)
        .min(MAX_LIST_LIMIT)
}

/// Authenticate and take one rate-limit token. `Err(response)` is the
/// finished 429 when the window is exhausted.
pub(crate) async fn admit(
    state: &AppState,
    headers: &HeaderMap,
) -> Result<Result<(Caller, RateLimit), Response>, ApiError> {
    let now = unix_now();
    let caller = auth::authenticate(&state.config.core.keys, headers, now)?;
    let limit = auth::check_rate_limit(state, &caller, now).await?;
    if !limit.allowed {
        return Ok(Err(limit.apply(ApiError::RateLimited.into_response())));
    }
    Ok(Ok((caller, limit)))
}

pub async fn list(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<ListQuery>,
) -> Result<Response, ApiError> {
    let (caller, limit) = match admit(&state, &headers).await? {
        Ok(admitted) => admitted,
        Err(rejected) => return Ok(rejected),
    };

    let agents = state
        .registry
        .list_identities(list_limit(query.limit.as_deref()))
        .await?;
    auth::track_usage(&state, &caller, 1).await;

    let body = json!({ "count": agents.len(), "agents": agents });
    Ok(limit.apply(Json(body).into_response()))
}

pub async fn get_agent(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(agent_id): Path<String>,
) -> Result<Response, ApiError> {
    let (caller, limit) = match admit(&state, &headers).await? {
        Ok(admitted) => admitted,
        Err(rejected) => return Ok(rejected),
    };

    validate_agent_id(&agent_id).map_err(|e| ApiError::bad_request(format!("Invalid agentId: {e}")))?;
    let agent = state
        .registry
        .fetch_agent(&agent_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Agent not found".to_string()))?;
    auth::track_usage(&state, &caller, 1).await;

    Ok(limit.apply(Json(agent).into_response()))
}
