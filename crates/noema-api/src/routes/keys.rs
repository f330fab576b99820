//! API-key issuance and verification.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use noema_core::defaults;
use noema_core::token::{self, IssuedKey};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};

use crate::auth::presented_token;
use crate::error::ApiError;
use crate::routes::{parse_body, unix_now};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
struct NewKeyBody {
    #[serde(default)]
    plan: Option<String>,
    #[serde(default)]
    org: Option<String>,
}

pub async fn new_key(State(state): State<Arc<AppState>>, body: Bytes) -> Result<Json<IssuedKey>, ApiError> {
    let keys = &state.config.core.keys;
    let secret = keys.secret()?;
    let body: NewKeyBody = parse_body(&body)?;
    let plan = body.plan.filter(|p| !p.is_empty());
    let plan = plan.as_deref().unwrap_or(defaults::KEY_PLAN);
    let org = body.org.filter(|o| !o.is_empty());
    let org = org.as_deref().unwrap_or(defaults::KEY_ORG);

    let now = unix_now();
    let issued = token::issue(secret, plan, org, keys.ttl_hours, now)?;
    let hash = token::key_hash(&issued.api_key);
    info!(key_hash = %hash, %plan, %org, "api key issued");

    if let Some(upstash) = &state.upstash {
        let meta = [
            ("plan", plan.to_string()),
            ("org", org.to_string()),
            ("createdAt", now.to_string()),
        ];
        if let Err(e) = upstash.hset(&format!("keymeta:{hash}"), &meta).await {
            warn!(key_hash = %hash, "storing key metadata failed: {e:#}");
        }
    }

    Ok(Json(issued))
}

#[derive(Debug, Default, Deserialize)]
pub struct VerifyQuery {
    #[serde(default)]
    token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct VerifyBody {
    #[serde(default)]
    token: Option<String>,
}

/// Token from the auth header, then `?token=`, then a JSON `{token}` body.
pub async fn verify_key(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<VerifyQuery>,
    body: Bytes,
) -> Result<Response, ApiError> {
    let secret = state.config.core.keys.secret()?;

    let from_body = || {
        parse_body::<VerifyBody>(&body)
            .ok()
            .and_then(|b| b.token)
    };
    let token = presented_token(&headers)
        .map(str::to_string)
        .or(query.token)
        .or_else(from_body)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ApiError::bad_request("Missing token"))?;

    let resp = match token::verify(secret, &token, unix_now()) {
        Ok(claims) => Json(json!({ "valid": true, "decoded": claims })).into_response(),
        Err(e) => (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "valid": false, "error": e.message() })),
        )
            .into_response(),
    };
    Ok(resp)
}
