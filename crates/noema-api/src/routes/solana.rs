//! JSON-RPC passthrough to the configured Solana endpoint.
//!
//! The body is forwarded untouched; the upstream status and JSON body come
//! back as they are. Keeps RPC provider keys out of the browser.

use std::sync::Arc;

use anyhow::Context;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::Value;

use crate::error::ApiError;
use crate::state::AppState;

pub async fn proxy(State(state): State<Arc<AppState>>, body: Bytes) -> Result<Response, ApiError> {
    let upstream = state
        .http
        .post(&state.config.solana_rpc)
        .header(header::CONTENT_TYPE, "application/json")
        .body(body)
        .send()
        .await
        .context("solana rpc request")?;

    let status = upstream.status();
    let bytes = upstream.bytes().await.context("read solana rpc response")?;
    let json: Value = serde_json::from_slice(&bytes)
        .map_err(|_| ApiError::BadGateway(format!("upstream returned non-JSON body ({status})")))?;
    Ok((status, Json(json)).into_response())
}
