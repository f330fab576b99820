//! x404 preview: fake NFT mints recorded in `mints.json`, newest first.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use noema_core::model::{dedupe_mints, MintRecord};
use noema_store::MintLedger;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;

use crate::{blocking, finish, parse_body, PreviewError};

/// Program id reported in records when none is configured.
pub const PREVIEW_PROGRAM_ID: &str = "preview";

#[derive(Clone)]
struct X404State {
    ledger: Arc<MintLedger>,
    program_id: Arc<str>,
}

#[derive(Debug, Default, Deserialize)]
struct MintBody {
    #[serde(default, rename = "agentId")]
    agent_id: Value,
}

#[derive(Debug, Serialize)]
struct MintReply {
    success: bool,
    #[serde(flatten)]
    record: MintRecord,
}

pub fn x404_router(ledger: Arc<MintLedger>, program_id: &str) -> Router {
    let state = X404State {
        ledger,
        program_id: Arc::from(program_id),
    };
    let router = Router::new()
        .route("/mints", get(list))
        .route("/mint", post(mint));
    finish(router, state)
}

async fn list(State(state): State<X404State>) -> Json<Value> {
    let ledger = state.ledger.clone();
    let items = match tokio::task::spawn_blocking(move || ledger.load()).await {
        Ok(items) => dedupe_mints(items),
        Err(_) => Vec::new(),
    };
    Json(json!({ "items": items }))
}

async fn mint(State(state): State<X404State>, body: Bytes) -> Result<Json<MintReply>, PreviewError> {
    let body: MintBody = parse_body(&body)?;
    let agent_id = match body.agent_id {
        Value::String(s) if !s.trim().is_empty() => s,
        _ => return Err(PreviewError::BadRequest("agentId is required")),
    };
    let ledger = state.ledger.clone();
    let program_id = state.program_id.clone();
    let record = blocking(move || ledger.record(&agent_id, &program_id)).await?;
    info!(agent = %record.agent_id, mint = %record.nft_mint, "preview mint recorded");
    Ok(Json(MintReply {
        success: true,
        record,
    }))
}
