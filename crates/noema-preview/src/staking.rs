//! Staking preview: `stake`, `unstake` and `claim` events appended to
//! `staking.json`.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use noema_core::model::{StakeKind, StakingDb};
use noema_store::StakingLedger;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use crate::{blocking, finish, parse_body, PreviewError};

#[derive(Debug, Default, Deserialize)]
pub struct StakeBody {
    #[serde(default)]
    pub amount: Value,
    #[serde(default)]
    pub wallet: Value,
    #[serde(default)]
    pub signature: Value,
}

impl StakeBody {
    /// Amount as a positive finite number plus a non-empty wallet string.
    fn validate(&self) -> Result<(f64, &str), PreviewError> {
        let amount = match &self.amount {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        let wallet = match &self.wallet {
            Value::String(w) if !w.trim().is_empty() => Some(w.trim()),
            _ => None,
        };
        match (amount, wallet) {
            (Some(a), Some(w)) if a.is_finite() && a > 0.0 => Ok((a, w)),
            _ => Err(PreviewError::BadRequest("amount and wallet required")),
        }
    }

    /// Non-string or empty signatures are dropped.
    fn signature(&self) -> Option<String> {
        match &self.signature {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            _ => None,
        }
    }
}

pub fn staking_router(ledger: Arc<StakingLedger>) -> Router {
    let router = Router::new()
        .route("/stakes", get(list))
        .route("/stake", post(stake))
        .route("/unstake", post(unstake))
        .route("/claim", post(claim));
    finish(router, ledger)
}

async fn list(State(ledger): State<Arc<StakingLedger>>) -> Result<Json<StakingDb>, PreviewError> {
    let db = blocking(move || ledger.load()).await?;
    Ok(Json(db))
}

async fn stake(state: State<Arc<StakingLedger>>, body: Bytes) -> Result<Json<Value>, PreviewError> {
    record(StakeKind::Stake, state, body).await
}

async fn unstake(state: State<Arc<StakingLedger>>, body: Bytes) -> Result<Json<Value>, PreviewError> {
    record(StakeKind::Unstake, state, body).await
}

async fn claim(state: State<Arc<StakingLedger>>, body: Bytes) -> Result<Json<Value>, PreviewError> {
    record(StakeKind::Claim, state, body).await
}

async fn record(kind: StakeKind, State(ledger): State<Arc<StakingLedger>>, body: Bytes) -> Result<Json<Value>, PreviewError> {
    let body: StakeBody = parse_body(&body)?;
    let (amount, wallet) = body.validate()?;
    let wallet = wallet.to_string();
    let signature = body.signature();
    let event = blocking(move || ledger.record(kind, amount, &wallet, signature)).await?;
    info!(kind = kind.as_str(), amount, wallet = %event.wallet, "preview stake event");
    Ok(Json(json!({ "ok": true })))
}
