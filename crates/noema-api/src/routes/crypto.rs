use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::Json;
use noema_core::solana_pay::{build_transfer_url, SolanaPayRequest};
use serde_json::{json, Value};
use tracing::info;

use crate::error::ApiError;
use crate::routes::parse_body;
use crate::state::AppState;

/// USDC transfer request to the treasury wallet.
pub async fn solana_pay(State(state): State<Arc<AppState>>, body: Bytes) -> Result<Json<Value>, ApiError> {
    let req: SolanaPayRequest = parse_body(&body)?;
    let payment = &state.config.core.payment;
    let url = build_transfer_url(&payment.recipient, &payment.usdc_mint, &req)?;
    info!(
        recipient = %payment.recipient,
        amount = %req.amount,
        memo = %req.memo,
        "treasury payment request"
    );
    Ok(Json(json!({ "url": url })))
}
