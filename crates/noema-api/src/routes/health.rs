use std::sync::Arc;

use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use axum::Json;
use noema_core::model::{iso8601, BuildInfo};
use serde::Serialize;
use time::OffsetDateTime;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct Health {
    pub status: &'static str,
    pub time: String,
    pub commit: String,
    pub branch: String,
    pub endpoints: Endpoints,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Endpoints {
    pub health: &'static str,
    pub build_info: &'static str,
    pub solana: &'static str,
    pub checkout: &'static str,
    pub solana_pay: &'static str,
    pub keys_new: &'static str,
    pub keys_verify: &'static str,
    pub stripe_webhook: &'static str,
    pub agents: &'static str,
    pub usage: &'static str,
}

const ENDPOINTS: Endpoints = Endpoints {
    health: "/api/health",
    build_info: "/api/build-info",
    solana: "/api/solana",
    checkout: "/api/checkout/session",
    solana_pay: "/api/crypto/solana-pay",
    keys_new: "/api/keys/new",
    keys_verify: "/api/keys/verify",
    stripe_webhook: "/api/webhooks/stripe",
    agents: "/api/agents",
    usage: "/api/usage/summary",
};

fn current_build(state: &AppState) -> BuildInfo {
    BuildInfo::from_parts(
        state.config.commit_sha.as_deref(),
        state.config.commit_ref.as_deref(),
        OffsetDateTime::now_utc(),
    )
}

pub async fn health(State(state): State<Arc<AppState>>) -> Json<Health> {
    let build = current_build(&state);
    Json(Health {
        status: "ok",
        time: iso8601(OffsetDateTime::now_utc()),
        commit: build.commit,
        branch: build.branch,
        endpoints: ENDPOINTS,
    })
}

pub async fn build_info(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    (
        [(header::CACHE_CONTROL, "no-cache, no-store, must-revalidate")],
        Json(current_build(&state)),
    )
}
