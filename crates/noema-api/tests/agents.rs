mod common;

use std::collections::HashMap;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use noema_core::token;
use noema_solana_client::{default_program_id, pdas_for_agent, Pubkey};
use serde_json::{json, Value};

use common::{
    app, fake_rpc, get, identity_bytes, identity_bytes_for, post_json, reputation_bytes, send, unix_now,
};

#[tokio::test]
async fn agent_lookup_decodes_identity_and_reputation() {
    let owner = Pubkey::new_unique();
    let pdas = pdas_for_agent(&default_program_id(), "bot-1").unwrap();
    let rpc = fake_rpc(HashMap::from([
        (pdas.identity.0.to_string(), identity_bytes(owner, "bot-1", "ipfs://meta")),
        (pdas.reputation.0.to_string(), reputation_bytes([8_800, 50, 47, 3])),
    ]))
    .await;

    let r = get(app(&[("UPSTREAM_SOLANA_RPC", rpc.as_str())]), "/api/agents/bot-1").await;
    assert_eq!(r.status, StatusCode::OK, "{}", r.body);
    assert_eq!(r.body["agentId"], "bot-1");
    assert_eq!(r.body["owner"], owner.to_string());
    assert_eq!(r.body["address"], pdas.identity.0.to_string());
    assert_eq!(r.body["isActive"], true);
    assert_eq!(
        r.body["reputation"],
        json!({ "score": 8_800, "totalTasks": 50, "successfulTasks": 47, "failedTasks": 3 })
    );
    assert_eq!(r.headers["x-ratelimit-limit"], "120");
}

#[tokio::test]
async fn missing_identity_is_404() {
    let rpc = fake_rpc(HashMap::new()).await;
    let r = get(app(&[("UPSTREAM_SOLANA_RPC", rpc.as_str())]), "/api/agents/ghost").await;
    assert_eq!(r.status, StatusCode::NOT_FOUND);
    assert_eq!(r.body["error"], "Agent not found");
}

#[tokio::test]
async fn oversized_agent_id_is_rejected_before_rpc() {
    let r = get(app(&[("UPSTREAM_SOLANA_RPC", "http://127.0.0.1:9")]), &format!("/api/agents/{}", "x".repeat(40))).await;
    assert_eq!(r.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn metered_endpoints_require_a_key_when_secret_is_set() {
    let vars = [("KEY_SECRET", "s3"), ("UPSTREAM_SOLANA_RPC", "http://127.0.0.1:9")];
    let r = get(app(&vars), "/api/usage/summary").await;
    assert_eq!(r.status, StatusCode::UNAUTHORIZED);

    let issued = token::issue("s3", "pro", "acme", 1, unix_now()).unwrap();
    let req = Request::get("/api/usage/summary")
        .header("x-api-key", issued.api_key)
        .body(Body::empty())
        .unwrap();
    let r = send(app(&vars), req).await;
    assert_eq!(r.status, StatusCode::OK);
}

#[tokio::test]
async fn usage_summary_without_upstash_is_dev_mode() {
    let r = get(app(&[]), "/api/usage/summary").await;
    assert_eq!(r.status, StatusCode::OK);
    assert_eq!(r.body["mode"], "dev");
    assert_eq!(r.body["today"], Value::Null);
    assert_eq!(r.body["total"], Value::Null);
    assert_eq!(r.body["unitPrice"], 0.001);
    assert_eq!(r.headers["x-ratelimit-remaining"], "120");
}

#[tokio::test]
async fn solana_proxy_passes_status_and_body_through() {
    let rpc = fake_rpc(HashMap::new()).await;
    let body = json!({ "jsonrpc": "2.0", "id": 7, "method": "getHealth" });
    let r = post_json(app(&[("UPSTREAM_SOLANA_RPC", rpc.as_str())]), "/api/solana", body).await;
    assert_eq!(r.status, StatusCode::OK);
    assert_eq!(r.body, json!({ "jsonrpc": "2.0", "id": 7, "result": "ok" }));
}

#[tokio::test]
async fn solana_proxy_transport_failure_is_500() {
    let r = post_json(
        app(&[("UPSTREAM_SOLANA_RPC", "http://127.0.0.1:9")]),
        "/api/solana",
        json!({ "jsonrpc": "2.0", "id": 1, "method": "getHealth" }),
    )
    .await;
    assert_eq!(r.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(r.body["error"].is_string());
}

#[tokio::test]
async fn agent_list_filters_by_discriminator_and_applies_limit() {
    let mut accounts = HashMap::new();
    for id in ["a-1", "a-2", "a-3"] {
        accounts.insert(Pubkey::new_unique().to_string(), identity_bytes(Pubkey::new_unique(), id, "ipfs://m"));
    }
    // Decodes fine but is another account type; only the memcmp filter drops it.
    accounts.insert(
        Pubkey::new_unique().to_string(),
        identity_bytes_for("ReputationAccount", Pubkey::new_unique(), "decoy", "ipfs://d"),
    );
    // Right discriminator, truncated body.
    let mut broken = identity_bytes(Pubkey::new_unique(), "broken", "ipfs://b");
    broken.truncate(20);
    accounts.insert(Pubkey::new_unique().to_string(), broken);
    let rpc = fake_rpc(accounts).await;
    let vars = [("UPSTREAM_SOLANA_RPC", rpc.as_str())];

    let r = get(app(&vars), "/api/agents").await;
    assert_eq!(r.status, StatusCode::OK, "{}", r.body);
    assert_eq!(r.body["count"], 3);
    let mut ids: Vec<_> = r.body["agents"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["agentId"].as_str().unwrap().to_string())
        .collect();
    ids.sort();
    assert_eq!(ids, ["a-1", "a-2", "a-3"]);
    assert!(r.body["agents"][0].get("reputation").is_none());

    let r = get(app(&vars), "/api/agents?limit=2").await;
    assert_eq!(r.body["count"], 2);
    assert_eq!(r.body["agents"].as_array().unwrap().len(), 2);
}
