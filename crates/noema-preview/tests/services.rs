use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use noema_preview::{staking_router, x404_router};
use noema_store::{MintLedger, StakingLedger, StoreConfig};
use serde_json::{json, Value};
use tower::ServiceExt;

async fn call(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let req = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(body.map_or_else(Body::empty, |b| Body::from(b.to_string())))
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

fn staking(dir: &tempfile::TempDir) -> Router {
    staking_router(Arc::new(StakingLedger::open(&StoreConfig::local_dev(dir.path()))))
}

fn x404(dir: &tempfile::TempDir) -> Router {
    x404_router(Arc::new(MintLedger::open(&StoreConfig::local_dev(dir.path()))), "preview")
}

#[tokio::test]
async fn staked_record_is_listed() {
    let dir = tempfile::tempdir().unwrap();
    let app = staking(&dir);

    let (status, body) = call(
        &app,
        "POST",
        "/stake",
        Some(json!({ "amount": 10, "wallet": "W1", "signature": "sig1" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "ok": true }));

    let (status, body) = call(&app, "GET", "/stakes", None).await;
    assert_eq!(status, StatusCode::OK);
    let stakes = body["stakes"].as_array().unwrap();
    assert_eq!(stakes.len(), 1);
    assert_eq!(stakes[0]["type"], "stake");
    assert_eq!(stakes[0]["amount"], 10.0);
    assert_eq!(stakes[0]["wallet"], "W1");
    assert_eq!(stakes[0]["signature"], "sig1");
    assert!(stakes[0]["createdAt"].as_i64().unwrap() > 0);
}

#[tokio::test]
async fn unstake_and_claim_keep_order_and_drop_signature() {
    let dir = tempfile::tempdir().unwrap();
    let app = staking(&dir);
    for path in ["/stake", "/unstake", "/claim"] {
        let (status, _) = call(
            &app,
            "POST",
            path,
            Some(json!({ "amount": "1.5", "wallet": "W2", "signature": "s" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "{path}");
    }

    let (_, body) = call(&app, "GET", "/stakes", None).await;
    let kinds: Vec<_> = body["stakes"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["type"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(kinds, ["stake", "unstake", "claim"]);
    assert!(body["stakes"][1].get("signature").is_none());

    let on_disk: Value =
        serde_json::from_str(&std::fs::read_to_string(dir.path().join("staking.json")).unwrap()).unwrap();
    assert_eq!(on_disk["stakes"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn stake_without_amount_or_wallet_is_400() {
    let dir = tempfile::tempdir().unwrap();
    let app = staking(&dir);
    for body in [json!({ "wallet": "W1" }), json!({ "amount": 5 }), json!({ "amount": 0, "wallet": "W1" })] {
        let (status, reply) = call(&app, "POST", "/stake", Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(reply["error"], "amount and wallet required");
    }
    let (_, body) = call(&app, "GET", "/stakes", None).await;
    assert_eq!(body, json!({ "stakes": [] }));
}

#[tokio::test]
async fn health_answers_ok() {
    let dir = tempfile::tempdir().unwrap();
    let (status, body) = call(&staking(&dir), "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "ok": true }));
    let (_, body) = call(&x404(&dir), "GET", "/health", None).await;
    assert_eq!(body["ok"], true);
}

#[tokio::test]
async fn mint_returns_record_and_lists_newest_first() {
    let dir = tempfile::tempdir().unwrap();
    let app = x404(&dir);

    let (status, first) = call(&app, "POST", "/mint", Some(json!({ "agentId": "bot-1" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["success"], true);
    assert_eq!(first["agentId"], "bot-1");
    assert_eq!(first["programId"], "preview");
    assert_eq!(first["previewMode"], true);
    assert!(first["nftMint"].as_str().unwrap().starts_with("NF"));
    assert!(first["txSignature"].as_str().unwrap().starts_with("demo_"));

    call(&app, "POST", "/mint", Some(json!({ "agentId": "bot-2" }))).await;

    let (_, body) = call(&app, "GET", "/mints", None).await;
    let items = body["items"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["agentId"], "bot-2");
    assert_eq!(items[1]["nftMint"], first["nftMint"]);
}

#[tokio::test]
async fn mint_requires_agent_id_string() {
    let dir = tempfile::tempdir().unwrap();
    let app = x404(&dir);
    for body in [json!({}), json!({ "agentId": 7 }), json!({ "agentId": "" })] {
        let (status, reply) = call(&app, "POST", "/mint", Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(reply["error"], "agentId is required");
    }
}

#[tokio::test]
async fn empty_data_dir_lists_no_mints() {
    let dir = tempfile::tempdir().unwrap();
    let (status, body) = call(&x404(&dir), "GET", "/mints", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "items": [] }));
}

/// Sends `body` verbatim, with an optional content type.
async fn call_raw(app: &Router, uri: &str, content_type: Option<&str>, body: &str) -> (StatusCode, Value) {
    let mut req = Request::builder().method("POST").uri(uri);
    if let Some(ct) = content_type {
        req = req.header("content-type", ct);
    }
    let resp = app.clone().oneshot(req.body(Body::from(body.to_string())).unwrap()).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).expect("error bodies are JSON");
    (status, body)
}

#[tokio::test]
async fn wrong_typed_fields_are_400_with_json_error() {
    let dir = tempfile::tempdir().unwrap();
    let app = staking(&dir);
    for body in [
        r#"{"amount":10,"wallet":123}"#,
        r#"{"amount":[1],"wallet":"W1"}"#,
        r#"[1,2,3]"#,
        r#""W1""#,
    ] {
        let (status, reply) = call_raw(&app, "/stake", Some("application/json"), body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
        assert_eq!(reply["error"], "amount and wallet required");
    }

    let (status, reply) = call_raw(&x404(&dir), "/mint", Some("application/json"), r#"{"agentId":{"x":1}}"#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(reply["error"], "agentId is required");
}

#[tokio::test]
async fn content_type_is_not_required() {
    let dir = tempfile::tempdir().unwrap();
    let app = staking(&dir);

    let (status, reply) = call_raw(&app, "/stake", None, "").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(reply["error"], "amount and wallet required");

    let (status, _) = call_raw(&app, "/stake", Some("text/plain"), r#"{"amount":3,"wallet":"W9"}"#).await;
    assert_eq!(status, StatusCode::OK);

    let (status, reply) = call_raw(&x404(&dir), "/mint", None, "").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(reply["error"], "agentId is required");
}

#[tokio::test]
async fn unparsable_body_is_400_with_json_error() {
    let dir = tempfile::tempdir().unwrap();
    let (status, reply) = call_raw(&staking(&dir), "/claim", Some("application/json"), "{amount:").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(reply["error"], "Invalid JSON body");
}

#[tokio::test]
async fn stake_without_signature_stores_null() {
    let dir = tempfile::tempdir().unwrap();
    let app = staking(&dir);
    call(&app, "POST", "/stake", Some(json!({ "amount": 2, "wallet": "W3" }))).await;

    let on_disk: Value =
        serde_json::from_str(&std::fs::read_to_string(dir.path().join("staking.json")).unwrap()).unwrap();
    assert_eq!(on_disk["stakes"][0].get("signature"), Some(&Value::Null));
}
