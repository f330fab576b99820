#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::extract::State;
use axum::http::{HeaderMap, Request, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use noema_solana_client::{account_discriminator, default_program_id, Pubkey, IDENTITY_ACCOUNT_NAME};
use serde_json::{json, Value};
use tower::ServiceExt;

use noema_api::{ApiConfig, AppState};

/// Router over a config built from `vars` only; the process env is ignored.
pub fn app(vars: &[(&str, &str)]) -> Router {
    let map: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    let cfg = ApiConfig::from_lookup(|k| map.get(k).cloned()).expect("config");
    noema_api::router(Arc::new(AppState::new(cfg).expect("state")))
}

pub struct Reply {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

pub async fn send(app: Router, req: Request<Body>) -> Reply {
    let resp = app.oneshot(req).await.expect("infallible");
    let status = resp.status();
    let headers = resp.headers().clone();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("body");
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    Reply { status, headers, body }
}

pub async fn get(app: Router, uri: &str) -> Reply {
    send(app, Request::get(uri).body(Body::empty()).unwrap()).await
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Reply {
    let req = Request::post(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, req).await
}

/// Serve `router` on an ephemeral local port and return its base URL.
pub async fn spawn_upstream(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    format!("http://{addr}")
}

pub fn unix_now() -> i64 {
    time::OffsetDateTime::now_utc().unix_timestamp()
}

type Accounts = Arc<HashMap<String, Vec<u8>>>;

fn ui_account(data: &[u8]) -> Value {
    json!({
        "lamports": 1_000_000,
        "data": [STANDARD.encode(data), "base64"],
        "owner": default_program_id().to_string(),
        "executable": false,
        "rentEpoch": 0,
        "space": data.len(),
    })
}

/// Whether `data` passes every `memcmp` filter of a `getProgramAccounts` call.
fn memcmp_matches(filters: &Value, data: &[u8]) -> bool {
    let Some(filters) = filters.as_array() else {
        return true;
    };
    filters.iter().filter_map(|f| f.get("memcmp")).all(|m| {
        let offset = m["offset"].as_u64().unwrap_or(0) as usize;
        let raw = m["bytes"].as_str().unwrap_or_default();
        let bytes = match m["encoding"].as_str() {
            Some("base64") => STANDARD.decode(raw).unwrap_or_default(),
            _ => bs58::decode(raw).into_vec().unwrap_or_default(),
        };
        data.get(offset..offset + bytes.len()) == Some(bytes.as_slice())
    })
}

/// JSON-RPC stand-in serving `getAccountInfo` and `getProgramAccounts` from a
/// fixed account map.
pub async fn fake_rpc(accounts: HashMap<String, Vec<u8>>) -> String {
    async fn rpc(State(accounts): State<Accounts>, Json(req): Json<Value>) -> Json<Value> {
        let id = req["id"].clone();
        let result = match req["method"].as_str() {
            Some("getAccountInfo") => {
                let address = req["params"][0].as_str().unwrap_or_default();
                let value = accounts.get(address).map(|data| ui_account(data));
                json!({ "context": { "slot": 1 }, "value": value })
            }
            Some("getProgramAccounts") => {
                let filters = &req["params"][1]["filters"];
                let keyed: Vec<Value> = accounts
                    .iter()
                    .filter(|(_, data)| memcmp_matches(filters, data))
                    .map(|(address, data)| json!({ "pubkey": address, "account": ui_account(data) }))
                    .collect();
                Value::Array(keyed)
            }
            Some("getVersion") => json!({ "solana-core": "2.1.0", "feature-set": 1 }),
            Some("getHealth") => json!("ok"),
            _ => json!(null),
        };
        Json(json!({ "jsonrpc": "2.0", "id": id, "result": result }))
    }
    let router = Router::new().route("/", post(rpc)).with_state(Arc::new(accounts));
    spawn_upstream(router).await
}

/// Identity account bytes; `account` picks the discriminator.
pub fn identity_bytes_for(account: &str, owner: Pubkey, agent_id: &str, uri: &str) -> Vec<u8> {
    let mut buf = account_discriminator(account).to_vec();
    buf.extend_from_slice(owner.as_ref());
    for s in [agent_id, uri] {
        buf.extend_from_slice(&(s.len() as u32).to_le_bytes());
        buf.extend_from_slice(s.as_bytes());
    }
    buf.extend_from_slice(&1_700_000_000i64.to_le_bytes());
    buf.extend_from_slice(&1_700_000_500i64.to_le_bytes());
    buf.push(1);
    buf
}

pub fn identity_bytes(owner: Pubkey, agent_id: &str, uri: &str) -> Vec<u8> {
    identity_bytes_for(IDENTITY_ACCOUNT_NAME, owner, agent_id, uri)
}

pub fn reputation_bytes(counters: [u64; 4]) -> Vec<u8> {
    let mut buf = vec![0u8; 40];
    for c in counters {
        buf.extend_from_slice(&c.to_le_bytes());
    }
    buf
}

pub const UPSTASH_TOKEN: &str = "upstash-test-token";

/// In-memory Redis behind the Upstash `/pipeline` endpoint.
#[derive(Debug, Default)]
pub struct FakeRedis {
    pub data: HashMap<String, String>,
    pub commands: Vec<Vec<String>>,
}

impl FakeRedis {
    fn apply(&mut self, cmd: &[String]) -> Value {
        let arg = |i: usize| cmd.get(i).cloned().unwrap_or_default();
        match cmd.first().map(String::as_str) {
            Some("INCR") | Some("INCRBY") => {
                let by: i64 = if cmd.len() > 2 { arg(2).parse().unwrap_or(0) } else { 1 };
                let next = self.data.get(&arg(1)).and_then(|v| v.parse::<i64>().ok()).unwrap_or(0) + by;
                self.data.insert(arg(1), next.to_string());
                json!(next)
            }
            Some("GET") => self.data.get(&arg(1)).map_or(Value::Null, |v| json!(v)),
            Some("EXPIRE") => json!(1),
            Some("HSET") => {
                let pairs = cmd[2..].chunks(2);
                let n = pairs.len();
                for pair in pairs {
                    if let [field, value] = pair {
                        self.data.insert(format!("{}.{field}", arg(1)), value.clone());
                    }
                }
                json!(n)
            }
            _ => Value::Null,
        }
    }

    /// Commands received, filtered by verb.
    pub fn sent(&self, verb: &str) -> Vec<Vec<String>> {
        self.commands.iter().filter(|c| c[0] == verb).cloned().collect()
    }
}

pub type Redis = Arc<Mutex<FakeRedis>>;

/// Serve `redis` as an Upstash REST endpoint; requests without the test
/// token get a 401.
pub async fn fake_upstash(redis: Redis) -> String {
    async fn pipeline(
        State(redis): State<Redis>,
        headers: HeaderMap,
        Json(commands): Json<Vec<Vec<String>>>,
    ) -> Result<Json<Value>, StatusCode> {
        let expected = format!("Bearer {UPSTASH_TOKEN}");
        if headers.get("authorization").and_then(|v| v.to_str().ok()) != Some(expected.as_str()) {
            return Err(StatusCode::UNAUTHORIZED);
        }
        let mut redis = redis.lock().unwrap();
        let replies: Vec<Value> = commands
            .into_iter()
            .map(|cmd| {
                let result = redis.apply(&cmd);
                redis.commands.push(cmd);
                json!({ "result": result })
            })
            .collect();
        Ok(Json(Value::Array(replies)))
    }
    let router = Router::new().route("/pipeline", post(pipeline)).with_state(redis);
    spawn_upstream(router).await
}

/// `usage:day:<hash>:<yyyymmdd>` for the current UTC day.
pub fn today_usage_key(key_hash: &str) -> String {
    let date = time::OffsetDateTime::now_utc().date();
    format!(
        "usage:day:{key_hash}:{:04}{:02}{:02}",
        date.year(),
        u8::from(date.month()),
        date.day()
    )
}
