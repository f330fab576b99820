use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use serde::Serialize;
use serde_json::Value;

use crate::output;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthOut {
    pub ok: bool,
    pub url: String,
    pub status: u16,
    pub latency_ms: u128,
    pub body: Value,
}

pub fn health_url(base: &str) -> String {
    format!("{}/api/health", base.trim_end_matches('/'))
}

pub async fn run(base: &str, timeout_ms: u64) -> Result<()> {
    let url = health_url(base);
    let client = reqwest::Client::builder()
        .timeout(Duration::from_millis(timeout_ms))
        .build()?;

    let started = Instant::now();
    let resp = client
        .get(&url)
        .send()
        .await
        .with_context(|| format!("GET {url} (timeout {timeout_ms} ms)"))?;
    let status = resp.status();
    let body: Value = resp.json().await.unwrap_or(Value::Null);
    let latency_ms = started.elapsed().as_millis();

    let ok = status.is_success() && body["status"] == "ok";
    output::status(ok, &format!("{url} -> {status} in {latency_ms} ms"));
    output::print(&HealthOut {
        ok,
        url: url.clone(),
        status: status.as_u16(),
        latency_ms,
        body,
    })?;
    if !ok {
        bail!("health check failed: {url}");
    }
    Ok(())
}
