//! Minimal Upstash Redis REST client.
//!
//! Commands are sent through the pipeline endpoint: `POST <url>/pipeline`
//! with a JSON array of string arrays. The response holds one `{result}` or
//! `{error}` object per command, in order.

use anyhow::{anyhow, bail, Context, Result};
use serde::Deserialize;
use serde_json::Value;

use crate::config::UpstashConfig;

#[derive(Debug, Clone)]
pub struct UpstashClient {
    http: reqwest::Client,
    url: String,
    token: String,
}

#[derive(Debug, Deserialize)]
struct Reply {
    #[serde(default)]
    result: Value,
    #[serde(default)]
    error: Option<String>,
}

impl UpstashClient {
    pub fn new(http: reqwest::Client, cfg: &UpstashConfig) -> Self {
        Self {
            http,
            url: cfg.url.clone(),
            token: cfg.token.clone(),
        }
    }

    /// Run `commands` in one round trip. Any per-command error fails the call.
    pub async fn pipeline(&self, commands: &[Vec<String>]) -> Result<Vec<Value>> {
        let resp = self
            .http
            .post(format!("{}/pipeline", self.url))
            .bearer_auth(&self.token)
            .json(commands)
            .send()
            .await
            .context("upstash request")?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            bail!("upstash returned {status}: {body}");
        }

        let replies: Vec<Reply> = resp.json().await.context("decode upstash reply")?;
        if replies.len() != commands.len() {
            bail!(
                "upstash returned {} replies for {} commands",
                replies.len(),
                commands.len()
            );
        }
        replies
            .into_iter()
            .zip(commands)
            .map(|(reply, cmd)| match reply.error {
                Some(e) => Err(anyhow!("upstash {}: {e}", cmd.first().map_or("?", String::as_str))),
                None => Ok(reply.result),
            })
            .collect()
    }

    /// `INCR key` then `EXPIRE key ttl`; returns the incremented value.
    pub async fn incr_with_expiry(&self, key: &str, ttl_secs: u64) -> Result<i64> {
        let out = self
            .pipeline(&[
                cmd(["INCR", key]),
                cmd(["EXPIRE", key, &ttl_secs.to_string()]),
            ])
            .await?;
        out.first()
            .and_then(as_i64)
            .ok_or_else(|| anyhow!("INCR {key} returned a non-integer"))
    }

    pub async fn incr_by(&self, keys: &[String], by: i64) -> Result<()> {
        let by = by.to_string();
        let commands: Vec<_> = keys.iter().map(|k| cmd(["INCRBY", k, &by])).collect();
        self.pipeline(&commands).await.map(|_| ())
    }

    /// `GET` each key; missing keys read as `None`.
    pub async fn get_counts(&self, keys: &[String]) -> Result<Vec<Option<i64>>> {
        let commands: Vec<_> = keys.iter().map(|k| cmd(["GET", k])).collect();
        let out = self.pipeline(&commands).await?;
        Ok(out.iter().map(as_i64).collect())
    }

    pub async fn hset(&self, key: &str, fields: &[(&str, String)]) -> Result<()> {
        let mut command = vec!["HSET".to_string(), key.to_string()];
        for (field, value) in fields {
            command.push(field.to_string());
            command.push(value.clone());
        }
        self.pipeline(&[command]).await.map(|_| ())
    }
}

fn cmd<const N: usize>(parts: [&str; N]) -> Vec<String> {
    parts.iter().map(|s| s.to_string()).collect()
}

/// Redis integers arrive as JSON numbers, `GET` values as strings.
fn as_i64(v: &Value) -> Option<i64> {
    match v {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}
