//! API-key authentication, fixed-window rate limiting and usage counters for
//! the metered endpoints.
//!
//! Without `KEY_SECRET` the API runs in dev mode: every request is accepted
//! and attributed to the key hash `dev`. Without Upstash the limiter always
//! allows and no usage is recorded.

use axum::http::{HeaderMap, HeaderName, HeaderValue};
use axum::response::Response;
use noema_core::config::KeyConfig;
use noema_core::token::{self, ApiKeyClaims};
use serde::Serialize;
use time::OffsetDateTime;
use tracing::warn;

use crate::error::ApiError;
use crate::state::AppState;

/// Key hash used for every request in dev mode.
pub const DEV_KEY_HASH: &str = "dev";
/// Rate-limit buckets outlive their minute slightly.
const BUCKET_TTL_SECS: u64 = 65;

/// Who is calling.
#[derive(Debug, Clone)]
pub struct Caller {
    /// `None` in dev mode.
    pub claims: Option<ApiKeyClaims>,
    pub key_hash: String,
}

impl Caller {
    pub fn is_dev(&self) -> bool {
        self.claims.is_none()
    }
}

/// Token from `Authorization: Bearer <token>` or `x-api-key`.
pub fn presented_token(headers: &HeaderMap) -> Option<&str> {
    let bearer = headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim);
    let api_key = || {
        headers
            .get("x-api-key")
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
    };
    bearer.or_else(api_key).filter(|t| !t.is_empty())
}

pub fn authenticate(keys: &KeyConfig, headers: &HeaderMap, now: i64) -> Result<Caller, ApiError> {
    let Some(secret) = keys.secret.as_deref() else {
        return Ok(Caller {
            claims: None,
            key_hash: DEV_KEY_HASH.to_string(),
        });
    };
    let token = presented_token(headers).ok_or_else(|| {
        ApiError::Unauthorized("Missing Authorization: Bearer <token>".to_string())
    })?;
    let claims = token::verify(secret, token, now)?;
    Ok(Caller {
        claims: Some(claims),
        key_hash: token::key_hash(token),
    })
}

/// Outcome of one limiter check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimit {
    pub allowed: bool,
    pub limit: u64,
    pub remaining: u64,
    /// Seconds until the current window closes.
    pub reset: u64,
}

impl RateLimit {
    pub fn unlimited(limit: u64, now: i64) -> Self {
        Self {
            allowed: true,
            limit,
            remaining: limit,
            reset: window_reset(now),
        }
    }

    fn from_count(limit: u64, count: i64, now: i64) -> Self {
        let used = u64::try_from(count).unwrap_or(0);
        Self {
            allowed: used <= limit,
            limit,
            remaining: limit.saturating_sub(used),
            reset: window_reset(now),
        }
    }

    /// Attach the `X-RateLimit-*` headers.
    pub fn apply(&self, mut resp: Response) -> Response {
        let headers = resp.headers_mut();
        for (name, value) in [
            ("x-ratelimit-limit", self.limit),
            ("x-ratelimit-remaining", self.remaining),
            ("x-ratelimit-reset", self.reset),
        ] {
            headers.insert(HeaderName::from_static(name), HeaderValue::from(value));
        }
        resp
    }
}

fn window_reset(now: i64) -> u64 {
    (60 - now.rem_euclid(60)) as u64
}

pub fn rate_limit_key(key_hash: &str, now: i64) -> String {
    format!("rl:{key_hash}:{}", now.div_euclid(60))
}

pub async fn check_rate_limit(state: &AppState, caller: &Caller, now: i64) -> Result<RateLimit, ApiError> {
    let limit = state.config.rate_limit_rpm;
    let Some(upstash) = &state.upstash else {
        return Ok(RateLimit::unlimited(limit, now));
    };
    let count = upstash
        .incr_with_expiry(&rate_limit_key(&caller.key_hash, now), BUCKET_TTL_SECS)
        .await?;
    Ok(RateLimit::from_count(limit, count, now))
}

fn usage_keys(key_hash: &str, now: OffsetDateTime) -> [String; 2] {
    let date = now.date();
    [
        format!(
            "usage:day:{key_hash}:{:04}{:02}{:02}",
            date.year(),
            u8::from(date.month()),
            date.day()
        ),
        format!("usage:total:{key_hash}"),
    ]
}

/// Count `calls` against the caller. Failures are logged and dropped.
pub async fn track_usage(state: &AppState, caller: &Caller, calls: i64) {
    let Some(upstash) = &state.upstash else {
        return;
    };
    let keys = usage_keys(&caller.key_hash, OffsetDateTime::now_utc());
    if let Err(e) = upstash.incr_by(&keys, calls).await {
        warn!(key_hash = %caller.key_hash, "usage tracking failed: {e:#}");
    }
}

/// `mode` is `dev` without Upstash (counts are `null`) and `prod` with it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageSummary {
    pub mode: &'static str,
    pub today: Option<i64>,
    pub total: Option<i64>,
    pub unit_price: f64,
    pub today_cost: Option<f64>,
    pub total_cost: Option<f64>,
}

pub async fn usage_summary(state: &AppState, caller: &Caller) -> Result<UsageSummary, ApiError> {
    let unit_price = state.config.usage_price_per_call;
    let Some(upstash) = &state.upstash else {
        return Ok(UsageSummary {
            mode: "dev",
            today: None,
            total: None,
            unit_price,
            today_cost: None,
            total_cost: None,
        });
    };
    let keys = usage_keys(&caller.key_hash, OffsetDateTime::now_utc());
    let counts = upstash.get_counts(&keys).await?;
    let today = counts.first().copied().flatten().unwrap_or(0);
    let total = counts.get(1).copied().flatten().unwrap_or(0);
    Ok(UsageSummary {
        mode: "prod",
        today: Some(today),
        total: Some(total),
        unit_price,
        today_cost: Some(cost(today, unit_price)),
        total_cost: Some(cost(total, unit_price)),
    })
}

/// Calls times unit price, rounded to 6 decimals.
pub fn cost(calls: i64, unit_price: f64) -> f64 {
    (calls as f64 * unit_price * 1e6).round() / 1e6
}
