//! API configuration.
//!
//! Everything is read from environment variables once at startup. Empty
//! values count as unset. `from_lookup` takes any key lookup so tests can build
//! a config without touching the process environment.

use std::net::SocketAddr;

use anyhow::{Context, Result};
use noema_core::config::{validate_config, CoreConfig, KeyConfig, PaymentConfig};
use noema_core::defaults;
use noema_core::plans::PriceTable;
use noema_solana_client::{DEFAULT_PROGRAM_ID, DEFAULT_RPC_URL};

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_PUBLIC_BASE_URL: &str = "https://noemaprotocol.xyz";
pub const DEFAULT_STRIPE_API_BASE: &str = "https://api.stripe.com";
pub const DEFAULT_RATE_LIMIT_RPM: u64 = 120;
pub const DEFAULT_USAGE_PRICE_PER_CALL: f64 = 0.001;

#[derive(Debug, Clone)]
pub struct StripeConfig {
    pub secret_key: Option<String>,
    pub webhook_secret: Option<String>,
    pub api_base: String,
}

#[derive(Debug, Clone)]
pub struct UpstashConfig {
    pub url: String,
    pub token: String,
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub bind_addr: SocketAddr,
    pub log_json: bool,
    pub core: CoreConfig,
    pub stripe: StripeConfig,
    pub upstash: Option<UpstashConfig>,
    /// Origin used for checkout success/cancel redirects.
    pub public_base_url: String,
    pub solana_rpc: String,
    pub program_id: String,
    pub commit_sha: Option<String>,
    pub commit_ref: Option<String>,
    pub rate_limit_rpm: u64,
    pub usage_price_per_call: f64,
}

impl ApiConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let bind_addr = get("NOEMA_BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse()
            .context("NOEMA_BIND_ADDR is not a socket address")?;

        let ttl_hours = match get("KEY_TTL_HOURS") {
            Some(v) => v.parse().context("KEY_TTL_HOURS must be a whole number of hours")?,
            None => defaults::KEY_TTL_HOURS,
        };

        let core = CoreConfig {
            keys: KeyConfig {
                secret: get("KEY_SECRET"),
                ttl_hours,
            },
            payment: PaymentConfig {
                recipient: get("RECEIVING_SOLANA_ADDRESS")
                    .unwrap_or_else(|| defaults::RECEIVING_SOLANA_ADDRESS.to_string()),
                usdc_mint: get("USDC_MINT_MAINNET")
                    .unwrap_or_else(|| defaults::USDC_MINT_MAINNET.to_string()),
            },
            prices: PriceTable {
                starter: get("STRIPE_PRICE_STARTER"),
                pro: get("STRIPE_PRICE_PRO"),
                enterprise: get("STRIPE_PRICE_ENTERPRISE"),
            },
        };
        validate_config(&core).map_err(|e| anyhow::anyhow!(e.message()))?;

        let upstash = match (get("UPSTASH_REDIS_REST_URL"), get("UPSTASH_REDIS_REST_TOKEN")) {
            (Some(url), Some(token)) => Some(UpstashConfig {
                url: url.trim_end_matches('/').to_string(),
                token,
            }),
            _ => None,
        };

        let public_base_url = match (get("PUBLIC_BASE_URL"), get("VERCEL_URL")) {
            (Some(base), _) => base,
            (None, Some(host)) => format!("https://{host}"),
            (None, None) => DEFAULT_PUBLIC_BASE_URL.to_string(),
        };

        let rate_limit_rpm = match get("RATE_LIMIT_RPM") {
            Some(v) => v.parse().context("RATE_LIMIT_RPM must be a whole number")?,
            None => DEFAULT_RATE_LIMIT_RPM,
        };
        let usage_price_per_call = match get("USAGE_PRICE_PER_CALL") {
            Some(v) => v.parse().context("USAGE_PRICE_PER_CALL must be a number")?,
            None => DEFAULT_USAGE_PRICE_PER_CALL,
        };

        Ok(Self {
            bind_addr,
            log_json: get("NOEMA_LOG_FORMAT").is_some_and(|f| f.eq_ignore_ascii_case("json")),
            core,
            stripe: StripeConfig {
                secret_key: get("STRIPE_SECRET_KEY"),
                webhook_secret: get("STRIPE_WEBHOOK_SECRET"),
                api_base: get("STRIPE_API_BASE")
                    .unwrap_or_else(|| DEFAULT_STRIPE_API_BASE.to_string()),
            },
            upstash,
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
            solana_rpc: get("UPSTREAM_SOLANA_RPC").unwrap_or_else(|| DEFAULT_RPC_URL.to_string()),
            program_id: get("PROGRAM_ID").unwrap_or_else(|| DEFAULT_PROGRAM_ID.to_string()),
            commit_sha: get("VERCEL_GIT_COMMIT_SHA"),
            commit_ref: get("VERCEL_GIT_COMMIT_REF"),
            rate_limit_rpm,
            usage_price_per_call,
        })
    }
}
