use std::time::Duration;

use anyhow::{Context, Result};
use noema_solana_client::{AgentRegistryClient, Pubkey};

use crate::config::ApiConfig;
use crate::stripe::StripeClient;
use crate::upstash::UpstashClient;

/// Outbound HTTP timeout. Vercel functions were cut off at the platform
/// limit; a long-running process needs its own.
const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Shared, read-only state handed to every handler.
#[derive(Debug)]
pub struct AppState {
    pub config: ApiConfig,
    pub http: reqwest::Client,
    pub registry: AgentRegistryClient,
    pub stripe: Option<StripeClient>,
    pub upstash: Option<UpstashClient>,
}

impl AppState {
    pub fn new(config: ApiConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .context("build http client")?;

        let program_id: Pubkey = config
            .program_id
            .parse()
            .with_context(|| format!("PROGRAM_ID {:?} is not a valid pubkey", config.program_id))?;
        let registry = AgentRegistryClient::new(program_id, &config.solana_rpc);

        let stripe = config
            .stripe
            .secret_key
            .as_deref()
            .map(|key| StripeClient::new(http.clone(), key, &config.stripe.api_base));
        let upstash = config
            .upstash
            .as_ref()
            .map(|cfg| UpstashClient::new(http.clone(), cfg));

        Ok(Self {
            config,
            http,
            registry,
            stripe,
            upstash,
        })
    }
}
