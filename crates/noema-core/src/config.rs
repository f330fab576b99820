//! Configuration structures for noema-core.
//!
//! The core crate does not read environment variables. The API and CLI build
//! these structures from their own configuration sources and pass them in.

use crate::defaults;
use crate::errors::{NoemaError, NoemaResult};
use crate::plans::PriceTable;

/// Global configuration container.
#[derive(Debug, Clone, Default)]
pub struct CoreConfig {
    pub keys: KeyConfig,
    pub payment: PaymentConfig,
    pub prices: PriceTable,
}

/// API-key signing configuration.
#[derive(Debug, Clone)]
pub struct KeyConfig {
    /// HMAC secret. `None` means key issuance is disabled and authenticated
    /// endpoints run in dev mode.
    pub secret: Option<String>,
    pub ttl_hours: u64,
}

impl Default for KeyConfig {
    fn default() -> Self {
        Self {
            secret: None,
            ttl_hours: defaults::KEY_TTL_HOURS,
        }
    }
}

impl KeyConfig {
    pub fn secret(&self) -> NoemaResult<&str> {
        self.secret
            .as_deref()
            .ok_or_else(|| NoemaError::not_configured("KEY_SECRET"))
    }
}

/// Where Solana Pay subscription payments go.
#[derive(Debug, Clone)]
pub struct PaymentConfig {
    pub recipient: String,
    pub usdc_mint: String,
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            recipient: defaults::RECEIVING_SOLANA_ADDRESS.to_string(),
            usdc_mint: defaults::USDC_MINT_MAINNET.to_string(),
        }
    }
}

/// Validate a full configuration object.
pub fn validate_config(cfg: &CoreConfig) -> NoemaResult<()> {
    if cfg.keys.ttl_hours == 0 {
        return Err(NoemaError::invalid_argument(
            "key ttl must be greater than zero",
        ));
    }

    if matches!(cfg.keys.secret.as_deref(), Some("")) {
        return Err(NoemaError::invalid_argument("key secret must not be empty"));
    }

    if cfg.payment.recipient.trim().is_empty() {
        return Err(NoemaError::not_configured("RECEIVING_SOLANA_ADDRESS"));
    }

    Ok(())
}
