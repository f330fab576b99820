//! noema-core
//!
//! Core primitives for the Noema service suite:
//! - signed API keys (HS256 compact tokens) and key hashing
//! - subscription plans and price lookup
//! - Solana Pay transfer request URIs
//! - Stripe webhook signature verification
//! - preview ledger and build-info models
//!
//! Nothing in this crate performs network or filesystem I/O, and nothing reads
//! environment variables. Callers pass configuration and the current time in.

pub mod config;
pub mod errors;
pub mod model;
pub mod plans;
pub mod solana_pay;
pub mod token;
pub mod webhook;

pub use crate::errors::{NoemaError, NoemaResult};

/// Defaults shared by the API, CLI and preview services.
pub mod defaults {
    /// Plan recorded in a key when the caller does not name one.
    pub const KEY_PLAN: &str = "rest-api";
    /// Organisation recorded in a key when the caller does not name one.
    pub const KEY_ORG: &str = "default";
    /// Key lifetime when `KEY_TTL_HOURS` is unset (one year).
    pub const KEY_TTL_HOURS: u64 = 24 * 365;
    /// Treasury wallet receiving subscription payments.
    pub const RECEIVING_SOLANA_ADDRESS: &str = "3oxg7wVtdp9T3sx773SMmws8zrGyAJecqTruaXfiw3mN";
    /// USDC mint on Solana mainnet.
    pub const USDC_MINT_MAINNET: &str = "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v";
    /// Maximum number of preview mint records kept on disk.
    pub const MAX_MINT_RECORDS: usize = 500;
}

/// Convenience re-exports.
pub mod prelude {
    pub use crate::config::{CoreConfig, KeyConfig, PaymentConfig};
    pub use crate::model::{BuildInfo, MintRecord, StakeEvent, StakeKind, StakingDb};
    pub use crate::plans::{Plan, PriceTable};
    pub use crate::solana_pay::{build_transfer_url, SolanaPayRequest};
    pub use crate::token::{issue, key_hash, verify, ApiKeyClaims, IssuedKey};
    pub use crate::webhook::{construct_event, WebhookEvent, WebhookEventKind};
    pub use crate::{NoemaError, NoemaResult};
}
