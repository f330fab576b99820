//! noema-api
//!
//! HTTP surface of the Noema service suite, served as one axum application:
//! health and build metadata, a Solana JSON-RPC passthrough, Stripe checkout
//! and webhooks, Solana Pay links, API-key issuance/verification and the
//! authenticated agent registry read path.
//!
//! Handlers are independent. Shared state is configuration plus the outbound
//! clients built once at startup.

pub mod auth;
pub mod config;
pub mod error;
pub mod routes;
pub mod state;
pub mod stripe;
pub mod telemetry;
pub mod upstash;

pub use crate::config::ApiConfig;
pub use crate::error::ApiError;
pub use crate::routes::router;
pub use crate::state::AppState;
