//! noema-solana-client
//!
//! A small, focused Rust client for reading the Noema agent registry
//! (SPL-8004 identity and reputation accounts).
//!
//! It includes:
//! - PDA derivation helpers
//! - constant seeds and the default program id
//! - decoders for raw identity and reputation account bytes
//! - an async registry client that fetches and decodes accounts over RPC
//!
//! The on-chain program is owned elsewhere. This crate only reads; it never
//! builds or signs transactions.

pub mod constants;
pub mod decode;
pub mod pda;
pub mod registry_client;

pub use constants::*;
pub use decode::*;
pub use pda::*;
pub use registry_client::*;

pub use solana_program::pubkey::Pubkey;
