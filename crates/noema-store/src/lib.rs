//! noema-store
//!
//! File-backed ledgers behind the preview services:
//! - `staking.json`: `{ "stakes": [...] }`, an insertion-ordered event log
//! - `mints.json`: a JSON array of demo mint records, newest first, capped
//!
//! Each write rewrites the whole file through a temp file and a rename. An
//! in-process mutex serialises read-modify-write; separate processes sharing a
//! data directory can still lose updates. This is a preview surface, not
//! bookkeeping.

use std::path::{Path, PathBuf};

pub mod mints;
pub mod staking;

mod fsio;

pub use mints::MintLedger;
pub use staking::StakingLedger;

pub const STAKING_FILE: &str = "staking.json";
pub const MINTS_FILE: &str = "mints.json";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("corrupt ledger {path}: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("serialize ledger: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Where the ledgers live and how large the mint log may grow.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub root: PathBuf,
    pub max_mints: usize,
}

impl StoreConfig {
    /// Config rooted at `root` with default limits.
    pub fn local_dev(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            max_mints: noema_core::defaults::MAX_MINT_RECORDS,
        }
    }

    pub fn staking_path(&self) -> PathBuf {
        self.root.join(STAKING_FILE)
    }

    pub fn mints_path(&self) -> PathBuf {
        self.root.join(MINTS_FILE)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}
