//! Staking preview ledger (`staking.json`).

use std::fs;
use std::path::{Path, PathBuf};

use noema_core::model::{now_millis, StakeEvent, StakeKind, StakingDb};
use parking_lot::Mutex;
use tracing::debug;

use crate::fsio::{io_err, write_replace};
use crate::{StoreConfig, StoreError, StoreResult};

pub struct StakingLedger {
    path: PathBuf,
    lock: Mutex<()>,
}

impl StakingLedger {
    pub fn open(cfg: &StoreConfig) -> Self {
        Self {
            path: cfg.staking_path(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whole ledger. Creates an empty `{ "stakes": [] }` file on first use.
    pub fn load(&self) -> StoreResult<StakingDb> {
        let _guard = self.lock.lock();
        self.load_unlocked()
    }

    /// Append one event, preserving insertion order.
    pub fn append(&self, event: StakeEvent) -> StoreResult<()> {
        let _guard = self.lock.lock();
        let mut db = self.load_unlocked()?;
        debug!(kind = event.kind.as_str(), wallet = %event.wallet, "append stake event");
        db.stakes.push(event);
        self.write_unlocked(&db)
    }

    /// Build and append an event stamped with the current time. Only `stake`
    /// events keep the signature.
    pub fn record(&self, kind: StakeKind, amount: f64, wallet: &str, signature: Option<String>) -> StoreResult<StakeEvent> {
        let event = StakeEvent {
            kind,
            amount,
            wallet: wallet.to_string(),
            signature: if kind == StakeKind::Stake { signature } else { None },
            created_at: now_millis(),
        };
        self.append(event.clone())?;
        Ok(event)
    }

    fn load_unlocked(&self) -> StoreResult<StakingDb> {
        if !self.path.exists() {
            let db = StakingDb::default();
            self.write_unlocked(&db)?;
            return Ok(db);
        }
        let raw = fs::read(&self.path).map_err(io_err(&self.path))?;
        serde_json::from_slice(&raw).map_err(|source| StoreError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    fn write_unlocked(&self, db: &StakingDb) -> StoreResult<()> {
        let bytes = serde_json::to_vec_pretty(db)?;
        write_replace(&self.path, &bytes)
    }
}
