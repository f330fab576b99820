//! Demo x404 mint ledger (`mints.json`).
//!
//! Records are fabricated: the mint address and signature are random strings
//! and nothing touches the chain.

use std::fs;
use std::path::{Path, PathBuf};

use noema_core::model::{now_millis, MintRecord};
use parking_lot::Mutex;
use rand::Rng;
use tracing::warn;

use crate::fsio::write_replace;
use crate::{StoreConfig, StoreResult};

const ID_ALPHABET: &[u8] = b"useandom-26T198340PX75pxJACKVERYMINDBUSHWOLF_GQZbfghjklqvwyzrict";

pub struct MintLedger {
    path: PathBuf,
    max_records: usize,
    lock: Mutex<()>,
}

impl MintLedger {
    pub fn open(cfg: &StoreConfig) -> Self {
        Self {
            path: cfg.mints_path(),
            max_records: cfg.max_mints,
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All records, newest first. Missing or unreadable files read as empty.
    pub fn load(&self) -> Vec<MintRecord> {
        let _guard = self.lock.lock();
        self.load_unlocked()
    }

    /// Fabricate a mint for `agent_id` and prepend it to the log.
    pub fn record(&self, agent_id: &str, program_id: &str) -> StoreResult<MintRecord> {
        let record = MintRecord {
            agent_id: agent_id.to_string(),
            nft_mint: format!("NF{}", random_id(40)),
            tx_signature: format!("demo_{}", random_id(64)),
            program_id: program_id.to_string(),
            preview_mode: true,
            created_at: now_millis(),
        };

        let _guard = self.lock.lock();
        let mut list = self.load_unlocked();
        list.insert(0, record.clone());
        list.truncate(self.max_records);
        write_replace(&self.path, &serde_json::to_vec(&list)?)?;
        Ok(record)
    }

    fn load_unlocked(&self) -> Vec<MintRecord> {
        let Ok(raw) = fs::read(&self.path) else {
            return Vec::new();
        };
        serde_json::from_slice(&raw).unwrap_or_else(|e| {
            warn!(path = %self.path.display(), "unreadable mint ledger, starting empty: {e}");
            Vec::new()
        })
    }
}

/// URL-safe random id of `len` characters.
fn random_id(len: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..len)
        .map(|_| ID_ALPHABET[rng.gen_range(0..ID_ALPHABET.len())] as char)
        .collect()
}
