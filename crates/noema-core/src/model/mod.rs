//! Noema data models.
//!
//! These are the on-disk schemas of the preview ledgers (`staking.json`,
//! `mints.json`) and the build metadata served by the API. The file formats
//! carry no version field; fields are camelCase to match the files already
//! written by the preview services.
//!
//! Models are mostly "dumb" data. The store crate owns persistence, the API
//! owns validation of request bodies.

use std::collections::HashSet;

use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

/// Kind of preview staking event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StakeKind {
    Stake,
    Unstake,
    Claim,
}

impl StakeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Stake => "stake",
            Self::Unstake => "unstake",
            Self::Claim => "claim",
        }
    }
}

/// One entry of the staking log.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StakeEvent {
    #[serde(rename = "type")]
    pub kind: StakeKind,
    pub amount: f64,
    pub wallet: String,
    /// Only stake events carry the wallet's transaction signature.
    #[serde(default)]
    pub signature: Option<String>,
    /// Milliseconds since the unix epoch.
    pub created_at: i64,
}

/// Stake events always write `signature` (`null` when absent); unstake and
/// claim events never write it.
impl Serialize for StakeEvent {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let with_signature = self.kind == StakeKind::Stake;
        let mut st = serializer.serialize_struct("StakeEvent", if with_signature { 5 } else { 4 })?;
        st.serialize_field("type", &self.kind)?;
        st.serialize_field("amount", &self.amount)?;
        st.serialize_field("wallet", &self.wallet)?;
        if with_signature {
            st.serialize_field("signature", &self.signature)?;
        } else {
            st.skip_field("signature")?;
        }
        st.serialize_field("createdAt", &self.created_at)?;
        st.end()
    }
}

/// Root object of `staking.json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StakingDb {
    #[serde(default)]
    pub stakes: Vec<StakeEvent>,
}

/// A demo x404 NFT mint record. Nothing is minted on chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MintRecord {
    pub agent_id: String,
    pub nft_mint: String,
    pub tx_signature: String,
    pub program_id: String,
    pub preview_mode: bool,
    /// Milliseconds since the unix epoch.
    pub created_at: i64,
}

/// Drop records whose signature or mint already appeared earlier in the list.
///
/// The dashboard merges records from several sources and relies on this to
/// show each mint once. The first occurrence wins.
pub fn dedupe_mints(records: Vec<MintRecord>) -> Vec<MintRecord> {
    let mut seen = HashSet::new();
    records
        .into_iter()
        .filter(|r| {
            let fresh_sig = !seen.contains(&r.tx_signature);
            let fresh_mint = !seen.contains(&r.nft_mint);
            seen.insert(r.tx_signature.clone());
            seen.insert(r.nft_mint.clone());
            fresh_sig && fresh_mint
        })
        .collect()
}

/// Build metadata served by `/api/build-info` and written by `noema build-info`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildInfo {
    pub commit: String,
    pub branch: String,
    pub built_at: String,
}

impl BuildInfo {
    /// Commit is shortened to 9 characters and falls back to `local`; branch
    /// falls back to `unknown`.
    pub fn from_parts(commit_sha: Option<&str>, commit_ref: Option<&str>, now: OffsetDateTime) -> Self {
        Self {
            commit: short_commit(commit_sha),
            branch: commit_ref
                .filter(|s| !s.is_empty())
                .unwrap_or("unknown")
                .to_string(),
            built_at: iso8601(now),
        }
    }
}

pub fn short_commit(sha: Option<&str>) -> String {
    match sha.map(str::trim).filter(|s| !s.is_empty()) {
        Some(s) => s.chars().take(9).collect(),
        None => "local".to_string(),
    }
}

/// RFC 3339 timestamp; falls back to the unix epoch if formatting fails.
pub fn iso8601(t: OffsetDateTime) -> String {
    t.format(&Rfc3339)
        .unwrap_or_else(|_| "1970-01-01T00:00:00Z".to_string())
}

/// Current time in milliseconds since the unix epoch.
pub fn now_millis() -> i64 {
    (OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as i64
}
