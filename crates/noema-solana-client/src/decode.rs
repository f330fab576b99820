//! Decoders for raw registry account bytes.
//!
//! Layouts (little-endian):
//!
//! ```text
//! identity:   disc[8] | owner[32] | u32 len, agent_id | u32 len, metadata_uri
//!             | created_at i64 | updated_at i64 | is_active u8
//! reputation: ...[40] | score u64 | total u64 | successful u64 | failed u64
//! ```
//!
//! Neither decoder checks a discriminator or version: a layout change on chain
//! produces wrong numbers, not an error. Only truncated buffers are rejected.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use solana_program::pubkey::Pubkey;
use thiserror::Error;

const DISCRIMINATOR_LEN: usize = 8;

const REPUTATION_SCORE_OFFSET: usize = 40;
const REPUTATION_TOTAL_OFFSET: usize = 48;
const REPUTATION_SUCCESS_OFFSET: usize = 56;
const REPUTATION_FAILED_OFFSET: usize = 64;

/// Minimum length of a reputation account.
pub const REPUTATION_MIN_LEN: usize = REPUTATION_FAILED_OFFSET + 8;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("account data too short: need {need} bytes at offset {offset}, have {len}")]
    TooShort { offset: usize, need: usize, len: usize },
    #[error("invalid utf-8 in {0}")]
    InvalidUtf8(&'static str),
}

/// Anchor account discriminator: `sha256("account:<name>")[..8]`.
pub fn account_discriminator(name: &str) -> [u8; 8] {
    let mut h = Sha256::new();
    h.update(b"account:");
    h.update(name.as_bytes());
    let digest = h.finalize();
    let mut out = [0u8; 8];
    out.copy_from_slice(&digest[..8]);
    out
}

/// Reputation counters of an agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reputation {
    pub score: u64,
    pub total_tasks: u64,
    pub successful_tasks: u64,
    pub failed_tasks: u64,
}

impl Reputation {
    pub fn decode(data: &[u8]) -> Result<Self, DecodeError> {
        let read = |offset: usize| Reader::at(data, offset).u64();
        Ok(Self {
            score: read(REPUTATION_SCORE_OFFSET)?,
            total_tasks: read(REPUTATION_TOTAL_OFFSET)?,
            successful_tasks: read(REPUTATION_SUCCESS_OFFSET)?,
            failed_tasks: read(REPUTATION_FAILED_OFFSET)?,
        })
    }
}

/// Decoded identity account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentIdentity {
    pub owner: Pubkey,
    pub agent_id: String,
    pub metadata_uri: String,
    pub created_at: i64,
    pub updated_at: i64,
    pub is_active: bool,
}

impl AgentIdentity {
    pub fn decode(data: &[u8]) -> Result<Self, DecodeError> {
        let mut r = Reader::at(data, DISCRIMINATOR_LEN);
        let owner = Pubkey::new_from_array(r.array::<32>()?);
        let agent_id = r.string("agent_id")?;
        let metadata_uri = r.string("metadata_uri")?;
        let created_at = r.i64()?;
        let updated_at = r.i64()?;
        let is_active = r.u8()? == 1;
        Ok(Self {
            owner,
            agent_id,
            metadata_uri,
            created_at,
            updated_at,
            is_active,
        })
    }
}

/// Bounds-checked little-endian cursor.
struct Reader<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> Reader<'a> {
    fn at(data: &'a [u8], offset: usize) -> Self {
        Self { data, offset }
    }

    fn take(&mut self, need: usize) -> Result<&'a [u8], DecodeError> {
        let end = self.offset.checked_add(need).filter(|end| *end <= self.data.len());
        let Some(end) = end else {
            return Err(DecodeError::TooShort {
                offset: self.offset,
                need,
                len: self.data.len(),
            });
        };
        let out = &self.data[self.offset..end];
        self.offset = end;
        Ok(out)
    }

    fn array<const N: usize>(&mut self) -> Result<[u8; N], DecodeError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    fn u8(&mut self) -> Result<u8, DecodeError> {
        Ok(self.take(1)?[0])
    }

    fn u32(&mut self) -> Result<u32, DecodeError> {
        Ok(u32::from_le_bytes(self.array()?))
    }

    fn u64(&mut self) -> Result<u64, DecodeError> {
        Ok(u64::from_le_bytes(self.array()?))
    }

    fn i64(&mut self) -> Result<i64, DecodeError> {
        Ok(i64::from_le_bytes(self.array()?))
    }

    fn string(&mut self, field: &'static str) -> Result<String, DecodeError> {
        let len = self.u32()? as usize;
        let bytes = self.take(len)?;
        String::from_utf8(bytes.to_vec()).map_err(|_| DecodeError::InvalidUtf8(field))
    }
}
