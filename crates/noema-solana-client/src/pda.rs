//! PDA derivation helpers for the Noema agent registry program.
//!
//! Agent ids are used as seeds verbatim (UTF-8 bytes, no normalization), so
//! they must match what the registering wallet sent on chain.

use solana_program::pubkey::{Pubkey, MAX_SEED_LEN};
use thiserror::Error;

use crate::constants::{SEED_IDENTITY, SEED_REPUTATION};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PdaError {
    #[error("agent id must not be empty")]
    EmptyAgentId,
    #[error("agent id is {0} bytes; seeds are limited to 32")]
    AgentIdTooLong(usize),
    #[error("no viable bump seed for agent id")]
    NoViableBump,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgentPdas {
    pub identity: (Pubkey, u8),
    pub reputation: (Pubkey, u8),
}

/// Derive the identity PDA of an agent.
pub fn derive_identity(program_id: &Pubkey, agent_id: &str) -> Result<(Pubkey, u8), PdaError> {
    derive(program_id, SEED_IDENTITY, agent_id)
}

/// Derive the reputation PDA of an agent.
pub fn derive_reputation(program_id: &Pubkey, agent_id: &str) -> Result<(Pubkey, u8), PdaError> {
    derive(program_id, SEED_REPUTATION, agent_id)
}

/// Collect PDAs used by most flows.
pub fn pdas_for_agent(program_id: &Pubkey, agent_id: &str) -> Result<AgentPdas, PdaError> {
    Ok(AgentPdas {
        identity: derive_identity(program_id, agent_id)?,
        reputation: derive_reputation(program_id, agent_id)?,
    })
}

fn derive(program_id: &Pubkey, prefix: &[u8], agent_id: &str) -> Result<(Pubkey, u8), PdaError> {
    validate_agent_id(agent_id)?;
    Pubkey::try_find_program_address(&[prefix, agent_id.as_bytes()], program_id)
        .ok_or(PdaError::NoViableBump)
}

pub fn validate_agent_id(agent_id: &str) -> Result<(), PdaError> {
    if agent_id.is_empty() {
        return Err(PdaError::EmptyAgentId);
    }
    if agent_id.len() > MAX_SEED_LEN {
        return Err(PdaError::AgentIdTooLong(agent_id.len()));
    }
    Ok(())
}
