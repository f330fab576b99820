use anyhow::Result;
use noema_solana_client::{pdas_for_agent, Pubkey};
use serde::Serialize;

use crate::output;

#[derive(Debug, Serialize)]
pub struct PdaEntry {
    pub address: String,
    pub bump: u8,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PdaOut {
    pub program_id: String,
    pub agent_id: String,
    pub identity: PdaEntry,
    pub reputation: PdaEntry,
}

pub fn derive(program_id: &Pubkey, agent_id: &str) -> Result<PdaOut> {
    let pdas = pdas_for_agent(program_id, agent_id)?;
    let entry = |(address, bump): (Pubkey, u8)| PdaEntry {
        address: address.to_string(),
        bump,
    };
    Ok(PdaOut {
        program_id: program_id.to_string(),
        agent_id: agent_id.to_string(),
        identity: entry(pdas.identity),
        reputation: entry(pdas.reputation),
    })
}

pub fn run(program_id: &Pubkey, agent_id: &str) -> Result<()> {
    output::print(&derive(program_id, agent_id)?)
}
