use anyhow::Result;
use noema_solana_client::{AgentRegistryClient, AgentView};
use serde::Serialize;

use crate::output;

#[derive(Debug, Serialize)]
pub struct AgentsOut {
    pub count: usize,
    pub agents: Vec<AgentView>,
}

pub async fn run(client: &AgentRegistryClient, limit: usize) -> Result<()> {
    let agents = client.list_identities(limit).await?;
    output::print(&AgentsOut {
        count: agents.len(),
        agents,
    })
}
