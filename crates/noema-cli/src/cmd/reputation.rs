use anyhow::Result;
use noema_solana_client::{pdas_for_agent, AgentRegistryClient, Reputation};
use serde::Serialize;

use crate::output;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReputationOut {
    pub agent_id: String,
    pub rpc_url: String,
    pub identity_pda: String,
    pub reputation_pda: String,
    pub found: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reputation: Option<Reputation>,
}

/// A missing identity or reputation account is reported, not an error.
pub async fn run(client: &AgentRegistryClient, agent_id: &str) -> Result<()> {
    let pdas = pdas_for_agent(&client.program_id, agent_id)?;
    let mut out = ReputationOut {
        agent_id: agent_id.to_string(),
        rpc_url: client.rpc_url(),
        identity_pda: pdas.identity.0.to_string(),
        reputation_pda: pdas.reputation.0.to_string(),
        found: false,
        owner: None,
        reputation: None,
    };

    let Some((_, identity)) = client.fetch_identity(agent_id).await? else {
        output::status(false, &format!("identity not found for agent {agent_id}"));
        return output::print(&out);
    };
    out.found = true;
    out.owner = Some(identity.owner.to_string());
    output::status(true, &format!("identity {} owned by {}", out.identity_pda, identity.owner));

    out.reputation = client.fetch_reputation(agent_id).await?;
    match &out.reputation {
        Some(rep) => output::status(true, &format!("reputation score {}", rep.score)),
        None => output::status(false, "reputation not found"),
    }
    output::print(&out)
}
