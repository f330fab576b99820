use anyhow::{Context, Result};
use noema_solana_client::{AgentRegistryClient, Pubkey};

use crate::args::{Cli, Command};

mod agents;
mod build_info;
mod doctor;
mod health;
mod keys;
mod pda;
mod reputation;

pub async fn dispatch(cli: Cli) -> Result<()> {
    match &cli.command {
        Command::Pda { agent_id } => pda::run(&program_id(&cli)?, agent_id),
        Command::Reputation { agent_id } => reputation::run(&registry(&cli)?, agent_id).await,
        Command::Agents { limit } => agents::run(&registry(&cli)?, *limit).await,
        Command::Health { url, timeout_ms } => health::run(url, *timeout_ms).await,
        Command::BuildInfo { out } => build_info::run(out),
        Command::Keys { action } => keys::run(action),
        Command::Doctor => doctor::run(&cli).await,
    }
}

pub(crate) fn program_id(cli: &Cli) -> Result<Pubkey> {
    cli.program_id
        .parse()
        .with_context(|| format!("invalid program id: {}", cli.program_id))
}

fn registry(cli: &Cli) -> Result<AgentRegistryClient> {
    Ok(AgentRegistryClient::new(program_id(cli)?, &cli.rpc_url))
}
