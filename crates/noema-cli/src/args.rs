use std::path::PathBuf;

use clap::{Parser, Subcommand};
use noema_core::defaults;
use noema_solana_client::{DEFAULT_PROGRAM_ID, DEFAULT_RPC_URL};

#[derive(Parser, Debug, Clone)]
#[command(name = "noema", version, about = "Noema CLI")]
pub struct Cli {
    /// Emit JSON output only (no status lines).
    #[arg(long, global = true)]
    pub json: bool,

    /// Solana RPC endpoint.
    #[arg(long, global = true, env = "NOEMA_RPC_URL", default_value = DEFAULT_RPC_URL)]
    pub rpc_url: String,

    /// Agent registry program id.
    #[arg(long, global = true, env = "NOEMA_PROGRAM_ID", default_value = DEFAULT_PROGRAM_ID)]
    pub program_id: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Derive the identity and reputation PDAs of an agent (offline).
    Pda { agent_id: String },

    /// Fetch an agent's identity owner and reputation counters.
    Reputation {
        #[arg(env = "AGENT_ID", default_value = "trading-bot-001")]
        agent_id: String,
    },

    /// List registered agent identities.
    Agents {
        #[arg(long, default_value_t = 100)]
        limit: usize,
    },

    /// Single GET of `<url>/api/health` with a client-side timeout.
    Health {
        #[arg(long, env = "NOEMA_API_URL", default_value = "http://localhost:3000")]
        url: String,
        #[arg(long, default_value_t = 5000)]
        timeout_ms: u64,
    },

    /// Write commit, branch and build time to a JSON file.
    BuildInfo {
        #[arg(long, default_value = "public/build-info.json")]
        out: PathBuf,
    },

    /// Issue or verify API keys offline with KEY_SECRET.
    Keys {
        #[command(subcommand)]
        action: KeysCommand,
    },

    /// Run environment checks.
    Doctor,
}

#[derive(Subcommand, Debug, Clone)]
pub enum KeysCommand {
    Issue {
        #[arg(long, default_value = defaults::KEY_PLAN)]
        plan: String,
        #[arg(long, default_value = defaults::KEY_ORG)]
        org: String,
        #[arg(long, env = "KEY_TTL_HOURS", default_value_t = defaults::KEY_TTL_HOURS)]
        ttl_hours: u64,
        #[arg(long, env = "KEY_SECRET", hide_env_values = true)]
        secret: String,
    },
    Verify {
        token: String,
        #[arg(long, env = "KEY_SECRET", hide_env_values = true)]
        secret: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::parse_from(["noema", "pda", "bot-1", "--json", "--program-id", "11111111111111111111111111111111"]);
        assert!(cli.json);
        assert_eq!(cli.program_id, "11111111111111111111111111111111");
        assert!(matches!(cli.command, Command::Pda { ref agent_id } if agent_id == "bot-1"));
    }
}
