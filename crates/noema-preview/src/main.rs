use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use clap::{Parser, Subcommand};
use noema_store::{MintLedger, StakingLedger, StoreConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

use noema_preview::{staking_router, x404::PREVIEW_PROGRAM_ID, x404_router, STAKING_PORT, X404_PORT};

#[derive(Debug, Parser)]
#[command(name = "noema-preview", version, about = "Noema preview services (demo data only)")]
struct Cli {
    /// Directory holding staking.json and mints.json.
    #[arg(long, env = "NOEMA_DATA_DIR", default_value = "./data", global = true)]
    data_dir: PathBuf,

    #[arg(long, env = "NOEMA_BIND_HOST", default_value = "0.0.0.0", global = true)]
    host: IpAddr,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    service: Service,
}

#[derive(Debug, Subcommand)]
enum Service {
    /// Stake/unstake/claim ledger.
    Staking {
        #[arg(long, env = "PORT", default_value_t = STAKING_PORT)]
        port: u16,
    },
    /// Demo x404 NFT mints.
    X404 {
        #[arg(long, env = "PORT", default_value_t = X404_PORT)]
        port: u16,
        #[arg(long, env = "X404_PROGRAM_ID", default_value = PREVIEW_PROGRAM_ID)]
        program_id: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    let store = StoreConfig::local_dev(&cli.data_dir);
    let (name, port, app): (&str, u16, Router) = match cli.service {
        Service::Staking { port } => {
            let ledger = StakingLedger::open(&store);
            ("staking", port, staking_router(Arc::new(ledger)))
        }
        Service::X404 { port, program_id } => {
            let ledger = MintLedger::open(&store);
            ("x404", port, x404_router(Arc::new(ledger), &program_id))
        }
    };

    let addr = SocketAddr::new(cli.host, port);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("bind {addr}"))?;
    info!(data_dir = %store.root().display(), "{name} preview listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await
        .context("http server error")
}

fn init_tracing(json: bool) {
    let json = json
        || std::env::var("NOEMA_LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json"));
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(false);
    let _ = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
}
