use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use noema_api::{telemetry, ApiConfig, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    let config = ApiConfig::from_env().context("load configuration")?;
    telemetry::init(config.log_json);

    let addr = config.bind_addr;
    let state = AppState::new(config)?;
    info!(
        program_id = %state.registry.program_id,
        rpc = %state.config.solana_rpc,
        dev_mode = state.config.core.keys.secret.is_none(),
        upstash = state.upstash.is_some(),
        stripe = state.stripe.is_some(),
        "noema-api starting"
    );

    let app = noema_api::router(Arc::new(state));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("bind {addr}"))?;
    info!("listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("http server error")?;
    info!("shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
