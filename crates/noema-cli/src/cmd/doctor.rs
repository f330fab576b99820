use anyhow::Result;
use noema_solana_client::AgentRegistryClient;
use serde::Serialize;

use crate::args::Cli;
use crate::cmd::program_id;
use crate::output;

#[derive(Debug, Serialize)]
pub struct Check {
    pub name: String,
    pub ok: bool,
    pub required: bool,
    pub detail: String,
}

#[derive(Debug, Serialize)]
pub struct DoctorOut {
    pub ok: bool,
    pub checks: Vec<Check>,
}

/// Settings read by the API; each one only enables a feature.
const API_SETTINGS: &[(&str, &str)] = &[
    ("KEY_SECRET", "API key issuance; unset runs metered endpoints in dev mode"),
    ("STRIPE_SECRET_KEY", "checkout sessions"),
    ("STRIPE_WEBHOOK_SECRET", "webhook signature checks"),
    ("STRIPE_PRICE_STARTER", "starter plan price"),
    ("STRIPE_PRICE_PRO", "pro plan price"),
    ("STRIPE_PRICE_ENTERPRISE", "enterprise plan price"),
    ("UPSTASH_REDIS_REST_URL", "rate limiting and usage counters"),
    ("UPSTASH_REDIS_REST_TOKEN", "rate limiting and usage counters"),
    ("RECEIVING_SOLANA_ADDRESS", "Solana Pay recipient (default treasury otherwise)"),
];

pub async fn run(cli: &Cli) -> Result<()> {
    let mut checks: Vec<Check> = API_SETTINGS
        .iter()
        .map(|(name, detail)| Check {
            name: name.to_string(),
            ok: env_set(name),
            required: false,
            detail: detail.to_string(),
        })
        .collect();

    checks.push(Check {
        name: "git".to_string(),
        ok: which_ok("git"),
        required: false,
        detail: "used by build-info".to_string(),
    });

    match program_id(cli) {
        Ok(pid) => {
            checks.push(Check {
                name: "program-id".to_string(),
                ok: true,
                required: true,
                detail: pid.to_string(),
            });
            let client = AgentRegistryClient::new(pid, &cli.rpc_url);
            let rpc = client.health().await;
            checks.push(Check {
                name: "rpc".to_string(),
                ok: rpc.is_ok(),
                required: true,
                detail: match rpc {
                    Ok(()) => format!("{} healthy", cli.rpc_url),
                    Err(e) => format!("{}: {e:#}", cli.rpc_url),
                },
            });
        }
        Err(e) => checks.push(Check {
            name: "program-id".to_string(),
            ok: false,
            required: true,
            detail: format!("{e:#}"),
        }),
    }

    for c in &checks {
        output::status(c.ok, &format!("{}: {}", c.name, c.detail));
    }
    let ok = checks.iter().all(|c| c.ok || !c.required);
    output::print(&DoctorOut { ok, checks })?;
    Ok(())
}

fn env_set(name: &str) -> bool {
    std::env::var(name).is_ok_and(|v| !v.trim().is_empty())
}

fn which_ok(cmd: &str) -> bool {
    let Some(paths) = std::env::var_os("PATH") else {
        return false;
    };
    std::env::split_paths(&paths).any(|p| {
        if p.join(cmd).exists() {
            return true;
        }
        cfg!(windows) && p.join(format!("{cmd}.exe")).exists()
    })
}
