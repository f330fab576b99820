use anyhow::{bail, Result};
use noema_core::token::{self, ApiKeyClaims};
use serde::Serialize;
use time::OffsetDateTime;

use crate::args::KeysCommand;
use crate::output;

#[derive(Debug, Serialize)]
pub struct VerifyOut {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decoded: Option<ApiKeyClaims>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

pub fn run(action: &KeysCommand) -> Result<()> {
    let now = OffsetDateTime::now_utc().unix_timestamp();
    match action {
        KeysCommand::Issue {
            plan,
            org,
            ttl_hours,
            secret,
        } => {
            let issued = token::issue(secret, plan, org, *ttl_hours, now)?;
            output::status(true, &format!("key hash {}", token::key_hash(&issued.api_key)));
            output::print(&issued)
        }
        KeysCommand::Verify { token: raw, secret } => {
            let out = match token::verify(secret, raw, now) {
                Ok(claims) => VerifyOut {
                    valid: true,
                    decoded: Some(claims),
                    error: None,
                },
                Err(e) => VerifyOut {
                    valid: false,
                    decoded: None,
                    error: Some(e.message()),
                },
            };
            output::print(&out)?;
            if !out.valid {
                bail!("key rejected");
            }
            Ok(())
        }
    }
}
