//! Read-only registry client for the Noema agent registry program.
//!
//! This client can:
//! - derive identity/reputation PDAs
//! - fetch raw account bytes over RPC
//! - decode identity and reputation accounts into an `AgentView`
//! - list identity accounts with a discriminator filter
//!
//! Every call is single-shot: no retries, no caching. A missing account is
//! `Ok(None)`; transport and RPC failures are errors.

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use solana_account_decoder_client_types::UiAccountEncoding;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_client::rpc_config::{RpcAccountInfoConfig, RpcProgramAccountsConfig};
use solana_client::rpc_filter::{Memcmp, RpcFilterType};
use solana_program::pubkey::Pubkey;
use solana_sdk::commitment_config::CommitmentConfig;
use tracing::debug;

use crate::constants::{IDENTITY_ACCOUNT_NAME, MAX_LIST_LIMIT};
use crate::decode::{account_discriminator, AgentIdentity, Reputation};
use crate::pda;

/// JSON view of an agent as served by the API and printed by the CLI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentView {
    pub address: String,
    pub agent_id: String,
    pub owner: String,
    pub metadata_uri: String,
    pub created_at: i64,
    pub updated_at: i64,
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reputation: Option<Reputation>,
}

impl AgentView {
    pub fn new(address: Pubkey, identity: AgentIdentity, reputation: Option<Reputation>) -> Self {
        Self {
            address: address.to_string(),
            agent_id: identity.agent_id,
            owner: identity.owner.to_string(),
            metadata_uri: identity.metadata_uri,
            created_at: identity.created_at,
            updated_at: identity.updated_at,
            is_active: identity.is_active,
            reputation,
        }
    }
}

pub struct AgentRegistryClient {
    pub program_id: Pubkey,
    rpc: RpcClient,
}

impl std::fmt::Debug for AgentRegistryClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentRegistryClient")
            .field("program_id", &self.program_id)
            .field("rpc_url", &self.rpc.url())
            .finish()
    }
}

impl AgentRegistryClient {
    pub fn new(program_id: Pubkey, rpc_url: &str) -> Self {
        Self {
            program_id,
            rpc: RpcClient::new_with_commitment(rpc_url.to_string(), CommitmentConfig::confirmed()),
        }
    }

    pub fn rpc_url(&self) -> String {
        self.rpc.url()
    }

    /// Raw account bytes, `None` when the account does not exist.
    pub async fn fetch_account_data(&self, address: &Pubkey) -> Result<Option<Vec<u8>>> {
        let resp = self
            .rpc
            .get_account_with_commitment(address, CommitmentConfig::confirmed())
            .await
            .with_context(|| format!("getAccountInfo {address}"))?;
        Ok(resp.value.map(|acc| acc.data))
    }

    pub async fn fetch_identity(&self, agent_id: &str) -> Result<Option<(Pubkey, AgentIdentity)>> {
        let (address, _) = pda::derive_identity(&self.program_id, agent_id)?;
        let Some(data) = self.fetch_account_data(&address).await? else {
            return Ok(None);
        };
        let identity = AgentIdentity::decode(&data)
            .with_context(|| format!("decode identity account {address}"))?;
        Ok(Some((address, identity)))
    }

    pub async fn fetch_reputation(&self, agent_id: &str) -> Result<Option<Reputation>> {
        let (address, _) = pda::derive_reputation(&self.program_id, agent_id)?;
        let Some(data) = self.fetch_account_data(&address).await? else {
            return Ok(None);
        };
        let rep = Reputation::decode(&data)
            .with_context(|| format!("decode reputation account {address}"))?;
        Ok(Some(rep))
    }

    /// Identity plus reputation. `None` if the identity does not exist; a
    /// missing reputation account leaves `reputation` empty.
    pub async fn fetch_agent(&self, agent_id: &str) -> Result<Option<AgentView>> {
        let Some((address, identity)) = self.fetch_identity(agent_id).await? else {
            return Ok(None);
        };
        let reputation = self.fetch_reputation(agent_id).await?;
        Ok(Some(AgentView::new(address, identity, reputation)))
    }

    /// Identity accounts owned by the program, at most `limit` (capped at 500).
    /// Accounts that fail to decode are skipped.
    pub async fn list_identities(&self, limit: usize) -> Result<Vec<AgentView>> {
        let disc = account_discriminator(IDENTITY_ACCOUNT_NAME);
        let config = RpcProgramAccountsConfig {
            filters: Some(vec![RpcFilterType::Memcmp(Memcmp::new_base58_encoded(0, &disc))]),
            account_config: RpcAccountInfoConfig {
                encoding: Some(UiAccountEncoding::Base64),
                commitment: Some(CommitmentConfig::confirmed()),
                ..Default::default()
            },
            ..Default::default()
        };

        let accounts = self
            .rpc
            .get_program_accounts_with_config(&self.program_id, config)
            .await
            .map_err(|e| anyhow!("getProgramAccounts {}: {e}", self.program_id))?;

        let out = accounts
            .into_iter()
            .filter_map(|(address, account)| match AgentIdentity::decode(&account.data) {
                Ok(identity) => Some(AgentView::new(address, identity, None)),
                Err(e) => {
                    debug!("skipping identity account {address}: {e}");
                    None
                }
            })
            .take(limit.min(MAX_LIST_LIMIT))
            .collect();
        Ok(out)
    }

    /// `getHealth` round trip, used by `noema doctor`.
    pub async fn health(&self) -> Result<()> {
        self.rpc.get_health().await.map_err(|e| anyhow!("getHealth: {e}"))
    }
}
