//! Constants shared between the on-chain program and clients.
//!
//! Keep these stable because they affect PDA derivation.

use solana_program::pubkey::Pubkey;

/// PDA seed for agent identity accounts.
pub const SEED_IDENTITY: &[u8] = b"identity";

/// PDA seed for agent reputation accounts.
pub const SEED_REPUTATION: &[u8] = b"reputation";

/// Anchor account name of identity accounts, used for the discriminator filter.
pub const IDENTITY_ACCOUNT_NAME: &str = "IdentityRegistry";

/// Deployed registry program id (devnet).
pub const DEFAULT_PROGRAM_ID: &str = "G8iYmvncvWsfHRrxZvKuPU6B2kcMj82Lpcf6og6SyMkW";

/// RPC endpoint used when nothing else is configured.
pub const DEFAULT_RPC_URL: &str = "https://api.devnet.solana.com";

pub fn default_program_id() -> Pubkey {
    DEFAULT_PROGRAM_ID.parse().unwrap_or_else(|_| Pubkey::default())
}

/// Upper bound on `list_identities` results.
pub const MAX_LIST_LIMIT: usize = 500;
