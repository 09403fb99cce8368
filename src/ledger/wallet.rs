//! Account signing capability.
//!
//! # Security
//! - Secrets are never logged or serialized
//! - `Debug` output shows the address only

use alloy::network::EthereumWallet;
use alloy::primitives::Address;
use alloy::signers::local::PrivateKeySigner;
use alloy::signers::{Signer, SignerSync};
use std::fmt;

use crate::ledger::network::{SignedWrite, WriteRequest};
use crate::ledger::types::{EntityError, EntityResult};

/// Environment variable holding the single-account secret.
pub const PRIVATE_KEY_ENV_VAR: &str = "PRIVATE_KEY";

/// A secret turned into a capability bound to one address.
#[derive(Clone)]
pub struct AccountSigner {
    signer: PrivateKeySigner,
    chain_id: u64,
}

impl AccountSigner {
    /// Create a signer from a hex-encoded secret, with or without a `0x` prefix.
    pub fn from_secret(secret: &str, chain_id: u64) -> EntityResult<Self> {
        let secret = secret.trim();
        let key_hex = secret
            .strip_prefix("0x")
            .or_else(|| secret.strip_prefix("0X"))
            .unwrap_or(secret);

        if key_hex.is_empty() {
            return Err(EntityError::InvalidSecret("secret is empty".to_string()));
        }
        if key_hex.len() != 64 {
            return Err(EntityError::InvalidSecret(format!(
                "expected 64 hex characters, got {}",
                key_hex.len()
            )));
        }
        if !key_hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(EntityError::InvalidSecret(
                "secret contains non-hex characters".to_string(),
            ));
        }

        let signer: PrivateKeySigner = key_hex
            .parse()
            .map_err(|e| EntityError::InvalidSecret(format!("not a valid private key: {}", e)))?;
        let signer = signer.with_chain_id(Some(chain_id));

        tracing::debug!(
            address = %signer.address(),
            chain_id = chain_id,
            "Account signer initialized"
        );

        Ok(Self { signer, chain_id })
    }

    /// Load the secret from `PRIVATE_KEY`.
    pub fn from_env(chain_id: u64) -> EntityResult<Self> {
        let secret = std::env::var(PRIVATE_KEY_ENV_VAR).map_err(|_| {
            EntityError::InvalidSecret(format!(
                "environment variable {} not set",
                PRIVATE_KEY_ENV_VAR
            ))
        })?;

        Self::from_secret(&secret, chain_id)
    }

    pub fn address(&self) -> Address {
        self.signer.address()
    }

    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    /// Sign a write request. Local, no network access.
    pub fn sign_write(&self, request: WriteRequest) -> EntityResult<SignedWrite> {
        let digest = request.signing_digest();
        let signature = self
            .signer
            .sign_message_sync(digest.as_slice())
            .map_err(|e| EntityError::InvalidSecret(format!("signing failed: {}", e)))?;

        Ok(SignedWrite::new(
            request,
            self.address(),
            signature,
            EthereumWallet::from(self.signer.clone()),
        ))
    }
}

impl fmt::Debug for AccountSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccountSigner")
            .field("address", &self.address())
            .field("chain_id", &self.chain_id)
            .finish()
    }
}
