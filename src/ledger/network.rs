//! The ledger network seam: signed write requests and the two operations the
//! entity protocol needs from a store.

use std::fmt;

use alloy::network::EthereumWallet;
use alloy::primitives::{keccak256, Address, B256};
use alloy::signers::Signature;
use alloy::sol_types::SolValue;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::entity::payload::Payload;
use crate::entity::types::{Attribute, Entity};
use crate::ledger::contract::CreateOperation;
use crate::ledger::types::{EntityError, EntityKey, EntityResult, WriteReceipt};

/// Unsigned write: payload, attributes and absolute expiration.
#[derive(Debug, Clone, PartialEq)]
pub struct WriteRequest {
    pub payload: Payload,
    pub attributes: Vec<Attribute>,
    pub expires_at: DateTime<Utc>,
}

impl WriteRequest {
    /// keccak256 of the ABI-encoded create operation.
    pub fn signing_digest(&self) -> B256 {
        keccak256(CreateOperation::from(self).abi_encode())
    }
}

/// A write request bound to the account that authorized it.
#[derive(Clone)]
pub struct SignedWrite {
    request: WriteRequest,
    owner: Address,
    signature: Signature,
    wallet: EthereumWallet,
}

impl SignedWrite {
    pub(crate) fn new(
        request: WriteRequest,
        owner: Address,
        signature: Signature,
        wallet: EthereumWallet,
    ) -> Self {
        Self {
            request,
            owner,
            signature,
            wallet,
        }
    }

    pub fn request(&self) -> &WriteRequest {
        &self.request
    }

    pub fn owner(&self) -> Address {
        self.owner
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    /// Transaction signing capability of the owner.
    pub fn wallet(&self) -> &EthereumWallet {
        &self.wallet
    }

    /// Check that the request signature recovers to the owner address.
    pub fn verify(&self) -> EntityResult<()> {
        let digest = self.request.signing_digest();
        let recovered = self
            .signature
            .recover_address_from_msg(digest.as_slice())
            .map_err(|e| EntityError::Submission(format!("unrecoverable signature: {}", e)))?;

        if recovered != self.owner {
            return Err(EntityError::Submission(format!(
                "signature recovers to {}, expected {}",
                recovered, self.owner
            )));
        }
        Ok(())
    }
}

impl fmt::Debug for SignedWrite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignedWrite")
            .field("owner", &self.owner)
            .field("payload_len", &self.request.payload.len())
            .field("attributes", &self.request.attributes.len())
            .field("expires_at", &self.request.expires_at)
            .finish()
    }
}

/// Operations consumed from the ledger network.
///
/// `submit_write` returns once the network has accepted the write; it is never
/// retried here. `read_entity` is read-only and returns `None` for unknown or
/// expired keys.
#[async_trait]
pub trait LedgerNetwork: Send + Sync {
    async fn submit_write(&self, write: SignedWrite) -> EntityResult<WriteReceipt>;

    async fn read_entity(&self, key: EntityKey) -> EntityResult<Option<Entity>>;

    /// Short name for logs.
    fn name(&self) -> &'static str;
}
