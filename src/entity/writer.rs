//! Entity creation.
//!
//! # Responsibilities
//! - Validate attributes, encode the document, resolve expiration
//! - Sign the write with the account and submit it once
//!
//! Every validation step runs before the network is touched, so a bad
//! document, duration or attribute never produces a partial submission.

use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;

use crate::entity::expiration::{ceil_to_millis, ExpiresIn};
use crate::entity::payload::{self, ContentType};
use crate::entity::types::{validate_attributes, Attribute};
use crate::ledger::network::{LedgerNetwork, SignedWrite, WriteRequest};
use crate::ledger::types::{EntityResult, WriteReceipt};
use crate::ledger::wallet::AccountSigner;
use crate::observability::metrics;

/// Composes, signs and submits entity writes.
#[derive(Clone)]
pub struct EntityWriter {
    network: Arc<dyn LedgerNetwork>,
}

impl EntityWriter {
    pub fn new(network: Arc<dyn LedgerNetwork>) -> Self {
        Self { network }
    }

    /// Build and sign a write without submitting it.
    pub fn prepare<T: Serialize + Sync + ?Sized>(
        &self,
        account: &AccountSigner,
        document: &T,
        content_type: &ContentType,
        attributes: &[Attribute],
        expires_in: ExpiresIn,
    ) -> EntityResult<SignedWrite> {
        validate_attributes(attributes)?;
        let payload = payload::encode(document, content_type)?;
        let expires_at = ceil_to_millis(expires_in.resolve()?)?;

        account.sign_write(WriteRequest {
            payload,
            attributes: attributes.to_vec(),
            expires_at,
        })
    }

    /// Create an entity and wait for the network to accept it.
    ///
    /// Each call submits exactly once; identical calls create distinct entities.
    pub async fn create<T: Serialize + Sync + ?Sized>(
        &self,
        account: &AccountSigner,
        document: &T,
        content_type: &ContentType,
        attributes: &[Attribute],
        expires_in: ExpiresIn,
    ) -> EntityResult<WriteReceipt> {
        let started = Instant::now();

        let write = match self.prepare(account, document, content_type, attributes, expires_in) {
            Ok(write) => write,
            Err(e) => {
                tracing::warn!(account = %account.address(), error = %e, "Write rejected before submission");
                metrics::record_write(e.kind(), started.elapsed());
                return Err(e);
            }
        };

        tracing::debug!(
            account = %account.address(),
            network = self.network.name(),
            content_type = %content_type,
            payload_bytes = write.request().payload.len(),
            attributes = attributes.len(),
            expires_at = %write.request().expires_at,
            "Submitting entity write"
        );

        match self.network.submit_write(write).await {
            Ok(receipt) => {
                tracing::info!(
                    account = %account.address(),
                    entity_key = %receipt.entity_key,
                    tx = %receipt.tx_reference,
                    "Entity created"
                );
                metrics::record_write("success", started.elapsed());
                Ok(receipt)
            }
            Err(e) => {
                tracing::warn!(account = %account.address(), error = %e, "Entity write failed");
                metrics::record_write(e.kind(), started.elapsed());
                Err(e)
            }
        }
    }
}
