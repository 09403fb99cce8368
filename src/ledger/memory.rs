//! Process-local ledger.
//!
//! Behaves like the remote store for the two operations the protocol uses:
//! keys are assigned per write, signatures are checked against the owner,
//! and expired entities are no longer returned.

use std::sync::atomic::{AtomicU64, Ordering};

use alloy::primitives::{keccak256, Address};
use async_trait::async_trait;
use chrono::{TimeDelta, Utc};
use dashmap::DashMap;

use crate::entity::types::Entity;
use crate::ledger::network::{LedgerNetwork, SignedWrite};
use crate::ledger::types::{EntityError, EntityKey, EntityResult, TxReference, WriteReceipt};

/// In-memory entity store.
#[derive(Debug, Default)]
pub struct InMemoryLedger {
    entities: DashMap<EntityKey, Entity>,
    rejected_owners: DashMap<Address, String>,
    sequence: AtomicU64,
    writes_attempted: AtomicU64,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every later write signed by `owner` fail with `reason`.
    pub fn reject_writes_from(&self, owner: Address, reason: impl Into<String>) {
        self.rejected_owners.insert(owner, reason.into());
    }

    /// Number of `submit_write` calls, accepted or not.
    pub fn writes_attempted(&self) -> u64 {
        self.writes_attempted.load(Ordering::SeqCst)
    }

    /// Number of stored entities, including expired ones.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Move an entity's expiration into the past.
    pub fn expire(&self, key: &EntityKey) -> bool {
        match self.entities.get_mut(key) {
            Some(mut entity) => {
                entity.expires_at = Utc::now() - TimeDelta::seconds(1);
                true
            }
            None => false,
        }
    }
}

#[async_trait]
impl LedgerNetwork for InMemoryLedger {
    async fn submit_write(&self, write: SignedWrite) -> EntityResult<WriteReceipt> {
        self.writes_attempted.fetch_add(1, Ordering::SeqCst);

        if let Some(reason) = self.rejected_owners.get(&write.owner()) {
            return Err(EntityError::Submission(format!(
                "write from {} rejected: {}",
                write.owner(),
                reason.value()
            )));
        }

        write.verify()?;

        let request = write.request();
        if request.expires_at <= Utc::now() {
            return Err(EntityError::Submission(format!(
                "expiration {} is not in the future",
                request.expires_at
            )));
        }

        let sequence = self.sequence.fetch_add(1, Ordering::SeqCst);

        let mut seed = Vec::with_capacity(20 + 8 + 32);
        seed.extend_from_slice(write.owner().as_slice());
        seed.extend_from_slice(&sequence.to_be_bytes());
        seed.extend_from_slice(request.signing_digest().as_slice());
        let key = EntityKey(keccak256(&seed));

        let mut tx_seed = write.signature().as_bytes().to_vec();
        tx_seed.extend_from_slice(&sequence.to_be_bytes());
        let tx_reference = TxReference(keccak256(&tx_seed));

        self.entities.insert(
            key,
            Entity {
                key,
                payload: request.payload.clone(),
                attributes: request.attributes.clone(),
                expires_at: request.expires_at,
            },
        );

        tracing::debug!(
            entity_key = %key,
            owner = %write.owner(),
            sequence = sequence,
            "Stored entity in memory"
        );

        Ok(WriteReceipt {
            entity_key: key,
            tx_reference,
        })
    }

    async fn read_entity(&self, key: EntityKey) -> EntityResult<Option<Entity>> {
        let now = Utc::now();
        Ok(self
            .entities
            .get(&key)
            .map(|r| r.value().clone())
            .filter(|entity| !entity.is_expired_at(now)))
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
