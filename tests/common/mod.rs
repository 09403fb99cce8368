//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use alloy::primitives::Address;
use alloy::signers::local::PrivateKeySigner;
use arkiv_entities::batch::{AccountRecord, BatchRunner, BatchSettings};
use arkiv_entities::config::AppConfig;
use arkiv_entities::entity::{payload, ContentType, Entity, EntityReader, EntityWriter};
use arkiv_entities::ledger::{
    EntityKey, EntityResult, InMemoryLedger, LedgerNetwork, SignedWrite, WriteReceipt,
};
use async_trait::async_trait;
use dashmap::DashMap;
use serde_json::json;

/// Anvil development accounts: (address, private key).
pub const DEV_ACCOUNTS: [(&str, &str); 3] = [
    (
        "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266",
        "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80",
    ),
    (
        "0x70997970C51812dc3A010C7d01b50e0d17dc79C8",
        "59c6995e998f97a5a0044966f0945389dc9e86dae88c7a8412f4603b6b78690d",
    ),
    (
        "0x3C44CdDdB6a900fa2b585dd299e03d12FA4293BC",
        "0x5de4111afa1a4b94908f83103eb1f1706367c2e68ca870fc3fb9a804cdab365a",
    ),
];

pub const CHAIN_ID: u64 = 31337;

pub struct Stack {
    pub ledger: Arc<InMemoryLedger>,
    pub writer: EntityWriter,
    pub reader: EntityReader,
}

/// Writer and reader over a fresh in-memory ledger.
pub fn stack() -> Stack {
    let ledger = Arc::new(InMemoryLedger::new());
    Stack {
        writer: EntityWriter::new(ledger.clone()),
        reader: EntityReader::new(ledger.clone()),
        ledger,
    }
}

pub fn runner(stack: &Stack, settings: BatchSettings) -> BatchRunner {
    BatchRunner::new(stack.writer.clone(), stack.reader.clone(), settings)
}

pub fn default_settings() -> BatchSettings {
    BatchSettings::from_config(&AppConfig::default())
}

pub fn record(address: &str, private_key: &str) -> AccountRecord {
    AccountRecord {
        address: address.to_string(),
        private_key: private_key.to_string(),
    }
}

pub fn dev_records() -> Vec<AccountRecord> {
    DEV_ACCOUNTS.iter().map(|(a, k)| record(a, k)).collect()
}

/// `n` freshly generated accounts.
pub fn random_records(n: usize) -> Vec<AccountRecord> {
    (0..n)
        .map(|_| {
            let signer = PrivateKeySigner::random();
            record(
                &signer.address().to_string(),
                &alloy::hex::encode(signer.to_bytes()),
            )
        })
        .collect()
}

/// What a [`TamperingLedger`] does to reads of one owner's entities.
#[derive(Debug, Clone)]
pub enum ReadTamper {
    /// The entity is reported as unknown.
    Drop,
    /// The entity comes back carrying this `entityId` instead.
    ReplaceEntityId(String),
}

/// In-memory ledger whose reads misbehave for chosen owners.
pub struct TamperingLedger {
    pub inner: InMemoryLedger,
    owners: DashMap<EntityKey, Address>,
    tampers: DashMap<Address, ReadTamper>,
}

impl TamperingLedger {
    pub fn new() -> Self {
        Self {
            inner: InMemoryLedger::new(),
            owners: DashMap::new(),
            tampers: DashMap::new(),
        }
    }

    pub fn tamper_reads_of(&self, owner: Address, tamper: ReadTamper) {
        self.tampers.insert(owner, tamper);
    }
}

#[async_trait]
impl LedgerNetwork for TamperingLedger {
    async fn submit_write(&self, write: SignedWrite) -> EntityResult<WriteReceipt> {
        let owner = write.owner();
        let receipt = self.inner.submit_write(write).await?;
        self.owners.insert(receipt.entity_key, owner);
        Ok(receipt)
    }

    async fn read_entity(&self, key: EntityKey) -> EntityResult<Option<Entity>> {
        let entity = self.inner.read_entity(key).await?;
        let tamper = self
            .owners
            .get(&key)
            .and_then(|owner| self.tampers.get(owner.value()).map(|t| t.value().clone()));

        match (entity, tamper) {
            (Some(_), Some(ReadTamper::Drop)) => Ok(None),
            (Some(mut entity), Some(ReadTamper::ReplaceEntityId(id))) => {
                entity.payload = payload::encode(&json!({"entity": {"entityId": id}}), &ContentType::Json)?;
                Ok(Some(entity))
            }
            (entity, _) => Ok(entity),
        }
    }

    fn name(&self) -> &'static str {
        "tampering"
    }
}
