//! Batch orchestration.
//!
//! Each account runs: derive signer → create entity → read it back → compare
//! the identifying field. Any error is recorded as that account's failure and
//! the batch moves on. Results come back in input order, also when accounts
//! run concurrently.

use std::path::Path;
use std::time::Duration;

use futures_util::{stream, StreamExt};
use serde_json::Value;
use tokio::time::timeout;
use uuid::Uuid;

use crate::batch::accounts::{load_accounts, AccountRecord};
use crate::batch::types::{AccountOutcome, AccountReport, BatchResult};
use crate::config::{AppConfig, ConfigError, EntityConfig};
use crate::entity::payload::ContentType;
use crate::entity::reader::EntityReader;
use crate::entity::types::{Attribute, Entity};
use crate::entity::writer::EntityWriter;
use crate::ledger::types::{EntityError, EntityResult, WriteReceipt};
use crate::ledger::wallet::AccountSigner;
use crate::observability::metrics;

/// JSON pointer to the identifying field of generated documents.
pub const ENTITY_ID_POINTER: &str = "/entity/entityId";

/// Settings for a batch run.
#[derive(Debug, Clone)]
pub struct BatchSettings {
    pub chain_id: u64,
    pub entity: EntityConfig,
    pub concurrency: usize,
    pub account_timeout: Option<Duration>,
}

impl BatchSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            chain_id: config.network.chain_id,
            entity: config.entity.clone(),
            concurrency: config.batch.concurrency,
            account_timeout: config.batch.account_timeout_secs.map(Duration::from_secs),
        }
    }
}

/// Logical identifier written for the account at `index`.
pub fn entity_id_for(index: usize) -> String {
    format!("doc-{}", index)
}

/// Drives writer and reader over a collection of accounts.
#[derive(Clone)]
pub struct BatchRunner {
    writer: EntityWriter,
    reader: EntityReader,
    settings: BatchSettings,
}

impl BatchRunner {
    pub fn new(writer: EntityWriter, reader: EntityReader, settings: BatchSettings) -> Self {
        Self {
            writer,
            reader,
            settings,
        }
    }

    /// Load accounts from `path`, then run the batch.
    pub async fn run_batch_file(&self, path: &Path) -> Result<BatchResult, ConfigError> {
        let records = load_accounts(path)?;
        self.run_batch(&records).await
    }

    /// Create and verify one entity per account.
    ///
    /// Fails only for an empty collection, before any write. Per-account
    /// errors are reported inside the result.
    pub async fn run_batch(&self, records: &[AccountRecord]) -> Result<BatchResult, ConfigError> {
        if records.is_empty() {
            return Err(ConfigError::Accounts("account collection is empty".to_string()));
        }

        let run_id = Uuid::new_v4();
        let concurrency = self.settings.concurrency.max(1);
        tracing::info!(
            run_id = %run_id,
            accounts = records.len(),
            concurrency = concurrency,
            "Starting batch"
        );

        let accounts: Vec<AccountReport> = stream::iter(records.iter().enumerate())
            .map(|(index, record)| self.run_account(run_id, index, record))
            .buffered(concurrency)
            .collect()
            .await;

        let result = BatchResult { run_id, accounts };
        tracing::info!(
            run_id = %run_id,
            succeeded = result.succeeded(),
            failed = result.failed(),
            "Batch complete"
        );
        Ok(result)
    }

    async fn run_account(&self, run_id: Uuid, index: usize, record: &AccountRecord) -> AccountReport {
        let attempt = self.create_and_verify(index, record);
        let result = match self.settings.account_timeout {
            Some(limit) => match timeout(limit, attempt).await {
                Ok(result) => result,
                Err(_) => Err(EntityError::Submission(format!(
                    "account timed out after {} seconds",
                    limit.as_secs_f64()
                ))),
            },
            None => attempt.await,
        };

        let outcome = match result {
            Ok((receipt, entity)) => {
                tracing::info!(
                    run_id = %run_id,
                    index = index,
                    address = %record.address,
                    entity_key = %receipt.entity_key,
                    "Account verified"
                );
                AccountOutcome::Success { receipt, entity }
            }
            Err(e) => {
                tracing::warn!(
                    run_id = %run_id,
                    index = index,
                    address = %record.address,
                    error = %e,
                    before_network = e.is_validation(),
                    "Account failed"
                );
                AccountOutcome::Failure {
                    error: e.to_string(),
                }
            }
        };

        metrics::record_batch_account(outcome.label());
        AccountReport {
            index,
            address: record.address.clone(),
            outcome,
        }
    }

    async fn create_and_verify(
        &self,
        index: usize,
        record: &AccountRecord,
    ) -> EntityResult<(WriteReceipt, Entity)> {
        let signer = AccountSigner::from_secret(&record.private_key, self.settings.chain_id)?;
        if !signer.address().to_string().eq_ignore_ascii_case(record.address.trim()) {
            tracing::debug!(
                index = index,
                listed = %record.address,
                derived = %signer.address(),
                "Listed address differs from derived address"
            );
        }

        let entity_id = entity_id_for(index);
        let document = self.settings.entity.document(&entity_id);
        let attributes = self.attributes_for(record, &entity_id);

        let receipt = self
            .writer
            .create(
                &signer,
                &document,
                &ContentType::Json,
                &attributes,
                self.settings.entity.expires_in,
            )
            .await?;

        let entity = self.reader.get(receipt.entity_key).await?;
        let written: Value = entity.document()?;
        let actual = written.pointer(ENTITY_ID_POINTER).and_then(Value::as_str);
        if actual != Some(entity_id.as_str()) {
            return Err(EntityError::VerificationMismatch {
                expected: entity_id,
                actual: actual.unwrap_or("<missing>").to_string(),
            });
        }

        Ok((receipt, entity))
    }

    fn attributes_for(&self, record: &AccountRecord, entity_id: &str) -> Vec<Attribute> {
        let mut attributes = self.settings.entity.attributes.clone();
        attributes.push(Attribute::new("account", record.address.clone()));
        attributes.push(Attribute::new("entityId", entity_id));
        attributes
    }
}
