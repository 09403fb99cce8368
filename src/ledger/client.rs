//! JSON-RPC ledger with timeout and error handling.
//!
//! # Responsibilities
//! - Connect to the JSON-RPC endpoint (plus read-only failovers)
//! - Submit signed `createEntity` transactions and wait for inclusion
//! - Read entities through `eth_call` on the entity processor
//! - Health check for ledger connectivity
//!
//! Writes go to the primary endpoint only. Failing over a write could land it
//! twice, so a failed submission is reported and never resent.

use std::sync::Arc;
use std::time::Duration;

use alloy::network::TransactionBuilder;
use alloy::primitives::Address;
use alloy::providers::{Provider, ProviderBuilder};
use alloy::rpc::types::TransactionRequest;
use alloy::sol_types::SolCall;
use async_trait::async_trait;
use chrono::Utc;
use tokio::time::timeout;
use url::Url;

use crate::config::{ConfigError, NetworkConfig, DEFAULT_PROCESSOR_ADDRESS};
use crate::entity::types::Entity;
use crate::ledger::contract::{CreateOperation, EntityProcessor};
use crate::ledger::network::{LedgerNetwork, SignedWrite};
use crate::ledger::types::{EntityError, EntityKey, EntityResult, TxReference, WriteReceipt};
use crate::observability::metrics;

/// Ledger reached over JSON-RPC.
#[derive(Clone)]
pub struct RpcLedger {
    /// Read providers (primary + failovers).
    readers: Vec<Arc<dyn Provider + Send + Sync>>,
    /// Primary endpoint, used for writes.
    rpc_url: Url,
    /// Entity processor contract.
    processor: Address,
    config: NetworkConfig,
    timeout_duration: Duration,
    receipt_timeout: Duration,
}

impl RpcLedger {
    /// Create a ledger client for `config`.
    ///
    /// An unreachable endpoint or a chain id mismatch is logged, not fatal.
    pub async fn connect(config: NetworkConfig) -> Result<Self, ConfigError> {
        let rpc_url: Url = config.rpc_url.parse().map_err(|e| {
            ConfigError::Network(format!("Invalid RPC URL '{}': {}", config.rpc_url, e))
        })?;
        let processor: Address = config.processor_address.parse().map_err(|e| {
            ConfigError::Network(format!(
                "Invalid processor address '{}': {}",
                config.processor_address, e
            ))
        })?;

        if config.processor_address.eq_ignore_ascii_case(DEFAULT_PROCESSOR_ADDRESS) {
            tracing::warn!(
                processor = %processor,
                "Processor address is the placeholder; writes need a deployed processor contract"
            );
        }

        let mut readers = Vec::new();
        readers.push(Arc::new(ProviderBuilder::new().connect_http(rpc_url.clone()))
            as Arc<dyn Provider + Send + Sync>);

        for url_str in &config.failover_urls {
            if let Ok(url) = url_str.parse::<Url>() {
                readers.push(Arc::new(ProviderBuilder::new().connect_http(url))
                    as Arc<dyn Provider + Send + Sync>);
            } else {
                tracing::warn!(url = %url_str, "Ignoring invalid failover RPC URL");
            }
        }

        let ledger = Self {
            readers,
            rpc_url,
            processor,
            timeout_duration: Duration::from_secs(config.rpc_timeout_secs),
            receipt_timeout: Duration::from_secs(config.receipt_timeout_secs),
            config,
        };

        match ledger.verify_chain_id().await {
            Ok(()) => tracing::info!(
                network = %ledger.config.name,
                rpc_url = %ledger.config.rpc_url,
                chain_id = ledger.config.chain_id,
                "Ledger client initialized"
            ),
            Err(e) => tracing::warn!(
                error = %e,
                "Ledger client initialized but chain verification failed"
            ),
        }

        Ok(ledger)
    }

    /// Verify the connected chain ID matches configuration.
    pub async fn verify_chain_id(&self) -> EntityResult<()> {
        let chain_id = self.get_chain_id().await?;
        if chain_id != self.config.chain_id {
            return Err(EntityError::Submission(format!(
                "chain ID mismatch: expected {}, got {}",
                self.config.chain_id, chain_id
            )));
        }
        Ok(())
    }

    /// Get the chain ID from the RPC.
    pub async fn get_chain_id(&self) -> EntityResult<u64> {
        for (i, provider) in self.readers.iter().enumerate() {
            match timeout(self.timeout_duration, provider.get_chain_id()).await {
                Ok(Ok(result)) => return Ok(result),
                Ok(Err(e)) => {
                    tracing::warn!(provider_idx = i, error = %e, "RPC error, trying next provider");
                }
                Err(_) => {
                    tracing::warn!(provider_idx = i, "RPC timeout, trying next provider");
                }
            }
        }
        Err(EntityError::Submission("All RPC providers failed".to_string()))
    }

    /// Get the latest block number.
    pub async fn get_block_number(&self) -> EntityResult<u64> {
        for (i, provider) in self.readers.iter().enumerate() {
            match timeout(self.timeout_duration, provider.get_block_number()).await {
                Ok(Ok(result)) => return Ok(result),
                Ok(Err(e)) => tracing::warn!(provider_idx = i, error = %e, "RPC error"),
                Err(_) => tracing::warn!(provider_idx = i, "RPC timeout"),
            }
        }
        Err(EntityError::Submission(
            "All providers failed to get block number".to_string(),
        ))
    }

    /// Check if the ledger is reachable.
    pub async fn is_healthy(&self) -> bool {
        self.health().await.is_ok()
    }

    /// Latest block number, recording reachability on the health gauge.
    pub async fn health(&self) -> EntityResult<u64> {
        let result = self.get_block_number().await;
        metrics::record_rpc_health(result.is_ok());
        result
    }

    pub fn config(&self) -> &NetworkConfig {
        &self.config
    }

    pub fn processor(&self) -> Address {
        self.processor
    }

    fn create_transaction(&self, write: &SignedWrite) -> TransactionRequest {
        let call = EntityProcessor::createEntityCall {
            op: CreateOperation::from(write.request()),
        };
        TransactionRequest::default()
            .with_from(write.owner())
            .with_to(self.processor)
            .with_input(call.abi_encode())
            .with_chain_id(self.config.chain_id)
    }
}

#[async_trait]
impl LedgerNetwork for RpcLedger {
    async fn submit_write(&self, write: SignedWrite) -> EntityResult<WriteReceipt> {
        let tx = self.create_transaction(&write);
        let provider = ProviderBuilder::new()
            .wallet(write.wallet().clone())
            .connect_http(self.rpc_url.clone());

        let pending = match timeout(self.timeout_duration, provider.send_transaction(tx)).await {
            Ok(Ok(pending)) => pending,
            Ok(Err(e)) => return Err(EntityError::Submission(format!("transaction rejected: {}", e))),
            Err(_) => {
                return Err(EntityError::Submission(format!(
                    "RPC timeout after {} seconds",
                    self.config.rpc_timeout_secs
                )))
            }
        };

        let tx_hash = *pending.tx_hash();
        tracing::debug!(tx_hash = %tx_hash, owner = %write.owner(), "Write submitted");

        let receipt = match timeout(
            self.receipt_timeout,
            pending
                .with_required_confirmations(self.config.confirmations)
                .get_receipt(),
        )
        .await
        {
            Ok(Ok(receipt)) => receipt,
            Ok(Err(e)) => {
                return Err(EntityError::Submission(format!(
                    "waiting for {} failed: {}",
                    tx_hash, e
                )))
            }
            Err(_) => {
                return Err(EntityError::Submission(format!(
                    "{} not included after {} seconds",
                    tx_hash, self.config.receipt_timeout_secs
                )))
            }
        };

        if !receipt.status() {
            return Err(EntityError::Submission(format!("transaction {} reverted", tx_hash)));
        }

        let entity_key = receipt
            .inner
            .logs()
            .iter()
            .filter(|log| log.inner.address == self.processor)
            .find_map(|log| log.log_decode::<EntityProcessor::EntityCreated>().ok())
            .map(|decoded| EntityKey(decoded.inner.entityKey))
            .ok_or_else(|| {
                EntityError::Submission(format!(
                    "transaction {} emitted no EntityCreated event",
                    tx_hash
                ))
            })?;

        Ok(WriteReceipt {
            entity_key,
            tx_reference: TxReference(tx_hash),
        })
    }

    async fn read_entity(&self, key: EntityKey) -> EntityResult<Option<Entity>> {
        let call = EntityProcessor::getEntityCall { entityKey: key.0 };
        let tx = TransactionRequest::default()
            .with_to(self.processor)
            .with_input(call.abi_encode());

        for (i, provider) in self.readers.iter().enumerate() {
            let request = provider.call(tx.clone());
            match timeout(self.timeout_duration, async move { request.await }).await {
                Ok(Ok(output)) => {
                    let record = EntityProcessor::getEntityCall::abi_decode_returns(&output)
                        .map_err(|e| {
                            EntityError::Submission(format!("undecodable entity record: {}", e))
                        })?;
                    let now = Utc::now();
                    return Ok(record
                        .into_entity(key)?
                        .filter(|entity| !entity.is_expired_at(now)));
                }
                Ok(Err(e)) => tracing::warn!(provider_idx = i, error = %e, "RPC error"),
                Err(_) => tracing::warn!(provider_idx = i, "RPC timeout"),
            }
        }
        Err(EntityError::Submission(format!(
            "All providers failed to read entity {}",
            key
        )))
    }

    fn name(&self) -> &'static str {
        "rpc"
    }
}

impl std::fmt::Debug for RpcLedger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RpcLedger")
            .field("rpc_url", &self.config.rpc_url)
            .field("chain_id", &self.config.chain_id)
            .field("processor", &self.processor)
            .field("timeout_secs", &self.config.rpc_timeout_secs)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::payload::{encode, ContentType};
    use crate::ledger::network::WriteRequest;
    use crate::ledger::wallet::AccountSigner;
    use alloy::primitives::B256;

    fn unreachable_config() -> NetworkConfig {
        NetworkConfig {
            // Nothing listens on port 1.
            rpc_url: "http://127.0.0.1:1".to_string(),
            rpc_timeout_secs: 2,
            receipt_timeout_secs: 2,
            ..NetworkConfig::default()
        }
    }

    #[tokio::test]
    async fn test_connect_tolerates_unreachable_endpoint() {
        let ledger = RpcLedger::connect(unreachable_config()).await;
        assert!(ledger.is_ok());
    }

    #[tokio::test]
    async fn test_connect_rejects_bad_processor() {
        let mut config = unreachable_config();
        config.processor_address = "arkiv".to_string();
        let err = RpcLedger::connect(config).await.unwrap_err();
        assert!(matches!(err, ConfigError::Network(_)));
    }

    #[tokio::test]
    async fn test_read_failover_exhausted() {
        let mut config = unreachable_config();
        config.failover_urls.push("http://127.0.0.1:2".to_string());
        let ledger = RpcLedger::connect(config).await.unwrap();

        let err = ledger.read_entity(EntityKey(B256::ZERO)).await.unwrap_err();
        assert!(err.to_string().contains("All providers failed"));
        assert!(!ledger.is_healthy().await);
        assert!(matches!(ledger.health().await, Err(EntityError::Submission(_))));
    }

    #[tokio::test]
    async fn test_submit_to_unreachable_endpoint() {
        let ledger = RpcLedger::connect(unreachable_config()).await.unwrap();
        let signer = AccountSigner::from_secret(
            "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80",
            31337,
        )
        .unwrap();
        let write = signer
            .sign_write(WriteRequest {
                payload: encode("hi", &ContentType::Text).unwrap(),
                attributes: Vec::new(),
                expires_at: Utc::now() + chrono::TimeDelta::days(1),
            })
            .unwrap();

        let tx = ledger.create_transaction(&write);
        assert_eq!(tx.to, Some(ledger.processor().into()));

        let err = ledger.submit_write(write).await.unwrap_err();
        assert!(matches!(err, EntityError::Submission(_)));
    }
}
