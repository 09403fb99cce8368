//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::entity::expiration::{ExpiresIn, TimeUnit};
use crate::entity::payload::ContentType;
use crate::entity::types::Attribute;

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Ledger network settings.
    pub network: NetworkConfig,

    /// Entity authoring defaults.
    pub entity: EntityConfig,

    /// Batch run settings.
    pub batch: BatchConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Ledger network configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Display name of the chain.
    pub name: String,

    /// JSON-RPC endpoint URL.
    pub rpc_url: String,

    /// Failover JSON-RPC endpoint URLs, used for reads only.
    #[serde(default)]
    pub failover_urls: Vec<String>,

    /// Chain ID (31337 for a local Arkiv L3 testnet).
    pub chain_id: u64,

    /// RPC request timeout in seconds.
    pub rpc_timeout_secs: u64,

    /// Maximum wait for a write to be included, in seconds.
    pub receipt_timeout_secs: u64,

    /// Address of the entity processor.
    pub processor_address: String,

    /// Blocks to wait on top of inclusion before a write counts as accepted.
    pub confirmations: u64,
}

/// Placeholder address of the stand-in entity processor ("arkiv" in ASCII,
/// left-padded). Deployments of the processor contract override it.
pub const DEFAULT_PROCESSOR_ADDRESS: &str = "0x00000000000000000000000000000061726b6976";

impl NetworkConfig {
    /// Named network descriptors.
    ///
    /// Presets carry chain parameters only. The RPC endpoint stays on loopback
    /// and the processor address is the stand-in placeholder, so pointing a
    /// preset at a live node takes an explicit `rpc_url` and
    /// `processor_address`.
    pub fn preset(name: &str) -> Option<Self> {
        match name {
            "local" => Some(Self::default()),
            "mendoza" => Some(Self {
                name: "Mendoza".to_string(),
                rpc_url: "http://127.0.0.1:8545".to_string(),
                chain_id: 60138453056,
                ..Self::default()
            }),
            _ => None,
        }
    }

    pub fn preset_names() -> &'static [&'static str] {
        &["local", "mendoza"]
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            name: "Arkiv L3 Testnet".to_string(),
            rpc_url: "http://localhost:8545".to_string(),
            failover_urls: Vec::new(),
            chain_id: 31337,
            rpc_timeout_secs: 10,
            receipt_timeout_secs: 60,
            processor_address: DEFAULT_PROCESSOR_ADDRESS.to_string(),
            confirmations: 1,
        }
    }
}

/// Defaults for authored entities.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct EntityConfig {
    /// Content type of single-account writes.
    pub content_type: ContentType,

    /// Retention period.
    pub expires_in: ExpiresIn,

    /// `entityType` field of generated documents.
    pub entity_type: String,

    /// `entityContent` field of generated documents.
    pub content: String,

    /// Attributes attached to every write, in order.
    pub attributes: Vec<Attribute>,
}

impl EntityConfig {
    /// Build the document written for `entity_id`.
    pub fn document(&self, entity_id: &str) -> Value {
        json!({
            "entity": {
                "entityType": self.entity_type,
                "entityId": entity_id,
                "entityContent": self.content,
            }
        })
    }
}

impl Default for EntityConfig {
    fn default() -> Self {
        Self {
            content_type: ContentType::Json,
            expires_in: ExpiresIn {
                amount: 30.0,
                unit: TimeUnit::Days,
            },
            entity_type: "document".to_string(),
            content: "Hello World! This is my first document stored on Arkiv.".to_string(),
            attributes: vec![
                Attribute::new("category", "documentation"),
                Attribute::new("version", "1.0"),
            ],
        }
    }
}

/// Batch run configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Accounts processed at the same time (1 = sequential).
    pub concurrency: usize,

    /// Optional per-account limit for the create and verify cycle, in seconds.
    pub account_timeout_secs: Option<u64>,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            concurrency: 1,
            account_timeout_secs: None,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
