//! arkiv-entities command line.
//!
//! # Architecture Overview
//!
//! ```text
//!   config.toml / flags          accounts.json / PRIVATE_KEY
//!          │                              │
//!          ▼                              ▼
//!   ┌─────────────┐              ┌────────────────┐
//!   │  AppConfig  │              │ AccountSigner  │
//!   └──────┬──────┘              └───────┬────────┘
//!          │                             │
//!          ▼                             ▼
//!   ┌─────────────┐   signed write ┌────────────────┐   eth_sendRawTransaction
//!   │ BatchRunner │───────────────▶│  EntityWriter  │──────────────────────────▶ ledger
//!   │             │                └────────────────┘
//!   │             │   verify       ┌────────────────┐   eth_call getEntity
//!   │             │───────────────▶│  EntityReader  │──────────────────────────▶ ledger
//!   └──────┬──────┘                └────────────────┘
//!          ▼
//!   report (JSON on stdout), logs on stderr
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use serde_json::Value;

use arkiv_entities::batch::{BatchRunner, BatchSettings};
use arkiv_entities::config::{load_config, validate_config, AppConfig, ConfigError, NetworkConfig};
use arkiv_entities::entity::{Attribute, ContentType, EntityReader, EntityWriter, ExpiresIn};
use arkiv_entities::ledger::{AccountSigner, EntityKey, InMemoryLedger, LedgerNetwork, RpcLedger};
use arkiv_entities::observability::{logging, metrics};
use arkiv_entities::report;

#[derive(Parser)]
#[command(name = "arkiv-entities")]
#[command(about = "Create and verify time-limited entities on an Arkiv ledger", long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Named network preset (local, mendoza).
    #[arg(short, long)]
    network: Option<String>,

    /// JSON-RPC endpoint, overrides the configuration.
    #[arg(long)]
    rpc_url: Option<String>,

    /// Chain ID, overrides the configuration.
    #[arg(long)]
    chain_id: Option<u64>,

    /// Use a process-local ledger instead of the network.
    #[arg(long)]
    simulate: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create one entity and read it back
    Create {
        /// Hex secret; falls back to the PRIVATE_KEY environment variable.
        #[arg(long)]
        private_key: Option<String>,

        /// JSON document to store; defaults to a generated document.
        #[arg(long)]
        document: Option<PathBuf>,

        /// entityId of the generated document.
        #[arg(long, default_value = "doc-123")]
        entity_id: String,

        /// Attribute as key=value, repeatable; replaces the configured attributes.
        #[arg(long = "attr")]
        attributes: Vec<Attribute>,

        /// Content type, overrides the configuration.
        #[arg(long)]
        content_type: Option<String>,

        /// Retention in days, overrides the configuration.
        #[arg(long)]
        expires_in_days: Option<f64>,

        /// Skip reading the entity back.
        #[arg(long)]
        no_verify: bool,
    },
    /// Fetch an entity by key
    Get {
        key: EntityKey,
    },
    /// Check that the ledger endpoint answers
    Health,
    /// Create and verify one entity per account
    Batch {
        /// JSON array of {"address", "privateKey"} records.
        #[arg(long)]
        accounts: PathBuf,

        /// Accounts processed at the same time, overrides the configuration.
        #[arg(long)]
        concurrency: Option<usize>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "Run aborted");
            eprintln!("Error: {}", e);
            ExitCode::from(2)
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let config = resolve_config(&cli)?;

    logging::init_logging(&config.observability);
    tracing::info!(
        network = %config.network.name,
        rpc_url = %config.network.rpc_url,
        chain_id = config.network.chain_id,
        simulate = cli.simulate,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse::<SocketAddr>() {
            metrics::init_metrics(addr);
        }
    }

    let rpc = if cli.simulate {
        None
    } else {
        Some(Arc::new(RpcLedger::connect(config.network.clone()).await?))
    };
    let network: Arc<dyn LedgerNetwork> = match &rpc {
        Some(ledger) => ledger.clone(),
        None => Arc::new(InMemoryLedger::new()),
    };
    let writer = EntityWriter::new(network.clone());
    let reader = EntityReader::new(network.clone());

    match cli.command {
        Commands::Create {
            private_key,
            document,
            entity_id,
            attributes,
            content_type,
            expires_in_days,
            no_verify,
        } => {
            let account = match private_key {
                Some(secret) => AccountSigner::from_secret(&secret, config.network.chain_id)?,
                None => AccountSigner::from_env(config.network.chain_id)?,
            };
            let document: Value = match document {
                Some(path) => serde_json::from_str(&std::fs::read_to_string(path)?)?,
                None => config.entity.document(&entity_id),
            };
            let attributes = if attributes.is_empty() {
                config.entity.attributes.clone()
            } else {
                attributes
            };
            let content_type = content_type
                .map(|ct| ContentType::from(ct.as_str()))
                .unwrap_or_else(|| config.entity.content_type.clone());
            let expires_in = match expires_in_days {
                Some(days) => ExpiresIn::days(days)?,
                None => config.entity.expires_in,
            };

            let receipt = writer
                .create(&account, &document, &content_type, &attributes, expires_in)
                .await?;
            report::print(&report::receipt_view(&receipt))?;

            if !no_verify {
                let entity = reader.get(receipt.entity_key).await?;
                report::print(&report::entity_view(&entity))?;
            }
            Ok(ExitCode::SUCCESS)
        }
        Commands::Get { key } => {
            let entity = reader.get(key).await?;
            report::print(&report::entity_view(&entity))?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Health => {
            let block = match &rpc {
                Some(ledger) => ledger.health().await.ok(),
                None => None,
            };
            let healthy = rpc.is_none() || block.is_some();
            report::print(&report::health_view(&config.network, network.name(), block, healthy))?;
            Ok(if healthy {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Commands::Batch {
            accounts,
            concurrency,
        } => {
            if let Some(ledger) = &rpc {
                if !ledger.is_healthy().await {
                    return Err(format!(
                        "ledger at {} is unreachable, no account was processed",
                        config.network.rpc_url
                    )
                    .into());
                }
            }

            let mut settings = BatchSettings::from_config(&config);
            if let Some(concurrency) = concurrency {
                settings.concurrency = concurrency.max(1);
            }

            let runner = BatchRunner::new(writer, reader, settings);
            let result = runner.run_batch_file(&accounts).await?;
            report::print(&report::batch_view(&result))?;

            Ok(if result.all_succeeded() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
    }
}

/// Load the config file (or defaults), apply CLI overrides, validate.
fn resolve_config(cli: &Cli) -> Result<AppConfig, ConfigError> {
    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => AppConfig::default(),
    };

    if let Some(name) = &cli.network {
        config.network = NetworkConfig::preset(name).ok_or_else(|| {
            ConfigError::Network(format!(
                "unknown network '{}', expected one of {:?}",
                name,
                NetworkConfig::preset_names()
            ))
        })?;
    }
    if let Some(rpc_url) = &cli.rpc_url {
        config.network.rpc_url = rpc_url.clone();
    }
    if let Some(chain_id) = cli.chain_id {
        config.network.chain_id = chain_id;
    }

    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}
