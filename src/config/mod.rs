//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → CLI overrides (network preset, RPC URL, chain id)
//!     → validation.rs (semantic checks)
//!     → AppConfig (validated, immutable)
//!     → passed by value to the ledger, writer and batch runner
//! ```
//!
//! # Design Decisions
//! - No process-wide configuration; every component receives what it needs
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{
    AppConfig, BatchConfig, EntityConfig, NetworkConfig, ObservabilityConfig,
    DEFAULT_PROCESSOR_ADDRESS,
};
pub use validation::{validate_config, ValidationError};
