//! Arkiv entity authoring and verification.
//!
//! Writes attribute-tagged, time-limited entities to a ledger-backed store
//! and reads them back to confirm the write, for one account or a batch.

pub mod batch;
pub mod config;
pub mod entity;
pub mod ledger;
pub mod observability;
pub mod report;

pub use batch::{BatchResult, BatchRunner, BatchSettings};
pub use config::AppConfig;
pub use entity::{EntityReader, EntityWriter};
pub use ledger::{AccountSigner, EntityError, LedgerNetwork};
