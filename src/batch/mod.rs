//! Batch create-and-verify over many accounts.
//!
//! # Data Flow
//! ```text
//! accounts file (JSON array of {address, privateKey})
//!     → accounts.rs (parse; empty or malformed collection is fatal)
//!     → orchestrator.rs (per account: sign → create → get → compare entityId)
//!     → types.rs (BatchResult, input order preserved)
//! ```
//!
//! # Design Decisions
//! - A failing account never stops or affects its siblings
//! - Accounts share no mutable state; concurrency is a setting, not a requirement

pub mod accounts;
pub mod orchestrator;
pub mod types;

pub use accounts::{load_accounts, parse_accounts, AccountRecord};
pub use orchestrator::{BatchRunner, BatchSettings};
pub use types::{AccountOutcome, AccountReport, BatchResult};
