//! Ledger integration subsystem.
//!
//! # Data Flow
//! ```text
//! Secret (account record or PRIVATE_KEY)
//!     → wallet.rs (AccountSigner: address derivation, request signing)
//!     → network.rs (WriteRequest → SignedWrite, LedgerNetwork trait)
//!     → client.rs (JSON-RPC: createEntity tx, getEntity eth_call)
//!       or memory.rs (process-local store)
//! ```
//!
//! # Security Constraints
//! - Never log private keys or sensitive data
//! - All RPC calls have configurable timeouts
//! - Writes are submitted once; only reads fail over

pub mod client;
pub mod contract;
pub mod memory;
pub mod network;
pub mod types;
pub mod wallet;

pub use client::RpcLedger;
pub use memory::InMemoryLedger;
pub use network::{LedgerNetwork, SignedWrite, WriteRequest};
pub use types::{EntityError, EntityKey, EntityResult, TxReference, WriteReceipt};
pub use wallet::AccountSigner;
