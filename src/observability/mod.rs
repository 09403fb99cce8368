//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Writer, reader, ledger clients and batch runner produce:
//!     → logging.rs (structured log events via `tracing`, on stderr)
//!     → metrics.rs (counters, gauges, histograms)
//!
//! Consumers:
//!     → Log aggregation (stderr)
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```
//!
//! # Design Decisions
//! - stdout is reserved for reports; logs never go there
//! - Secrets never appear in log fields
//! - Every batch carries a run id so per-account events can be correlated

pub mod logging;
pub mod metrics;
