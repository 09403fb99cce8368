//! Metrics collection and exposition.
//!
//! # Metrics
//! - `entity_writes_total` (counter): writes by outcome
//! - `entity_write_duration_seconds` (histogram): validation to acceptance
//! - `entity_reads_total` (counter): reads by outcome
//! - `batch_accounts_total` (counter): batch accounts by outcome
//! - `ledger_rpc_healthy` (gauge): 1=healthy, 0=unhealthy

use std::net::SocketAddr;
use std::time::Duration;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Start the Prometheus exporter on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_write(outcome: &'static str, elapsed: Duration) {
    ::metrics::counter!("entity_writes_total", "outcome" => outcome).increment(1);
    ::metrics::histogram!("entity_write_duration_seconds").record(elapsed.as_secs_f64());
}

pub fn record_read(outcome: &'static str) {
    ::metrics::counter!("entity_reads_total", "outcome" => outcome).increment(1);
}

pub fn record_batch_account(outcome: &'static str) {
    ::metrics::counter!("batch_accounts_total", "outcome" => outcome).increment(1);
}

pub fn record_rpc_health(healthy: bool) {
    ::metrics::gauge!("ledger_rpc_healthy").set(if healthy { 1.0 } else { 0.0 });
}
