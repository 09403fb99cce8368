//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, concurrency >= 1)
//! - Check URLs, addresses and entity defaults parse
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AppConfig → Result<(), Vec<ValidationError>>

use std::fmt;
use std::net::SocketAddr;

use alloy::primitives::Address;

use crate::config::schema::AppConfig;
use crate::entity::expiration::ExpiresIn;
use crate::entity::types::validate_attributes;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a configuration, collecting every problem found.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let network = &config.network;
    if let Err(msg) = check_rpc_url(&network.rpc_url) {
        errors.push(ValidationError::new("network.rpc_url", msg));
    }
    for (i, url) in network.failover_urls.iter().enumerate() {
        if let Err(msg) = check_rpc_url(url) {
            errors.push(ValidationError::new(&format!("network.failover_urls[{}]", i), msg));
        }
    }
    if network.chain_id == 0 {
        errors.push(ValidationError::new("network.chain_id", "must be greater than 0"));
    }
    if network.rpc_timeout_secs == 0 {
        errors.push(ValidationError::new("network.rpc_timeout_secs", "must be greater than 0"));
    }
    if network.receipt_timeout_secs == 0 {
        errors.push(ValidationError::new("network.receipt_timeout_secs", "must be greater than 0"));
    }
    if let Err(e) = network.processor_address.parse::<Address>() {
        errors.push(ValidationError::new(
            "network.processor_address",
            format!("invalid address: {}", e),
        ));
    }
    if network.confirmations == 0 {
        errors.push(ValidationError::new("network.confirmations", "must be at least 1"));
    }

    let entity = &config.entity;
    if let Err(e) = ExpiresIn::new(entity.expires_in.amount, entity.expires_in.unit) {
        errors.push(ValidationError::new("entity.expires_in", e.to_string()));
    }
    if let Err(e) = validate_attributes(&entity.attributes) {
        errors.push(ValidationError::new("entity.attributes", e.to_string()));
    }

    if config.batch.concurrency == 0 {
        errors.push(ValidationError::new("batch.concurrency", "must be at least 1"));
    }
    if config.batch.account_timeout_secs == Some(0) {
        errors.push(ValidationError::new("batch.account_timeout_secs", "must be greater than 0"));
    }

    let observability = &config.observability;
    if !LOG_LEVELS.contains(&observability.log_level.to_ascii_lowercase().as_str()) {
        errors.push(ValidationError::new(
            "observability.log_level",
            format!("unknown level '{}'", observability.log_level),
        ));
    }
    if observability.metrics_enabled && observability.metrics_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("invalid socket address '{}'", observability.metrics_address),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_rpc_url(raw: &str) -> Result<(), String> {
    let url: url::Url = raw.parse().map_err(|e| format!("invalid URL '{}': {}", raw, e))?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(format!("unsupported scheme '{}'", other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::types::Attribute;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&AppConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = AppConfig::default();
        config.network.rpc_url = "ws://localhost:8546".to_string();
        config.network.processor_address = "0x1234".to_string();
        config.entity.expires_in.amount = -1.0;
        config.entity.attributes.push(Attribute::new("", "x"));
        config.batch.concurrency = 0;
        config.observability.log_level = "loud".to_string();

        let errors = validate_config(&config).unwrap_err();
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(
            fields,
            vec![
                "network.rpc_url",
                "network.processor_address",
                "entity.expires_in",
                "entity.attributes",
                "batch.concurrency",
                "observability.log_level",
            ]
        );
    }

    #[test]
    fn test_metrics_address_checked_only_when_enabled() {
        let mut config = AppConfig::default();
        config.observability.metrics_address = "nowhere".to_string();
        assert!(validate_config(&config).is_ok());

        config.observability.metrics_enabled = true;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors[0].field, "observability.metrics_address");
    }

    #[test]
    fn test_failover_urls() {
        let mut config = AppConfig::default();
        config.network.failover_urls = vec!["http://backup:8545".into(), "::bad::".into()];
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors[0].field, "network.failover_urls[1]");
    }
}
