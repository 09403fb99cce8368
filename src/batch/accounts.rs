//! Account collection loading.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::config::ConfigError;

/// One account as supplied by the key-material file.
///
/// `address` is only used for display and attribute tagging; the signing
/// address is always derived from `private_key`.
#[derive(Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountRecord {
    pub address: String,
    pub private_key: String,
}

impl fmt::Debug for AccountRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccountRecord")
            .field("address", &self.address)
            .field("private_key", &"<redacted>")
            .finish()
    }
}

/// Parse a JSON array of account records.
pub fn parse_accounts(json: &str) -> Result<Vec<AccountRecord>, ConfigError> {
    let records: Vec<AccountRecord> = serde_json::from_str(json)
        .map_err(|e| ConfigError::Accounts(format!("unparsable account collection: {}", e)))?;

    if records.is_empty() {
        return Err(ConfigError::Accounts("account collection is empty".to_string()));
    }
    Ok(records)
}

/// Load account records from a JSON file.
pub fn load_accounts(path: &Path) -> Result<Vec<AccountRecord>, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let records = parse_accounts(&content)?;
    tracing::info!(path = %path.display(), accounts = records.len(), "Loaded account collection");
    Ok(records)
}
