//! Ledger identifiers, receipts and error definitions.

use std::fmt;
use std::str::FromStr;

use alloy::primitives::B256;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Identifier of a stored entity, assigned by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityKey(pub B256);

impl From<B256> for EntityKey {
    fn from(hash: B256) -> Self {
        Self(hash)
    }
}

impl From<EntityKey> for B256 {
    fn from(key: EntityKey) -> Self {
        key.0
    }
}

impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for EntityKey {
    type Err = EntityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<B256>()
            .map(Self)
            .map_err(|e| EntityError::InvalidKey(format!("'{}': {}", s, e)))
    }
}

/// Reference to the transaction that authorized a write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TxReference(pub B256);

impl fmt::Display for TxReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Proof that the network accepted a write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WriteReceipt {
    pub entity_key: EntityKey,
    pub tx_reference: TxReference,
}

/// Errors raised while authoring or reading entities.
#[derive(Debug, Error)]
pub enum EntityError {
    /// Secret missing, wrong length, not hex, or not a valid scalar.
    #[error("Invalid secret: {0}")]
    InvalidSecret(String),

    /// Document cannot be represented in the requested content type.
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// Expiration amount is non-positive, non-finite or out of range.
    #[error("Invalid duration: {0}")]
    InvalidDuration(String),

    /// Attribute sequence is not a well-formed list of string pairs.
    #[error("Invalid attribute: {0}")]
    InvalidAttribute(String),

    /// Entity key could not be parsed.
    #[error("Invalid entity key {0}")]
    InvalidKey(String),

    /// The network rejected the write, reverted it, or timed out.
    #[error("Submission failed: {0}")]
    Submission(String),

    /// The store does not know the key, or the entity has expired.
    #[error("Entity {0} not found")]
    NotFound(EntityKey),

    /// A read-back entity does not carry what was written.
    #[error("Verification failed: expected {expected}, got {actual}")]
    VerificationMismatch { expected: String, actual: String },
}

impl EntityError {
    /// Whether the error was raised by local validation, before any network call.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidSecret(_)
                | Self::Encoding(_)
                | Self::InvalidDuration(_)
                | Self::InvalidAttribute(_)
                | Self::InvalidKey(_)
        )
    }

    /// Short label used for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidSecret(_) => "invalid_secret",
            Self::Encoding(_) => "encoding",
            Self::InvalidDuration(_) => "invalid_duration",
            Self::InvalidAttribute(_) => "invalid_attribute",
            Self::InvalidKey(_) => "invalid_key",
            Self::Submission(_) => "submission",
            Self::NotFound(_) => "not_found",
            Self::VerificationMismatch { .. } => "verification",
        }
    }
}

/// Result type for entity operations.
pub type EntityResult<T> = Result<T, EntityError>;
