//! Entity retrieval. No signing required.

use std::sync::Arc;

use chrono::Utc;

use crate::entity::types::Entity;
use crate::ledger::network::LedgerNetwork;
use crate::ledger::types::{EntityError, EntityKey, EntityResult};
use crate::observability::metrics;

/// Fetches entities by key.
#[derive(Clone)]
pub struct EntityReader {
    network: Arc<dyn LedgerNetwork>,
}

impl EntityReader {
    pub fn new(network: Arc<dyn LedgerNetwork>) -> Self {
        Self { network }
    }

    /// Fetch an entity; `NotFound` if the key is unknown or the entity has expired.
    pub async fn get(&self, key: EntityKey) -> EntityResult<Entity> {
        let result = match self.network.read_entity(key).await {
            Ok(Some(entity)) if !entity.is_expired_at(Utc::now()) => Ok(entity),
            Ok(_) => Err(EntityError::NotFound(key)),
            Err(e) => Err(e),
        };

        match &result {
            Ok(entity) => {
                tracing::debug!(entity_key = %key, attributes = entity.attributes.len(), "Entity read");
                metrics::record_read("success");
            }
            Err(e) => {
                tracing::debug!(entity_key = %key, error = %e, "Entity read failed");
                metrics::record_read(e.kind());
            }
        }

        result
    }
}
