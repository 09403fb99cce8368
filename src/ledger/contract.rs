//! ABI bindings for the entity processor and conversions to the entity model.
//!
//! This is a stand-in processor ABI. Arkiv nodes expose their own storage
//! protocol and reject these calls; `RpcLedger` only works against a chain
//! where a contract with this interface is deployed at
//! `network.processor_address`. Use `--simulate` when no such contract exists.

use alloy::sol;
use chrono::{DateTime, Utc};

use crate::entity::payload::{ContentType, Payload};
use crate::entity::types::{Attribute, Entity};
use crate::ledger::network::WriteRequest;
use crate::ledger::types::{EntityError, EntityKey, EntityResult};

sol! {
    #[derive(Debug, PartialEq)]
    struct AttributeEntry {
        string key;
        string value;
    }

    #[derive(Debug, PartialEq)]
    struct CreateOperation {
        bytes payload;
        string contentType;
        uint64 expiresAtMillis;
        AttributeEntry[] attributes;
    }

    #[derive(Debug, PartialEq)]
    struct EntityRecord {
        bool exists;
        bytes payload;
        string contentType;
        uint64 expiresAtMillis;
        AttributeEntry[] attributes;
    }

    interface EntityProcessor {
        /// Emitted once per created entity.
        #[derive(Debug)]
        event EntityCreated(bytes32 indexed entityKey, address indexed owner, uint64 expiresAtMillis);

        function createEntity(CreateOperation calldata op) external returns (bytes32 entityKey);

        function getEntity(bytes32 entityKey) external view returns (EntityRecord memory record);
    }
}

impl From<&WriteRequest> for CreateOperation {
    fn from(request: &WriteRequest) -> Self {
        Self {
            payload: request.payload.bytes.clone(),
            contentType: request.payload.content_type.to_string(),
            expiresAtMillis: request.expires_at.timestamp_millis().max(0) as u64,
            attributes: request
                .attributes
                .iter()
                .map(|a| AttributeEntry {
                    key: a.key.clone(),
                    value: a.value.clone(),
                })
                .collect(),
        }
    }
}

impl EntityRecord {
    /// Convert a processor record into an entity, `None` when the key is unknown.
    pub fn into_entity(self, key: EntityKey) -> EntityResult<Option<Entity>> {
        if !self.exists {
            return Ok(None);
        }

        Ok(Some(Entity {
            key,
            payload: Payload {
                content_type: ContentType::from(self.contentType.as_str()),
                bytes: self.payload,
            },
            attributes: self
                .attributes
                .into_iter()
                .map(|a| Attribute::new(a.key, a.value))
                .collect(),
            expires_at: millis_to_datetime(self.expiresAtMillis)?,
        }))
    }
}

pub(crate) fn millis_to_datetime(millis: u64) -> EntityResult<DateTime<Utc>> {
    i64::try_from(millis)
        .ok()
        .and_then(DateTime::<Utc>::from_timestamp_millis)
        .ok_or_else(|| EntityError::Submission(format!("store returned invalid expiration {}", millis)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::payload::encode;
    use alloy::primitives::B256;
    use alloy::sol_types::SolCall;

    fn request() -> WriteRequest {
        WriteRequest {
            payload: encode(&serde_json::json!({"entity": {"entityId": "doc-1"}}), &ContentType::Json)
                .unwrap(),
            attributes: vec![Attribute::new("b", "2"), Attribute::new("a", "1")],
            expires_at: DateTime::<Utc>::from_timestamp_millis(1_900_000_000_123).unwrap(),
        }
    }

    #[test]
    fn test_create_operation_keeps_attribute_order() {
        let op = CreateOperation::from(&request());
        assert_eq!(op.contentType, "application/json");
        assert_eq!(op.expiresAtMillis, 1_900_000_000_123);
        assert_eq!(op.attributes[0].key, "b");
        assert_eq!(op.attributes[1].key, "a");
    }

    #[test]
    fn test_record_into_entity() {
        let req = request();
        let op = CreateOperation::from(&req);
        let record = EntityRecord {
            exists: true,
            payload: op.payload,
            contentType: op.contentType,
            expiresAtMillis: op.expiresAtMillis,
            attributes: op.attributes,
        };

        // Same shape as an eth_call return value.
        let output = EntityProcessor::getEntityCall::abi_encode_returns(&record);
        let decoded = EntityProcessor::getEntityCall::abi_decode_returns(&output).unwrap();
        let entity = decoded.into_entity(EntityKey(B256::ZERO)).unwrap().unwrap();
        assert_eq!(entity.payload, req.payload);
        assert_eq!(entity.attributes, req.attributes);
        assert_eq!(entity.expires_at, req.expires_at);
    }

    #[test]
    fn test_missing_record() {
        let record = EntityRecord {
            exists: false,
            payload: Default::default(),
            contentType: String::new(),
            expiresAtMillis: 0,
            attributes: Vec::new(),
        };
        assert!(record.into_entity(EntityKey(B256::ZERO)).unwrap().is_none());
    }

    #[test]
    fn test_create_call_selector_is_stable() {
        let call = EntityProcessor::createEntityCall {
            op: CreateOperation::from(&request()),
        };
        let encoded = call.abi_encode();
        assert_eq!(&encoded[..4], &EntityProcessor::createEntityCall::SELECTOR[..]);
    }
}
