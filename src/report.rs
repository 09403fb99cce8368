//! Presentation of receipts, entities and batch results as JSON on stdout.

use serde_json::{json, Value};

use crate::batch::types::{AccountOutcome, BatchResult};
use crate::config::NetworkConfig;
use crate::entity::types::Entity;
use crate::ledger::types::WriteReceipt;

/// JSON view of an entity with its payload decoded when possible.
pub fn entity_view(entity: &Entity) -> Value {
    let document = entity.document::<Value>().ok();
    json!({
        "key": entity.key,
        "contentType": entity.payload.content_type,
        "document": document,
        "payload": entity.payload.bytes,
        "attributes": entity.attributes,
        "expiresAt": entity.expires_at.to_rfc3339(),
    })
}

pub fn receipt_view(receipt: &WriteReceipt) -> Value {
    json!({
        "entityKey": receipt.entity_key,
        "txHash": receipt.tx_reference,
    })
}

pub fn batch_view(result: &BatchResult) -> Value {
    let accounts: Vec<Value> = result
        .accounts
        .iter()
        .map(|report| match &report.outcome {
            AccountOutcome::Success { receipt, entity } => json!({
                "index": report.index,
                "address": report.address,
                "status": "success",
                "receipt": receipt_view(receipt),
                "entity": entity_view(entity),
            }),
            AccountOutcome::Failure { error } => json!({
                "index": report.index,
                "address": report.address,
                "status": "failure",
                "error": error,
            }),
        })
        .collect();

    json!({
        "runId": result.run_id,
        "succeeded": result.succeeded(),
        "failed": result.failed(),
        "accounts": accounts,
    })
}

/// Reachability of the configured ledger.
pub fn health_view(
    network: &NetworkConfig,
    backend: &str,
    block_number: Option<u64>,
    healthy: bool,
) -> Value {
    json!({
        "network": network.name,
        "backend": backend,
        "rpcUrl": network.rpc_url,
        "chainId": network.chain_id,
        "blockNumber": block_number,
        "healthy": healthy,
    })
}

pub fn print(value: &Value) -> serde_json::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::types::AccountReport;
    use crate::entity::payload::{encode, ContentType};
    use crate::entity::types::Attribute;
    use crate::ledger::types::{EntityKey, TxReference};
    use alloy::primitives::B256;
    use chrono::{TimeDelta, Utc};
    use uuid::Uuid;

    fn entity() -> Entity {
        Entity {
            key: EntityKey(B256::repeat_byte(0xab)),
            payload: encode(&json!({"entity": {"entityId": "doc-0"}}), &ContentType::Json).unwrap(),
            attributes: vec![Attribute::new("category", "documentation")],
            expires_at: Utc::now() + TimeDelta::days(30),
        }
    }

    #[test]
    fn test_entity_view() {
        let view = entity_view(&entity());
        assert_eq!(view["contentType"], "application/json");
        assert_eq!(view["document"]["entity"]["entityId"], "doc-0");
        assert_eq!(view["attributes"][0]["key"], "category");
        assert!(view["key"].as_str().unwrap().starts_with("0xabab"));
    }

    #[test]
    fn test_batch_view_keeps_order_and_errors() {
        let receipt = WriteReceipt {
            entity_key: EntityKey(B256::repeat_byte(1)),
            tx_reference: TxReference(B256::repeat_byte(2)),
        };
        let result = BatchResult {
            run_id: Uuid::new_v4(),
            accounts: vec![
                AccountReport {
                    index: 0,
                    address: "a".into(),
                    outcome: AccountOutcome::Success { receipt, entity: entity() },
                },
                AccountReport {
                    index: 1,
                    address: "b".into(),
                    outcome: AccountOutcome::Failure { error: "Invalid secret: secret is empty".into() },
                },
            ],
        };

        let view = batch_view(&result);
        assert_eq!(view["succeeded"], 1);
        assert_eq!(view["failed"], 1);
        assert_eq!(view["accounts"][1]["address"], "b");
        assert_eq!(view["accounts"][1]["status"], "failure");
        assert!(view["accounts"][1]["error"].as_str().unwrap().contains("Invalid secret"));
    }

    #[test]
    fn test_health_view() {
        let view = health_view(&NetworkConfig::default(), "rpc", None, false);
        assert_eq!(view["chainId"], 31337);
        assert_eq!(view["backend"], "rpc");
        assert!(view["blockNumber"].is_null());
        assert_eq!(view["healthy"], false);
    }
}
