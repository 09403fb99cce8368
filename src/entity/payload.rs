//! Payload encoding and decoding.
//!
//! JSON documents are stored in a canonical form: the document is lowered to a
//! `serde_json::Value` first, so object keys come out sorted and the same
//! document always produces the same bytes.

use std::fmt;
use std::str::FromStr;

use alloy::primitives::Bytes;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::entity::finite::ensure_finite;
use crate::ledger::types::{EntityError, EntityResult};

/// Content type tag carried alongside a payload.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum ContentType {
    #[default]
    Json,
    Text,
    Other(String),
}

impl ContentType {
    pub fn as_str(&self) -> &str {
        match self {
            ContentType::Json => "application/json",
            ContentType::Text => "text/plain",
            ContentType::Other(s) => s,
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        Ok(match normalized.as_str() {
            "application/json" | "json" => ContentType::Json,
            "text/plain" | "text" => ContentType::Text,
            _ => ContentType::Other(s.trim().to_string()),
        })
    }
}

impl From<&str> for ContentType {
    fn from(s: &str) -> Self {
        match s.parse() {
            Ok(ct) => ct,
            Err(never) => match never {},
        }
    }
}

impl Serialize for ContentType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ContentType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(ContentType::from(s.as_str()))
    }
}

/// Encoded document bytes tagged with their content type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payload {
    pub content_type: ContentType,
    pub bytes: Bytes,
}

impl Payload {
    /// Decode the payload back into a document.
    pub fn decode<T: DeserializeOwned>(&self) -> EntityResult<T> {
        decode(&self.bytes, &self.content_type)
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Encode a document into its canonical byte form for `content_type`.
///
/// NaN and infinities are rejected; JSON has no form for them.
pub fn encode<T: Serialize + ?Sized>(document: &T, content_type: &ContentType) -> EntityResult<Payload> {
    ensure_finite(document)
        .map_err(|e| EntityError::Encoding(format!("document is not representable: {}", e)))?;
    let value = serde_json::to_value(document)
        .map_err(|e| EntityError::Encoding(format!("document is not representable: {}", e)))?;

    let bytes = match content_type {
        ContentType::Json => serde_json::to_vec(&value)
            .map_err(|e| EntityError::Encoding(format!("JSON serialization failed: {}", e)))?,
        ContentType::Text => match value {
            Value::String(text) => text.into_bytes(),
            other => {
                return Err(EntityError::Encoding(format!(
                    "text/plain requires a string document, got {}",
                    json_kind(&other)
                )))
            }
        },
        ContentType::Other(tag) => {
            return Err(EntityError::Encoding(format!(
                "no canonical encoding for content type '{}'",
                tag
            )))
        }
    };

    Ok(Payload {
        content_type: content_type.clone(),
        bytes: Bytes::from(bytes),
    })
}

/// Decode bytes produced by [`encode`] for the same content type.
pub fn decode<T: DeserializeOwned>(bytes: &[u8], content_type: &ContentType) -> EntityResult<T> {
    let value = match content_type {
        ContentType::Json => serde_json::from_slice::<Value>(bytes)
            .map_err(|e| EntityError::Encoding(format!("invalid JSON payload: {}", e)))?,
        ContentType::Text => {
            let text = std::str::from_utf8(bytes)
                .map_err(|e| EntityError::Encoding(format!("invalid UTF-8 payload: {}", e)))?;
            Value::String(text.to_string())
        }
        ContentType::Other(tag) => {
            return Err(EntityError::Encoding(format!(
                "cannot decode content type '{}'",
                tag
            )))
        }
    };

    serde_json::from_value(value)
        .map_err(|e| EntityError::Encoding(format!("payload does not match document type: {}", e)))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;

    fn sample_document() -> Value {
        json!({
            "entity": {
                "entityType": "document",
                "entityId": "doc-123",
                "entityContent": "Hello World! This is my first document stored on Arkiv.",
            },
            "tags": ["a", "b", null, true, 1.5, -7, {"nested": [[], {}]}],
            "big": 18446744073709551615u64,
            "ratio": 0.1,
        })
    }

    #[test]
    fn test_json_round_trip() {
        let doc = sample_document();
        let payload = encode(&doc, &ContentType::Json).unwrap();
        let decoded: Value = payload.decode().unwrap();
        assert_eq!(decoded, doc);
    }

    #[test]
    fn test_scalar_documents_round_trip() {
        for doc in [json!(null), json!(false), json!(0), json!("plain"), json!([])] {
            let payload = encode(&doc, &ContentType::Json).unwrap();
            assert_eq!(decode::<Value>(&payload.bytes, &ContentType::Json).unwrap(), doc);
        }
    }

    #[test]
    fn test_json_encoding_is_canonical() {
        let a = json!({"b": 1, "a": {"d": 2, "c": 3}});
        let payload = encode(&a, &ContentType::Json).unwrap();
        assert_eq!(&payload.bytes[..], br#"{"a":{"c":3,"d":2},"b":1}"#);
    }

    #[test]
    fn test_text_round_trip() {
        let payload = encode("héllo", &ContentType::Text).unwrap();
        assert_eq!(&payload.bytes[..], "héllo".as_bytes());
        let decoded: String = payload.decode().unwrap();
        assert_eq!(decoded, "héllo");
    }

    #[test]
    fn test_text_rejects_structured_document() {
        let err = encode(&json!({"a": 1}), &ContentType::Text).unwrap_err();
        assert!(matches!(err, EntityError::Encoding(_)));
        assert!(err.to_string().contains("object"));
    }

    #[test]
    fn test_unrepresentable_map_keys() {
        let mut doc = HashMap::new();
        doc.insert((1, 2), "tuple keys have no JSON form");
        let err = encode(&doc, &ContentType::Json).unwrap_err();
        assert!(matches!(err, EntityError::Encoding(_)));
    }

    #[derive(Serialize)]
    struct Measurement {
        ratio: f64,
    }

    #[test]
    fn test_non_finite_numbers_are_rejected() {
        for ratio in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let err = encode(&Measurement { ratio }, &ContentType::Json).unwrap_err();
            assert!(matches!(err, EntityError::Encoding(_)));
            assert!(err.to_string().contains("ratio"));

            let err = encode(&ratio, &ContentType::Json).unwrap_err();
            assert!(matches!(err, EntityError::Encoding(_)));
        }
        assert!(encode(&Measurement { ratio: 0.25 }, &ContentType::Json).is_ok());
    }

    #[test]
    fn test_unknown_content_type() {
        let ct = ContentType::from("application/x-custom");
        assert_eq!(ct, ContentType::Other("application/x-custom".into()));
        assert!(encode(&json!(1), &ct).is_err());
    }

    #[test]
    fn test_content_type_parsing() {
        assert_eq!(ContentType::from("Application/JSON"), ContentType::Json);
        assert_eq!(ContentType::from("text/plain"), ContentType::Text);
        assert_eq!(ContentType::Json.to_string(), "application/json");
    }
}
