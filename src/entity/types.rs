//! Entity data model.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::entity::payload::Payload;
use crate::ledger::types::{EntityError, EntityKey, EntityResult};

/// Named string tag attached to an entity. Names need not be unique.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Attribute {
    pub key: String,
    pub value: String,
}

impl Attribute {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

impl std::str::FromStr for Attribute {
    type Err = EntityError;

    /// Parse `key=value`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (key, value) = s.split_once('=').ok_or_else(|| {
            EntityError::InvalidAttribute(format!("'{}' is not in key=value form", s))
        })?;
        Ok(Self::new(key.trim(), value))
    }
}

/// Check that every attribute has a usable name.
///
/// Order and duplicates are preserved as given; nothing is normalized.
pub fn validate_attributes(attributes: &[Attribute]) -> EntityResult<()> {
    for (i, attr) in attributes.iter().enumerate() {
        if attr.key.is_empty() {
            return Err(EntityError::InvalidAttribute(format!(
                "attribute #{} has an empty name",
                i
            )));
        }
        if attr.key.chars().any(char::is_control) {
            return Err(EntityError::InvalidAttribute(format!(
                "attribute #{} name {:?} contains control characters",
                i, attr.key
            )));
        }
    }
    Ok(())
}

/// A stored record: payload, attributes and expiration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    pub key: EntityKey,
    pub payload: Payload,
    pub attributes: Vec<Attribute>,
    pub expires_at: DateTime<Utc>,
}

impl Entity {
    /// Decode the payload into a document.
    pub fn document<T: DeserializeOwned>(&self) -> EntityResult<T> {
        self.payload.decode()
    }

    /// Values of every attribute named `key`, in stored order.
    pub fn attribute_values<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.attributes
            .iter()
            .filter(move |a| a.key == key)
            .map(|a| a.value.as_str())
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::payload::{encode, ContentType};
    use alloy::primitives::B256;
    use chrono::TimeDelta;

    #[test]
    fn test_attribute_parse() {
        let attr: Attribute = "category=documentation".parse().unwrap();
        assert_eq!(attr, Attribute::new("category", "documentation"));

        let attr: Attribute = "expr=a=b".parse().unwrap();
        assert_eq!(attr.value, "a=b");

        assert!("no-separator".parse::<Attribute>().is_err());
    }

    #[test]
    fn test_duplicate_names_are_allowed() {
        let attrs = vec![
            Attribute::new("tag", "a"),
            Attribute::new("tag", "b"),
            Attribute::new("other", ""),
        ];
        assert!(validate_attributes(&attrs).is_ok());
    }

    #[test]
    fn test_invalid_attribute_names() {
        let err = validate_attributes(&[Attribute::new("", "x")]).unwrap_err();
        assert!(matches!(err, EntityError::InvalidAttribute(_)));

        let err = validate_attributes(&[Attribute::new("ok", "1"), Attribute::new("bad\n", "2")])
            .unwrap_err();
        assert!(err.to_string().contains("#1"));
    }

    #[test]
    fn test_entity_helpers() {
        let now = Utc::now();
        let entity = Entity {
            key: EntityKey(B256::repeat_byte(1)),
            payload: encode(&serde_json::json!({"id": 7}), &ContentType::Json).unwrap(),
            attributes: vec![Attribute::new("tag", "a"), Attribute::new("tag", "b")],
            expires_at: now + TimeDelta::seconds(10),
        };

        let doc: serde_json::Value = entity.document().unwrap();
        assert_eq!(doc["id"], 7);
        assert_eq!(entity.attribute_values("tag").collect::<Vec<_>>(), vec!["a", "b"]);
        assert!(!entity.is_expired_at(now));
        assert!(entity.is_expired_at(now + TimeDelta::seconds(10)));
    }
}
