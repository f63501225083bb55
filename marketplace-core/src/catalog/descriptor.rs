//! App descriptor (app.json)
//!
//! Descriptors are kept as raw JSON objects so unknown fields pass through
//! to the catalog untouched and in their original order.

use chrono::NaiveDate;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

/// Date format of `date_added`
pub(crate) const DATE_FORMAT: &str = "%Y-%m-%d";

/// A parsed app.json object
#[derive(Debug, Clone, PartialEq)]
pub struct Descriptor {
    fields: Map<String, Value>,
}

impl Descriptor {
    /// Wrap a JSON value; anything but an object is rejected
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(fields) => Some(Self { fields }),
            _ => None,
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// Set a field. An existing key keeps its position.
    pub fn insert(&mut self, key: &str, value: Value) {
        self.fields.insert(key.to_string(), value);
    }

    pub fn id(&self) -> Option<&str> {
        self.get("id").and_then(Value::as_str)
    }

    pub fn name(&self) -> Option<&str> {
        self.get("name").and_then(Value::as_str)
    }

    /// `date_added`, if present and well-formed
    pub fn date_added(&self) -> Option<NaiveDate> {
        self.get("date_added")
            .and_then(Value::as_str)
            .and_then(|s| NaiveDate::parse_from_str(s, DATE_FORMAT).ok())
    }

    /// `rank`, if present and an integer
    pub fn rank(&self) -> Option<i64> {
        self.get("rank").and_then(Value::as_i64)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }
}

impl Serialize for Descriptor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.fields.serialize(serializer)
    }
}

#[cfg(test)]
mod descriptor_tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_rejects_non_object() {
        assert!(Descriptor::from_value(json!(["chat"])).is_none());
        assert!(Descriptor::from_value(json!("app")).is_none());
        assert!(Descriptor::from_value(json!({})).is_some());
    }

    #[test]
    fn test_typed_accessors() {
        let descriptor = Descriptor::from_value(json!({
            "id": "n8n",
            "name": "n8n",
            "date_added": "2024-06-01",
            "rank": 3
        }))
        .unwrap();

        assert_eq!(descriptor.id(), Some("n8n"));
        assert_eq!(
            descriptor.date_added(),
            NaiveDate::from_ymd_opt(2024, 6, 1)
        );
        assert_eq!(descriptor.rank(), Some(3));
    }

    #[test]
    fn test_malformed_values_read_as_absent() {
        let descriptor = Descriptor::from_value(json!({
            "id": 42,
            "date_added": "June 1st",
            "rank": "first"
        }))
        .unwrap();

        assert_eq!(descriptor.id(), None);
        assert_eq!(descriptor.date_added(), None);
        assert_eq!(descriptor.rank(), None);
    }

    #[test]
    fn test_insert_keeps_key_position() {
        let mut descriptor = Descriptor::from_value(json!({
            "logo": "mine.png",
            "id": "x"
        }))
        .unwrap();

        descriptor.insert("logo", json!("https://example.com/logo.png"));
        descriptor.insert("pinned", json!(false));

        let keys: Vec<&String> = descriptor.fields().keys().collect();
        assert_eq!(keys, vec!["logo", "id", "pinned"]);
    }
}
