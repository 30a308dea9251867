//! Generic remote-entity capability shared by Apillon models.
//!
//! A model embeds a [`ModelBase`] (identifier and request-path prefix) and
//! implements [`ApillonModel`], which provides serialization into filter
//! maps and query strings. Models customise individual keys by overriding
//! [`ApillonModel::serialize_filter`] and deferring to
//! [`default_serialize_filter`] for everything else.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::core::error::{AppError, Result};

/// Keys that never leave the model when it is serialized
const EXCLUDED_KEYS: &[&str] = &["apiPrefix"];

/// Identifier storage shared by every remote entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelBase {
    uuid: String,
    api_prefix: String,
}

impl ModelBase {
    pub fn new(uuid: impl Into<String>, api_prefix: impl Into<String>) -> Self {
        Self {
            uuid: uuid.into(),
            api_prefix: api_prefix.into(),
        }
    }

    pub fn uuid(&self) -> &str {
        &self.uuid
    }

    pub fn api_prefix(&self) -> &str {
        &self.api_prefix
    }
}

/// Generic filter rule: drop internal keys and null values, keep the rest.
pub fn default_serialize_filter(key: &str, value: &Value) -> Option<Value> {
    if EXCLUDED_KEYS.contains(&key) || value.is_null() {
        return None;
    }
    Some(value.clone())
}

pub trait ApillonModel: Serialize {
    fn base(&self) -> &ModelBase;

    fn uuid(&self) -> &str {
        self.base().uuid()
    }

    fn api_prefix(&self) -> &str {
        self.base().api_prefix()
    }

    /// Decide how a single top-level field is emitted. `None` excludes it.
    fn serialize_filter(&self, key: &str, value: &Value) -> Option<Value> {
        default_serialize_filter(key, value)
    }

    /// Serialize the model into a flat map with the filter applied per key.
    fn serialize_map(&self) -> Result<Map<String, Value>> {
        let fields = match serde_json::to_value(self)? {
            Value::Object(fields) => fields,
            other => {
                return Err(AppError::Internal(format!(
                    "Model serialized to a non-object value: {}",
                    other
                )))
            }
        };

        Ok(fields
            .into_iter()
            .filter_map(|(key, value)| {
                self.serialize_filter(&key, &value)
                    .map(|filtered| (key, filtered))
            })
            .collect())
    }

    /// Build `key=value&...` query parameters from [`ApillonModel::serialize_map`].
    fn to_query_string(&self) -> Result<String> {
        let query = self
            .serialize_map()?
            .iter()
            .map(|(key, value)| {
                let value = match value {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                format!(
                    "{}={}",
                    urlencoding::encode(key),
                    urlencoding::encode(&value)
                )
            })
            .collect::<Vec<_>>()
            .join("&");
        Ok(query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    struct Bucket {
        #[serde(flatten)]
        base: ModelBase,
        name: Option<String>,
        size: Option<u64>,
    }

    impl ApillonModel for Bucket {
        fn base(&self) -> &ModelBase {
            &self.base
        }
    }

    fn bucket(name: Option<&str>) -> Bucket {
        Bucket {
            base: ModelBase::new("b-1", "/storage/buckets/b-1"),
            name: name.map(str::to_string),
            size: Some(1024),
        }
    }

    #[test]
    fn test_default_filter_excludes_prefix_and_nulls() {
        assert_eq!(default_serialize_filter("apiPrefix", &json!("/x")), None);
        assert_eq!(default_serialize_filter("name", &Value::Null), None);
        assert_eq!(
            default_serialize_filter("name", &json!("docs")),
            Some(json!("docs"))
        );
        assert_eq!(default_serialize_filter("size", &json!(0)), Some(json!(0)));
    }

    #[test]
    fn test_serialize_applies_filter() {
        let fields = bucket(None).serialize_map().unwrap();
        assert_eq!(fields.get("uuid"), Some(&json!("b-1")));
        assert_eq!(fields.get("size"), Some(&json!(1024)));
        assert!(!fields.contains_key("apiPrefix"));
        assert!(!fields.contains_key("name"));
    }

    #[test]
    fn test_to_query_string_encodes_values() {
        let query = bucket(Some("my docs")).to_query_string().unwrap();
        assert_eq!(query, "name=my%20docs&size=1024&uuid=b-1");
    }

    #[test]
    fn test_accessors_read_base() {
        let bucket = bucket(None);
        assert_eq!(bucket.uuid(), "b-1");
        assert_eq!(bucket.api_prefix(), "/storage/buckets/b-1");
    }
}
