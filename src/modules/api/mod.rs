//! Apillon API transport
//!
//! Every request against the Apillon REST backend goes through the
//! [`ApiTransport`] trait. Models hold a shared handle to a transport and
//! never build HTTP requests themselves, which lets tests swap in a mock.

mod apillon_api;

pub use apillon_api::ApillonApi;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::error::Result;

/// Success envelope wrapping every Apillon response body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub status: Option<u16>,
    pub data: T,
}

/// Error body returned by Apillon for non-success responses
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub code: Option<i64>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub status: Option<u16>,
}

#[async_trait]
pub trait ApiTransport: Send + Sync {
    /// Issue an authenticated GET for `path` (relative to the API base URL)
    /// and return the `data` payload of the response envelope.
    async fn get(&self, path: &str) -> Result<Value>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_deserializes_data() {
        let body = r#"{"id":"abc","status":200,"data":{"name":"a.txt"}}"#;
        let envelope: ApiEnvelope<Value> = serde_json::from_str(body).unwrap();
        assert_eq!(envelope.status, Some(200));
        assert_eq!(envelope.data["name"], "a.txt");
    }

    #[test]
    fn test_envelope_requires_data() {
        let body = r#"{"id":"abc","status":200}"#;
        assert!(serde_json::from_str::<ApiEnvelope<Value>>(body).is_err());
    }

    #[test]
    fn test_error_body_tolerates_missing_fields() {
        let body = r#"{"code":40406002,"message":"FILE_NOT_FOUND"}"#;
        let error: ApiErrorBody = serde_json::from_str(body).unwrap();
        assert_eq!(error.code, Some(40406002));
        assert_eq!(error.message.as_deref(), Some("FILE_NOT_FOUND"));
        assert!(error.path.is_none());
    }
}
