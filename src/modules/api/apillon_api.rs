use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::StatusCode;
use serde_json::Value;

use super::{ApiEnvelope, ApiErrorBody, ApiTransport};
use crate::core::config::ApillonConfig;
use crate::core::error::{AppError, Result};

/// reqwest-backed transport for the Apillon REST API
pub struct ApillonApi {
    client: reqwest::Client,
    api_url: String,
}

impl ApillonApi {
    pub fn new(config: &ApillonConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let mut authorization = HeaderValue::from_str(&config.authorization())
            .map_err(|e| AppError::Config(format!("Invalid API credentials: {}", e)))?;
        authorization.set_sensitive(true);
        headers.insert(AUTHORIZATION, authorization);

        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_url: config.api_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    pub(crate) fn url_for(&self, path: &str) -> String {
        format!("{}/{}", self.api_url, path.trim_start_matches('/'))
    }

    /// Turn a non-success response body into an [`AppError::Api`],
    /// keeping Apillon's error code and message when the body parses.
    pub(crate) fn api_error(status: StatusCode, body: &str) -> AppError {
        let parsed: Option<ApiErrorBody> = serde_json::from_str(body).ok();
        let code = parsed.as_ref().and_then(|b| b.code);
        let message = parsed
            .and_then(|b| b.message)
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| {
                if body.is_empty() {
                    status
                        .canonical_reason()
                        .unwrap_or("Unknown error")
                        .to_string()
                } else {
                    body.to_string()
                }
            });

        AppError::Api {
            status: status.as_u16(),
            code,
            message,
        }
    }
}

#[async_trait]
impl ApiTransport for ApillonApi {
    async fn get(&self, path: &str) -> Result<Value> {
        let url = self.url_for(path);
        tracing::debug!("GET {}", url);

        let response = self.client.get(&url).send().await.map_err(|e| {
            tracing::warn!("Apillon request failed: {:?}", e);
            AppError::Http(format!("GET {} failed: {}", path, e))
        })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AppError::Http(format!("Failed to read response body: {}", e)))?;

        if !status.is_success() {
            tracing::warn!("Apillon returned status {} for {}", status, path);
            return Err(Self::api_error(status, &body));
        }

        let envelope: ApiEnvelope<Value> = serde_json::from_str(&body).map_err(|e| {
            AppError::Decode(format!("Unexpected response body for {}: {}", path, e))
        })?;

        Ok(envelope.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// Serve one canned HTTP response on a local port and hand back the
    /// raw request head that was received.
    async fn serve_once(
        status_line: &'static str,
        body: &'static str,
    ) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }

            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
            String::from_utf8_lossy(&request).to_string()
        });

        (url, handle)
    }

    fn api_at(url: &str) -> ApillonApi {
        let config = ApillonConfig::new("key", "secret").with_api_url(url);
        ApillonApi::new(&config).unwrap()
    }

    fn api() -> ApillonApi {
        let config = ApillonConfig::new("key", "secret").with_api_url("http://localhost:6002/");
        ApillonApi::new(&config).unwrap()
    }

    #[test]
    fn test_url_for_joins_path() {
        let api = api();
        assert_eq!(api.api_url(), "http://localhost:6002");
        assert_eq!(
            api.url_for("/storage/b/file/f/detail"),
            "http://localhost:6002/storage/b/file/f/detail"
        );
    }

    #[test]
    fn test_api_error_uses_error_body() {
        let body = r#"{"id":"x","code":40406005,"message":"FILE_NOT_FOUND","status":404}"#;
        match ApillonApi::api_error(StatusCode::NOT_FOUND, body) {
            AppError::Api {
                status,
                code,
                message,
            } => {
                assert_eq!(status, 404);
                assert_eq!(code, Some(40406005));
                assert_eq!(message, "FILE_NOT_FOUND");
            }
            other => panic!("Expected AppError::Api, got: {:?}", other),
        }
    }

    #[test]
    fn test_api_error_falls_back_to_reason() {
        match ApillonApi::api_error(StatusCode::BAD_GATEWAY, "") {
            AppError::Api { code, message, .. } => {
                assert_eq!(code, None);
                assert_eq!(message, "Bad Gateway");
            }
            other => panic!("Expected AppError::Api, got: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unreachable_host_is_fetch_failure() {
        let config = ApillonConfig::new("key", "secret").with_api_url("http://127.0.0.1:9");
        let api = ApillonApi::new(&config).unwrap();
        let err = api.get("/storage/b/file/f/detail").await.unwrap_err();
        assert!(matches!(err, AppError::Http(_)));
        assert!(err.is_fetch_failure());
    }

    #[tokio::test]
    async fn test_get_unwraps_envelope() {
        let (url, server) = serve_once(
            "200 OK",
            r#"{"id":"req-1","status":200,"data":{"name":"a.txt","fileStatus":2,"CID":"Qm123"}}"#,
        )
        .await;

        let data = api_at(&url).get("/storage/b/file/f/detail").await.unwrap();
        assert_eq!(data["name"], "a.txt");
        assert_eq!(data["fileStatus"], 2);
        assert_eq!(data["CID"], "Qm123");

        let request = server.await.unwrap();
        assert!(request.starts_with("GET /storage/b/file/f/detail HTTP/1.1"));
        let expected_auth = ApillonConfig::new("key", "secret").authorization();
        assert!(request
            .to_lowercase()
            .contains(&format!("authorization: {}", expected_auth).to_lowercase()));
    }

    #[tokio::test]
    async fn test_get_non_success_status_is_api_error() {
        let (url, server) = serve_once(
            "404 Not Found",
            r#"{"id":"req-2","code":40406005,"message":"FILE_NOT_FOUND","status":404}"#,
        )
        .await;

        let err = api_at(&url).get("/storage/b/file/f/detail").await.unwrap_err();
        match err {
            AppError::Api {
                status,
                code,
                ref message,
            } => {
                assert_eq!(status, 404);
                assert_eq!(code, Some(40406005));
                assert_eq!(message, "FILE_NOT_FOUND");
            }
            ref other => panic!("Expected AppError::Api, got: {:?}", other),
        }
        assert!(err.is_fetch_failure());
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_get_body_without_envelope_is_decode_error() {
        let (url, server) = serve_once("200 OK", r#"{"name":"a.txt"}"#).await;

        let err = api_at(&url).get("/storage/b/file/f/detail").await.unwrap_err();
        assert!(matches!(err, AppError::Decode(_)));
        server.await.unwrap();
    }
}
