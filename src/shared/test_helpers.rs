#[cfg(test)]
use crate::core::error::{AppError, Result};
#[cfg(test)]
use crate::modules::api::ApiTransport;
#[cfg(test)]
use async_trait::async_trait;
#[cfg(test)]
use serde_json::Value;
#[cfg(test)]
use std::sync::Mutex;

/// Transport returning canned responses in order and recording request paths
#[cfg(test)]
pub struct MockTransport {
    responses: Mutex<Vec<Result<Value>>>,
    requests: Mutex<Vec<String>>,
}

#[cfg(test)]
impl MockTransport {
    pub fn new(responses: Vec<Result<Value>>) -> Self {
        Self {
            responses: Mutex::new(responses),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn ok(data: Value) -> Self {
        Self::new(vec![Ok(data)])
    }

    pub fn api_error(status: u16, message: &str) -> Self {
        Self::new(vec![Err(AppError::Api {
            status,
            code: None,
            message: message.to_string(),
        })])
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[cfg(test)]
#[async_trait]
impl ApiTransport for MockTransport {
    async fn get(&self, path: &str) -> Result<Value> {
        self.requests.lock().unwrap().push(path.to_string());
        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            return Err(AppError::Http(format!("No mock response for {}", path)));
        }
        responses.remove(0)
    }
}
