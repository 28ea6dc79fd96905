use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;

use super::ChatBackend;
use crate::error::ChatError;
use crate::reply::reply_or_fallback;
use crate::state::ChatMessage;

pub const DEFAULT_ENDPOINT: &str = "https://loreal-worker.dombish.workers.dev/";

#[derive(Serialize)]
struct WorkerRequest<'a> {
    messages: &'a [ChatMessage],
}

/// Client for the deployed worker that proxies chat completions.
#[derive(Clone)]
pub struct WorkerClient {
    client: Client,
    endpoint: String,
}

impl WorkerClient {
    pub fn new(endpoint: &str) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.to_string(),
        }
    }

    /// POST the whole conversation and return the raw JSON body.
    pub async fn send(&self, messages: &[ChatMessage]) -> Result<Value, ChatError> {
        let request = WorkerRequest { messages };

        tracing::debug!(endpoint = %self.endpoint, messages = messages.len(), "sending chat request");

        let response = self.client
            .post(&self.endpoint)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ChatError::Status(status));
        }

        let body = response.bytes().await?;
        let value: Value = serde_json::from_slice(&body)?;
        tracing::debug!(%status, bytes = body.len(), "worker replied");
        Ok(value)
    }
}

#[async_trait]
impl ChatBackend for WorkerClient {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, ChatError> {
        let body = self.send(messages).await?;
        Ok(reply_or_fallback(&body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_body_shape() {
        let messages = vec![ChatMessage::system("sys"), ChatMessage::user("hi")];
        let body = serde_json::to_value(WorkerRequest { messages: &messages }).unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "messages": [
                    {"role": "system", "content": "sys"},
                    {"role": "user", "content": "hi"}
                ]
            })
        );
    }
}
