//! Chat-completion client for OpenAI-compatible endpoints.
//!
//! One call sends one user message and returns the content of the first
//! choice. Every way the call can fail to produce that content maps to the
//! transport error class; interpreting the content is the caller's job.

use std::time::{Duration, Instant};

use crate::config::Config;
use crate::credential::ApiKey;
use crate::debug_time;
use crate::error::{Result, ScigradeError};

#[derive(Debug, Clone)]
pub struct ChatClient {
    http: reqwest::Client,
    url: String,
    model: String,
    timeout: Duration,
}

impl ChatClient {
    pub fn new(config: &Config) -> Result<Self> {
        let timeout = config.timeout();
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ScigradeError::Other(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            url: config.completions_url(),
            model: config.model.clone(),
            timeout,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send `prompt` as a single user message and return the reply text.
    pub async fn complete(&self, api_key: &ApiKey, prompt: &str) -> Result<String> {
        let start = Instant::now();

        let request_body = serde_json::json!({
            "model": self.model,
            "messages": [
                {
                    "role": "user",
                    "content": prompt
                }
            ],
        });

        tracing::debug!(url = %self.url, model = %self.model, prompt_len = prompt.len(), "completion_request");

        let response = self
            .http
            .post(&self.url)
            .header("Authorization", format!("Bearer {}", api_key.expose()))
            .json(&request_body)
            .send()
            .await
            .map_err(|e| ScigradeError::from_reqwest(&self.url, self.timeout, e))?;

        let status = response.status();
        debug_time!(start, "completion_response", status = status.as_u16());

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ScigradeError::HttpStatus {
                status: status.as_u16(),
                body,
            });
        }

        let response_json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| ScigradeError::from_reqwest(&self.url, self.timeout, e))?;

        let content = response_json
            .pointer("/choices/0/message/content")
            .and_then(|c| c.as_str())
            .ok_or_else(|| {
                ScigradeError::MalformedEnvelope(
                    "missing choices[0].message.content".to_string(),
                )
            })?;

        Ok(content.to_string())
    }
}
