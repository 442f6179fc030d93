//! Anthropic Provider Implementation
//!
//! Sends prompts to the Anthropic Messages API and returns the text of the
//! first assistant turn.
//!
//! # Features
//!
//! - Async HTTP communication via `reqwest`
//! - Configurable endpoint, model, token limit and timeout
//! - Retry logic with exponential backoff for transient failures
//!
//! # Examples
//!
//! ```no_run
//! use solmaint_llm::AnthropicProvider;
//!
//! let provider = AnthropicProvider::from_env("claude-3-sonnet-20240229").unwrap();
//! ```

use crate::LlmError;
use serde::{Deserialize, Serialize};
use solmaint_domain::traits::LlmProvider as LlmProviderTrait;
use std::time::Duration;
use tracing::{debug, warn};

/// Default Anthropic API endpoint
pub const DEFAULT_ENDPOINT: &str = "https://api.anthropic.com";

/// Environment variable holding the API key
pub const API_KEY_ENV: &str = "ANTHROPIC_API_KEY";

/// API version header value
pub const API_VERSION: &str = "2023-06-01";

/// Default completion budget
pub const DEFAULT_MAX_TOKENS: u32 = 4096;

/// Default timeout for LLM requests (120 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Default number of retry attempts
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Anthropic Messages API provider
pub struct AnthropicProvider {
    endpoint: String,
    model: String,
    api_key: String,
    max_tokens: u32,
    client: reqwest::Client,
    max_retries: u32,
}

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: [Message<'a>; 1],
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

impl MessagesResponse {
    /// Concatenate the text blocks of the reply
    fn into_text(self) -> Result<String, LlmError> {
        let text: String = self
            .content
            .into_iter()
            .filter(|block| block.kind == "text")
            .filter_map(|block| block.text)
            .collect();
        if text.trim().is_empty() {
            return Err(LlmError::InvalidResponse(
                "response contained no text content".to_string(),
            ));
        }
        Ok(text)
    }
}

impl AnthropicProvider {
    /// Create a new provider
    ///
    /// # Parameters
    ///
    /// - `api_key`: Anthropic API key
    /// - `model`: Model identifier (e.g., "claude-3-sonnet-20240229")
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Result<Self, LlmError> {
        Ok(Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: model.into(),
            api_key: api_key.into(),
            max_tokens: DEFAULT_MAX_TOKENS,
            client: build_client(Duration::from_secs(DEFAULT_TIMEOUT_SECS))?,
            max_retries: DEFAULT_MAX_RETRIES,
        })
    }

    /// Create a provider with the key from `ANTHROPIC_API_KEY`
    pub fn from_env(model: impl Into<String>) -> Result<Self, LlmError> {
        let api_key = std::env::var(API_KEY_ENV)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or(LlmError::MissingApiKey(API_KEY_ENV))?;
        Self::new(api_key, model)
    }

    /// Point at a different endpoint (proxies, test servers)
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the maximum number of retry attempts
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries.max(1);
        self
    }

    /// Set the completion token budget
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Set the per-request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self, LlmError> {
        self.client = build_client(timeout)?;
        Ok(self)
    }

    /// Send `prompt` as a single user message
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - The API is unreachable after all retries
    /// - The model is unknown
    /// - The response has no text content
    pub async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        let url = format!("{}/v1/messages", self.endpoint);
        let body = MessagesRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            messages: [Message {
                role: "user",
                content: prompt,
            }],
        };

        let mut attempts = 0;
        let mut last_error = None;

        while attempts < self.max_retries {
            debug!(attempt = attempts + 1, model = %self.model, "Sending messages request");
            match self
                .client
                .post(&url)
                .header("x-api-key", &self.api_key)
                .header("anthropic-version", API_VERSION)
                .json(&body)
                .send()
                .await
            {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        return response
                            .json::<MessagesResponse>()
                            .await
                            .map_err(|e| {
                                LlmError::InvalidResponse(format!("Failed to parse response: {}", e))
                            })?
                            .into_text();
                    } else if status == reqwest::StatusCode::NOT_FOUND {
                        return Err(LlmError::ModelNotAvailable(self.model.clone()));
                    } else if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                        last_error = Some(LlmError::RateLimitExceeded);
                    } else if status.is_client_error() {
                        // 4xx other than 404/429 will not succeed on retry
                        let error_text = response
                            .text()
                            .await
                            .unwrap_or_else(|_| "Unknown error".to_string());
                        return Err(LlmError::Communication(format!(
                            "HTTP {}: {}",
                            status, error_text
                        )));
                    } else {
                        let error_text = response
                            .text()
                            .await
                            .unwrap_or_else(|_| "Unknown error".to_string());
                        last_error = Some(LlmError::Communication(format!(
                            "HTTP {}: {}",
                            status, error_text
                        )));
                    }
                }
                Err(e) => {
                    last_error = Some(LlmError::Communication(format!("Request failed: {}", e)));
                }
            }

            attempts += 1;
            if attempts < self.max_retries {
                // Exponential backoff: 1s, 2s, 4s, etc.
                let delay = Duration::from_secs(2u64.pow(attempts - 1));
                warn!(attempt = attempts, ?delay, "LLM request failed, retrying");
                tokio::time::sleep(delay).await;
            }
        }

        Err(last_error
            .unwrap_or_else(|| LlmError::Communication("Max retries exceeded".to_string())))
    }
}

fn build_client(timeout: Duration) -> Result<reqwest::Client, LlmError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| LlmError::Other(format!("Failed to build HTTP client: {}", e)))
}

impl LlmProviderTrait for AnthropicProvider {
    type Error = LlmError;

    fn generate(&self, prompt: &str) -> Result<String, Self::Error> {
        // Blocking wrapper: reuse the caller's runtime from a blocking thread,
        // or spin up a private one when called outside any runtime
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle.block_on(self.complete(prompt)),
            Err(_) => tokio::runtime::Runtime::new()
                .map_err(|e| LlmError::Other(format!("Failed to start runtime: {}", e)))?
                .block_on(self.complete(prompt)),
        }
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anthropic_provider_creation() {
        let provider = AnthropicProvider::new("key", "claude-3-sonnet-20240229").unwrap();
        assert_eq!(provider.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(provider.model, "claude-3-sonnet-20240229");
        assert_eq!(provider.max_retries, DEFAULT_MAX_RETRIES);
        assert_eq!(provider.max_tokens, DEFAULT_MAX_TOKENS);
        assert_eq!(provider.model_name(), "claude-3-sonnet-20240229");
    }

    #[test]
    fn test_anthropic_provider_builders() {
        let provider = AnthropicProvider::new("key", "m")
            .unwrap()
            .with_endpoint("http://localhost:8080/")
            .with_max_retries(5)
            .with_max_tokens(512);
        assert_eq!(provider.endpoint, "http://localhost:8080");
        assert_eq!(provider.max_retries, 5);
        assert_eq!(provider.max_tokens, 512);

        let provider = provider.with_max_retries(0);
        assert_eq!(provider.max_retries, 1);
    }

    #[test]
    fn test_request_body_shape() {
        let body = MessagesRequest {
            model: "m",
            max_tokens: 10,
            messages: [Message {
                role: "user",
                content: "hi",
            }],
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "model": "m",
                "max_tokens": 10,
                "messages": [{"role": "user", "content": "hi"}]
            })
        );
    }

    #[test]
    fn test_response_text_extraction() {
        let response: MessagesResponse = serde_json::from_str(
            r#"{"content": [{"type": "text", "text": "{\"a\": "}, {"type": "text", "text": "1}"}]}"#,
        )
        .unwrap();
        assert_eq!(response.into_text().unwrap(), r#"{"a": 1}"#);
    }

    #[test]
    fn test_response_without_text_is_invalid() {
        let response: MessagesResponse =
            serde_json::from_str(r#"{"content": [{"type": "tool_use", "id": "x"}]}"#).unwrap();
        assert!(matches!(
            response.into_text(),
            Err(LlmError::InvalidResponse(_))
        ));
    }

    #[tokio::test]
    async fn test_anthropic_error_handling() {
        // Unroutable port to trigger a transport error
        let provider = AnthropicProvider::new("key", "m")
            .unwrap()
            .with_endpoint("http://localhost:99999")
            .with_max_retries(1);

        let result = provider.complete("test").await;
        assert!(matches!(result, Err(LlmError::Communication(_))));
    }

    #[test]
    #[ignore] // Only run with a real key
    fn test_anthropic_generate_integration() {
        let provider = AnthropicProvider::from_env("claude-3-sonnet-20240229").unwrap();
        let response = provider.generate("Say 'hello' and nothing else").unwrap();
        assert!(!response.is_empty());
    }
}
