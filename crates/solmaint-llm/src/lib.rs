//! Solmaint LLM Provider Layer
//!
//! Implementations of the `LlmProvider` trait from `solmaint-domain`.
//!
//! # Providers
//!
//! - `MockProvider`: Deterministic mock for testing
//! - `AnthropicProvider`: Anthropic Messages API over HTTP
//!
//! # Examples
//!
//! ```
//! use solmaint_llm::MockProvider;
//! use solmaint_domain::traits::LlmProvider;
//!
//! let provider = MockProvider::new(r#"{"supplier_name": "SolarTech Inc"}"#);
//! let result = provider.generate("test prompt").unwrap();
//! assert!(result.contains("SolarTech"));
//! ```

#![warn(missing_docs)]

pub mod anthropic;

use solmaint_domain::traits::LlmProvider as LlmProviderTrait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use thiserror::Error;

pub use anthropic::AnthropicProvider;

/// Errors that can occur during LLM operations
#[derive(Error, Debug)]
pub enum LlmError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Invalid response from LLM
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// No API key configured
    #[error("Missing API key: set {0}")]
    MissingApiKey(&'static str),

    /// Generic error
    #[error("LLM error: {0}")]
    Other(String),
}

#[derive(Debug, Clone)]
enum MockReply {
    Text(String),
    Error(String),
}

#[derive(Debug, Default)]
struct MockState {
    replies: HashMap<String, MockReply>,
    call_count: usize,
    last_prompt: Option<String>,
}

/// Mock LLM provider for deterministic testing
///
/// Returns pre-configured responses without making any network calls. Prompts
/// are matched by substring, so tests can key a reply on e.g. the document
/// text embedded in a larger extraction prompt.
///
/// # Examples
///
/// ```
/// use solmaint_llm::MockProvider;
/// use solmaint_domain::traits::LlmProvider;
///
/// let mut provider = MockProvider::new("fallback");
/// provider.add_response("INV-5000", r#"{"product_code": "INV-5000"}"#);
/// assert!(provider.generate("... INV-5000 ...").unwrap().contains("INV-5000"));
/// assert_eq!(provider.generate("other").unwrap(), "fallback");
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    default_response: String,
    model_name: String,
    state: Arc<Mutex<MockState>>,
}

impl MockProvider {
    /// Create a new MockProvider with a fixed response for all prompts
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: response.into(),
            model_name: "mock".to_string(),
            state: Arc::new(Mutex::new(MockState::default())),
        }
    }

    /// Report a different model name
    pub fn with_model_name(mut self, model_name: impl Into<String>) -> Self {
        self.model_name = model_name.into();
        self
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Reply with `response` whenever the prompt contains `needle`
    pub fn add_response(&mut self, needle: impl Into<String>, response: impl Into<String>) {
        self.state()
            .replies
            .insert(needle.into(), MockReply::Text(response.into()));
    }

    /// Fail whenever the prompt contains `needle`
    pub fn add_error(&mut self, needle: impl Into<String>, message: impl Into<String>) {
        self.state()
            .replies
            .insert(needle.into(), MockReply::Error(message.into()));
    }

    /// Get the number of times generate was called
    pub fn call_count(&self) -> usize {
        self.state().call_count
    }

    /// The most recent prompt received
    pub fn last_prompt(&self) -> Option<String> {
        self.state().last_prompt.clone()
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("{}")
    }
}

impl LlmProviderTrait for MockProvider {
    type Error = LlmError;

    fn generate(&self, prompt: &str) -> Result<String, Self::Error> {
        let mut state = self.state();
        state.call_count += 1;
        state.last_prompt = Some(prompt.to_string());

        // Longest matching needle wins so overlapping keys stay deterministic
        let reply = state
            .replies
            .iter()
            .filter(|(needle, _)| prompt.contains(needle.as_str()))
            .max_by_key(|(needle, _)| needle.len())
            .map(|(_, reply)| reply.clone());

        match reply {
            Some(MockReply::Text(text)) => Ok(text),
            Some(MockReply::Error(message)) => Err(LlmError::Other(message)),
            None => Ok(self.default_response.clone()),
        }
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_provider_default() {
        let provider = MockProvider::new("Test response");
        assert_eq!(provider.generate("any prompt").unwrap(), "Test response");
        assert_eq!(provider.model_name(), "mock");
    }

    #[test]
    fn test_mock_provider_specific_responses() {
        let mut provider = MockProvider::default();
        provider.add_response("hello", "world");
        provider.add_response("foo", "bar");

        assert_eq!(provider.generate("say hello").unwrap(), "world");
        assert_eq!(provider.generate("foo?").unwrap(), "bar");
        assert_eq!(provider.generate("unknown").unwrap(), "{}");
    }

    #[test]
    fn test_mock_provider_longest_needle_wins() {
        let mut provider = MockProvider::default();
        provider.add_response("a.pdf", "short");
        provider.add_response("a.pdf v2", "long");

        assert_eq!(provider.generate("doc a.pdf v2").unwrap(), "long");
        assert_eq!(provider.generate("doc a.pdf").unwrap(), "short");
    }

    #[test]
    fn test_mock_provider_call_count_and_last_prompt() {
        let provider = MockProvider::new("test");
        assert_eq!(provider.call_count(), 0);
        assert!(provider.last_prompt().is_none());

        provider.generate("prompt1").unwrap();
        provider.generate("prompt2").unwrap();
        assert_eq!(provider.call_count(), 2);
        assert_eq!(provider.last_prompt().as_deref(), Some("prompt2"));
    }

    #[test]
    fn test_mock_provider_error() {
        let mut provider = MockProvider::default();
        provider.add_error("bad prompt", "boom");

        let result = provider.generate("a bad prompt");
        assert!(matches!(result, Err(LlmError::Other(ref m)) if m == "boom"));
    }

    #[test]
    fn test_mock_provider_clone_shares_state() {
        let provider1 = MockProvider::new("test").with_model_name("claude-test");
        let provider2 = provider1.clone();

        provider1.generate("test").unwrap();

        assert_eq!(provider1.call_count(), 1);
        assert_eq!(provider2.call_count(), 1);
        assert_eq!(provider2.model_name(), "claude-test");
    }
}
