//! Provider trait and factory for completion backends

use async_trait::async_trait;

use crate::config::Config;
use crate::llm::{
    errors::{LlmError, LlmResult},
    openai::OpenAIProvider,
    types::CompletionRequest,
};

/// Trait for completion backends.
///
/// The engine only talks to this trait, so a different transport can be
/// plugged in without touching the orchestration code.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Send one completion request and return the first reply verbatim
    async fn complete(&self, request: CompletionRequest) -> LlmResult<String>;

    /// Get the provider name
    fn name(&self) -> &str;
}

/// Factory for creating providers
pub struct ProviderFactory;

impl ProviderFactory {
    /// Create the provider described by the configuration
    pub fn create_provider(config: &Config) -> LlmResult<Box<dyn CompletionProvider>> {
        let api_key = config
            .api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| LlmError::Config("API key is required".to_string()))?;

        let provider = OpenAIProvider::new(&config.base_url, api_key)?;
        Ok(Box::new(provider))
    }
}

/// Provider client options
#[derive(Debug, Clone)]
pub struct ProviderClientOptions {
    pub user_agent: String,
}

impl Default for ProviderClientOptions {
    fn default() -> Self {
        Self {
            user_agent: format!("repo-advisor/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Utility functions for provider implementations
pub mod utils {
    /// Longest error body kept in an `Http` failure
    const MAX_ERROR_BODY: usize = 2000;

    /// Raw error body, capped in length
    pub fn cap_error_body(body: &str) -> String {
        match body.char_indices().nth(MAX_ERROR_BODY) {
            Some((idx, _)) => format!("{}...", &body[..idx]),
            None => body.to_string(),
        }
    }

    /// Pull a readable message out of an error body.
    ///
    /// OpenAI-style endpoints answer with `{"error": {"message": ...}}`; anything
    /// else is returned as-is, capped in length.
    pub fn extract_error_message(body: &str) -> String {
        if let Ok(json) = serde_json::from_str::<serde_json::Value>(body) {
            if let Some(message) = json
                .get("error")
                .and_then(|error| error.get("message"))
                .and_then(|message| message.as_str())
            {
                return message.to_string();
            }
        }

        cap_error_body(body)
    }

}
