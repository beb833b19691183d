//! OpenAI-compatible chat completions provider (Groq, OpenAI, local gateways)

use async_trait::async_trait;
use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE},
    Client, StatusCode,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::llm::{
    errors::{LlmError, LlmResult},
    provider::{utils, CompletionProvider, ProviderClientOptions},
    types::{CompletionRequest, Message},
};

/// Client for a single chat completions endpoint
#[derive(Debug, Clone)]
pub struct OpenAIProvider {
    client: Client,
    endpoint: String,
}

impl OpenAIProvider {
    /// Create a provider posting to `endpoint` with a bearer token
    pub fn new(endpoint: &str, api_key: &str) -> LlmResult<Self> {
        let mut headers = HeaderMap::new();

        let auth_value = HeaderValue::from_str(&format!("Bearer {}", api_key))
            .map_err(|e| LlmError::Config(format!("Invalid API key: {}", e)))?;
        headers.insert(AUTHORIZATION, auth_value);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let options = ProviderClientOptions::default();
        let client = Client::builder()
            .default_headers(headers)
            .user_agent(&options.user_agent)
            .build()
            .map_err(|e| LlmError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
        })
    }
}

#[async_trait]
impl CompletionProvider for OpenAIProvider {
    async fn complete(&self, request: CompletionRequest) -> LlmResult<String> {
        let body = ChatCompletionBody {
            model: &request.model,
            messages: &request.messages,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        };

        debug!(
            "POST {} (model {}, {} messages)",
            self.endpoint,
            request.model,
            request.messages.len()
        );

        let response = self
            .client
            .post(&self.endpoint)
            .timeout(request.timeout)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        let result = classify_response(status, &text);
        if let Err(e) = &result {
            warn!("Completion request failed ({}): {}", e.kind(), e);
        }
        result
    }

    fn name(&self) -> &str {
        "openai-compatible"
    }
}

/// Map a received status and body onto the completion result
pub fn classify_response(status: StatusCode, body: &str) -> LlmResult<String> {
    if !status.is_success() {
        return Err(LlmError::Http {
            status: status.as_u16(),
            body: utils::cap_error_body(body),
        });
    }
    parse_completion(body)
}

/// Extract the first choice's message content from a success body
pub fn parse_completion(body: &str) -> LlmResult<String> {
    let response: ChatCompletionResponse = serde_json::from_str(body)
        .map_err(|e| LlmError::Parse(format!("unexpected response body: {}", e)))?;

    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| LlmError::Parse("no choices in response".to_string()))?;

    choice
        .message
        .content
        .ok_or_else(|| LlmError::Parse("first choice has no message content".to_string()))
}

// Wire types
#[derive(Debug, Serialize)]
struct ChatCompletionBody<'a> {
    model: &'a str,
    messages: &'a [Message],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatCompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionChoice {
    message: ChatCompletionMessage,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionMessage {
    content: Option<String>,
}
