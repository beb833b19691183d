//! Error types for the completion client

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LlmError {
    /// Connection, DNS, timeout or body-read failure
    #[error("Transport error: {0}")]
    Transport(String),

    /// The endpoint answered with a non-success status; `body` is the raw
    /// response body, capped in length
    #[error("HTTP error {status}: {}", super::provider::utils::extract_error_message(body))]
    Http { status: u16, body: String },

    /// The response body did not carry the expected reply field
    #[error("Malformed response: {0}")]
    Parse(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl LlmError {
    /// Short label for the failure kind, used in logs
    pub fn kind(&self) -> &'static str {
        match self {
            LlmError::Transport(_) => "transport",
            LlmError::Http { .. } => "http",
            LlmError::Parse(_) => "parse",
            LlmError::Config(_) => "config",
        }
    }
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            LlmError::Transport(format!("request timed out: {}", err))
        } else if err.is_connect() {
            LlmError::Transport(format!("connection failed: {}", err))
        } else {
            LlmError::Transport(err.to_string())
        }
    }
}

pub type LlmResult<T> = Result<T, LlmError>;
