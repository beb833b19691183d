//! Error types for assistant operations

use std::path::PathBuf;
use thiserror::Error;

use crate::llm::LlmError;

#[derive(Error, Debug)]
pub enum AssistantError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Llm(#[from] LlmError),

    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("Error reading {}: {message}", path.display())]
    FileAccess { path: PathBuf, message: String },
}

impl AssistantError {
    /// Only configuration problems should stop the process
    pub fn is_fatal(&self) -> bool {
        matches!(self, AssistantError::Config(_) | AssistantError::Llm(LlmError::Config(_)))
    }
}

pub type AssistantResult<T> = Result<T, AssistantError>;
