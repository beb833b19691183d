//! Completion client
//!
//! A single OpenAI-compatible chat completions provider behind the
//! [`CompletionProvider`] trait. Every failure is returned as a typed
//! [`LlmError`]; nothing escapes this boundary as a panic.

pub mod errors;
pub mod openai;
pub mod provider;
pub mod types;

pub use errors::*;
pub use provider::*;
pub use types::*;
