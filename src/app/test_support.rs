//! Shared fixtures for engine and session tests

use async_trait::async_trait;
use std::{collections::VecDeque, fs, sync::Mutex};
use tempfile::TempDir;

use crate::llm::{CompletionProvider, CompletionRequest, LlmError, LlmResult};

/// Provider that replays canned results and records every request
pub(crate) struct ScriptedProvider {
    replies: Mutex<VecDeque<LlmResult<String>>>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedProvider {
    pub(crate) fn new(replies: Vec<LlmResult<String>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn replying(replies: &[&str]) -> Self {
        Self::new(replies.iter().map(|r| Ok(r.to_string())).collect())
    }

    pub(crate) fn last_request(&self) -> Option<CompletionRequest> {
        self.requests.lock().unwrap().last().cloned()
    }

    pub(crate) fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl CompletionProvider for ScriptedProvider {
    async fn complete(&self, request: CompletionRequest) -> LlmResult<String> {
        self.requests.lock().unwrap().push(request);
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(LlmError::Transport("no scripted reply left".to_string())))
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

/// Provider that panics, for fault-isolation tests
pub(crate) struct PanickingProvider;

#[async_trait]
impl CompletionProvider for PanickingProvider {
    async fn complete(&self, _request: CompletionRequest) -> LlmResult<String> {
        panic!("provider blew up");
    }

    fn name(&self) -> &str {
        "panicking"
    }
}

/// Temporary project tree with the given relative files
pub(crate) fn project_with(files: &[(&str, &str)]) -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    for (path, contents) in files {
        let full = temp_dir.path().join(path);
        fs::create_dir_all(full.parent().unwrap()).unwrap();
        fs::write(full, contents).unwrap();
    }
    temp_dir
}
