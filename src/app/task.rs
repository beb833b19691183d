//! Task kinds and their context requirements

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::Config;

/// One of the assistant's operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    FullAnalysis,
    SecurityAudit,
    PerformanceAudit,
    CodeReview,
    FeatureSuggestions,
    GenericChat,
}

impl TaskKind {
    pub fn label(&self) -> &'static str {
        match self {
            TaskKind::FullAnalysis => "full analysis",
            TaskKind::SecurityAudit => "security audit",
            TaskKind::PerformanceAudit => "performance audit",
            TaskKind::CodeReview => "code review",
            TaskKind::FeatureSuggestions => "feature suggestions",
            TaskKind::GenericChat => "chat",
        }
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Which files a task reads
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileSelection {
    /// Key files first, then the rest of the index in sorted order
    KeyFilesThenIndex { key_files: Vec<String>, max_files: usize },
    /// Only the key files that were indexed
    KeyFiles(Vec<String>),
    /// Security-related files in sorted order
    SecurityRelated { max_files: usize },
    /// A fixed list, filtered to existing regular files
    Fixed(Vec<String>),
    /// The single review target
    Target,
    /// No file context
    None,
}

/// Everything the engine needs to know to run one task kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskSpec {
    pub kind: TaskKind,
    pub selection: FileSelection,
    /// Character ceiling per file
    pub ceiling: usize,
    /// Whether the bundle carries the project summary
    pub with_summary: bool,
}

impl TaskSpec {
    /// Resolve the task settings for `kind` from the configured limits and file lists
    pub fn resolve(kind: TaskKind, config: &Config) -> Self {
        let limits = &config.limits;
        let (selection, ceiling, with_summary) = match kind {
            TaskKind::FullAnalysis => (
                FileSelection::KeyFilesThenIndex {
                    key_files: config.key_files.clone(),
                    max_files: limits.analysis_max_files,
                },
                limits.analysis_chars,
                true,
            ),
            TaskKind::SecurityAudit => (
                FileSelection::SecurityRelated {
                    max_files: limits.security_max_files,
                },
                limits.security_chars,
                false,
            ),
            TaskKind::PerformanceAudit => (
                FileSelection::Fixed(config.performance_files.clone()),
                limits.performance_chars,
                false,
            ),
            TaskKind::CodeReview => (FileSelection::Target, limits.review_chars, false),
            TaskKind::FeatureSuggestions => (
                FileSelection::KeyFiles(config.key_files.clone()),
                limits.features_chars,
                true,
            ),
            TaskKind::GenericChat => (FileSelection::None, 0, false),
        };

        Self {
            kind,
            selection,
            ceiling,
            with_summary,
        }
    }

    /// Whether the task scans the project tree
    pub fn needs_index(&self) -> bool {
        matches!(
            self.selection,
            FileSelection::KeyFilesThenIndex { .. }
                | FileSelection::KeyFiles(_)
                | FileSelection::SecurityRelated { .. }
        ) || self.with_summary
    }
}
