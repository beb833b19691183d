//! Context assembly: reads selected files into a size-bounded bundle

use serde::Serialize;
use std::{
    collections::{BTreeMap, HashSet},
    path::PathBuf,
};
use tracing::{debug, warn};

use super::scanner::{FileCategory, ProjectIndex};
use crate::utils::fs::read_text_prefix;

/// Appended to any content cut at its ceiling
pub const TRUNCATION_MARKER: &str = "\n... [truncated]";

/// How many paths per category the summary lists
const SUMMARY_LISTING_CAP: usize = 50;

/// One file's contribution to a bundle
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContextEntry {
    pub path: String,
    pub content: String,
    pub truncated: bool,
    /// Why the file could not be read; `content` then holds a placeholder note
    pub read_error: Option<String>,
}

impl ContextEntry {
    pub fn is_readable(&self) -> bool {
        self.read_error.is_none()
    }
}

/// Project-level metadata attached to a bundle
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectSummary {
    pub project_name: String,
    pub total_files: usize,
    pub category_counts: BTreeMap<FileCategory, usize>,
    /// Per-category paths, capped for prompt size
    pub structure: BTreeMap<FileCategory, Vec<String>>,
}

impl ProjectSummary {
    pub fn from_index(project_name: &str, index: &ProjectIndex) -> Self {
        let structure = index
            .categories()
            .map(|(category, files)| {
                (
                    category,
                    files.iter().take(SUMMARY_LISTING_CAP).cloned().collect(),
                )
            })
            .collect();

        Self {
            project_name: project_name.to_string(),
            total_files: index.total_files(),
            category_counts: index.category_counts(),
            structure,
        }
    }
}

/// Assembled file contents for one task
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ContextBundle {
    pub entries: Vec<ContextEntry>,
    pub summary: Option<ProjectSummary>,
}

impl ContextBundle {
    pub fn with_summary(mut self, summary: ProjectSummary) -> Self {
        self.summary = Some(summary);
        self
    }

    #[cfg(test)]
    pub fn get(&self, path: &str) -> Option<&ContextEntry> {
        self.entries.iter().find(|entry| entry.path == path)
    }

    #[cfg(test)]
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.path.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Reads files below a project root
#[derive(Debug, Clone)]
pub struct ContextBuilder {
    root: PathBuf,
}

impl ContextBuilder {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Read `paths` (relative to the root) with each content capped at
    /// `ceiling` characters.
    ///
    /// A failed read turns into a placeholder entry; the batch always completes.
    /// Repeated paths are read once.
    pub fn build(&self, paths: &[String], ceiling: usize) -> ContextBundle {
        let mut seen = HashSet::new();
        let mut entries = Vec::with_capacity(paths.len());

        for path in paths {
            if !seen.insert(path.as_str()) {
                continue;
            }
            entries.push(self.read_entry(path, ceiling));
        }

        debug!("Built context bundle with {} entries (ceiling {})", entries.len(), ceiling);
        ContextBundle {
            entries,
            summary: None,
        }
    }

    fn read_entry(&self, path: &str, ceiling: usize) -> ContextEntry {
        match read_text_prefix(self.root.join(path), ceiling) {
            Ok((mut content, truncated)) => {
                if truncated {
                    content.push_str(TRUNCATION_MARKER);
                }
                ContextEntry {
                    path: path.to_string(),
                    content,
                    truncated,
                    read_error: None,
                }
            }
            Err(e) => {
                warn!("Could not read {}: {}", path, e);
                ContextEntry {
                    path: path.to_string(),
                    content: format!("[unreadable: {}]", e),
                    truncated: false,
                    read_error: Some(e.to_string()),
                }
            }
        }
    }
}
