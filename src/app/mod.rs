//! Core application logic and orchestration
//!
//! [`Assistant`] turns a task kind into a completion request: it scans the
//! project, assembles the context bundle, renders the prompt, calls the
//! provider and caches successful results.

mod cache;
mod errors;
mod task;
#[cfg(test)]
pub(crate) mod test_support;

pub use cache::*;
pub use errors::*;
pub use task::*;

use std::{path::PathBuf, sync::Arc};
use tracing::{debug, info, warn};

use crate::{
    config::Config,
    llm::{CompletionProvider, CompletionRequest, ProviderFactory},
    project::{ContextBuilder, ContextBundle, FileCategory, ProjectIndex, ProjectScanner, ProjectSummary},
    prompts::template_for,
    utils::fs::relative_slash_path,
};

/// Categories whose files are read for a full analysis, in priority order.
/// Asset files only show up in the project summary.
const CONTENT_CATEGORIES: [FileCategory; 7] = [
    FileCategory::Script,
    FileCategory::Markup,
    FileCategory::Stylesheet,
    FileCategory::StructuredConfig,
    FileCategory::Component,
    FileCategory::SecurityRelated,
    FileCategory::Documentation,
];

/// The assistant engine. Owns its configuration, provider and result cache.
pub struct Assistant {
    config: Config,
    project_name: String,
    provider: Arc<dyn CompletionProvider>,
    scanner: ProjectScanner,
    context: ContextBuilder,
    cache: ResultCache,
}

impl Assistant {
    /// Validate the configuration and connect the configured provider
    pub fn new(config: Config) -> AssistantResult<Self> {
        config
            .validate()
            .map_err(|e| AssistantError::Config(e.to_string()))?;

        let provider = ProviderFactory::create_provider(&config)?;
        Ok(Self::with_provider(config, Arc::from(provider)))
    }

    /// Build an assistant around an existing provider
    pub fn with_provider(config: Config, provider: Arc<dyn CompletionProvider>) -> Self {
        debug!("Creating assistant with provider {}", provider.name());

        Self {
            project_name: config.project_name(),
            scanner: ProjectScanner::new(&config.scan),
            context: ContextBuilder::new(config.project_root.clone()),
            cache: ResultCache::new(),
            provider,
            config,
        }
    }

    pub fn project_name(&self) -> &str {
        &self.project_name
    }

    pub async fn analyze(&mut self) -> AssistantResult<String> {
        self.run(TaskKind::FullAnalysis, None).await
    }

    pub async fn security_audit(&mut self) -> AssistantResult<String> {
        self.run(TaskKind::SecurityAudit, None).await
    }

    pub async fn performance_audit(&mut self) -> AssistantResult<String> {
        self.run(TaskKind::PerformanceAudit, None).await
    }

    pub async fn code_review(&mut self, path: &str) -> AssistantResult<String> {
        self.run(TaskKind::CodeReview, Some(path)).await
    }

    pub async fn suggest_features(&mut self) -> AssistantResult<String> {
        self.run(TaskKind::FeatureSuggestions, None).await
    }

    pub async fn chat(&mut self, question: &str) -> AssistantResult<String> {
        self.run(TaskKind::GenericChat, Some(question)).await
    }

    /// Run one task. `argument` is the review target or the chat question.
    ///
    /// On success the result replaces the cache entry for `kind`; on failure
    /// the cache is left untouched.
    pub async fn run(&mut self, kind: TaskKind, argument: Option<&str>) -> AssistantResult<String> {
        info!("Running {}", kind);

        let request = self.build_request(kind, argument)?;
        match self.provider.complete(request).await {
            Ok(text) => {
                if let Some(previous) = self.cache.get(kind) {
                    debug!("Replacing {} result from {}", kind, previous.timestamp);
                }
                let entry = self.cache.store(kind, text.clone());
                debug!("Cached {} result at {}", kind, entry.timestamp);
                Ok(text)
            }
            Err(e) => {
                warn!("{} failed: {}", kind, e);
                Err(e.into())
            }
        }
    }

    /// Assemble the completion request for a task without sending it
    pub fn build_request(
        &mut self,
        kind: TaskKind,
        argument: Option<&str>,
    ) -> AssistantResult<CompletionRequest> {
        let template = template_for(kind);

        let user_prompt = if kind == TaskKind::GenericChat {
            template.chat_prompt(&self.project_name, argument.unwrap_or_default())
        } else {
            let spec = TaskSpec::resolve(kind, &self.config);
            let bundle = self.prepare_context(&spec, argument)?;
            template.user_prompt(&self.project_name, &bundle)
        };

        Ok(CompletionRequest::new(
            self.config.model.clone(),
            Some(template.system_prompt(&self.project_name)),
            user_prompt,
            self.config.temperature,
            self.config.max_tokens,
            self.config.timeout(),
        ))
    }

    /// Build the context bundle a task spec asks for from the current tree
    pub fn prepare_context(
        &mut self,
        spec: &TaskSpec,
        target: Option<&str>,
    ) -> AssistantResult<ContextBundle> {
        if spec.selection == FileSelection::Target {
            return self.review_context(spec, target.unwrap_or_default());
        }

        let index = if spec.needs_index() {
            Some(self.rescan()?)
        } else {
            None
        };

        let paths = self.select_files(&spec.selection, index.as_ref());
        debug!("{} selected {} files", spec.kind, paths.len());

        let mut bundle = self.context.build(&paths, spec.ceiling);
        if spec.with_summary {
            if let Some(index) = &index {
                bundle = bundle.with_summary(ProjectSummary::from_index(&self.project_name, index));
            }
        }
        Ok(bundle)
    }

    fn rescan(&self) -> AssistantResult<ProjectIndex> {
        let root = &self.config.project_root;
        self.scanner
            .scan(root)
            .map_err(|e| AssistantError::FileAccess {
                path: root.clone(),
                message: e.to_string(),
            })
    }

    fn select_files(&self, selection: &FileSelection, index: Option<&ProjectIndex>) -> Vec<String> {
        match (selection, index) {
            (FileSelection::KeyFilesThenIndex { key_files, max_files }, Some(index)) => {
                let mut paths: Vec<String> = key_files
                    .iter()
                    .filter(|key| index.contains(key))
                    .cloned()
                    .collect();
                let assets = index.files(FileCategory::Asset);
                for category in CONTENT_CATEGORIES {
                    let mut files = index.files(category).to_vec();
                    files.sort();
                    for path in files {
                        if !assets.contains(&path) && !paths.contains(&path) {
                            paths.push(path);
                        }
                    }
                }
                paths.truncate(*max_files);
                paths
            }
            (FileSelection::KeyFiles(key_files), Some(index)) => key_files
                .iter()
                .filter(|key| index.contains(key))
                .cloned()
                .collect(),
            (FileSelection::SecurityRelated { max_files }, Some(index)) => {
                let mut paths = index.files(FileCategory::SecurityRelated).to_vec();
                paths.sort();
                paths.truncate(*max_files);
                paths
            }
            (FileSelection::Fixed(files), _) => files
                .iter()
                .filter(|file| self.config.project_root.join(file).is_file())
                .cloned()
                .collect(),
            _ => Vec::new(),
        }
    }

    fn review_context(&self, spec: &TaskSpec, target: &str) -> AssistantResult<ContextBundle> {
        let root = &self.config.project_root;
        let full_path = root.join(target);

        if target.trim().is_empty() || !full_path.is_file() {
            return Err(AssistantError::FileNotFound(PathBuf::from(target)));
        }

        let display_path = relative_slash_path(root, &full_path).unwrap_or_else(|| target.to_string());
        let bundle = self.context.build(&[display_path], spec.ceiling);

        match bundle.entries.first() {
            Some(entry) if entry.is_readable() => Ok(bundle),
            Some(entry) => Err(AssistantError::FileAccess {
                path: full_path,
                message: entry.read_error.clone().unwrap_or_default(),
            }),
            None => Err(AssistantError::FileNotFound(PathBuf::from(target))),
        }
    }

    /// Last successful result for a task kind
    #[cfg(test)]
    pub fn cached(&self, kind: TaskKind) -> Option<&CacheEntry> {
        self.cache.get(kind)
    }
}
