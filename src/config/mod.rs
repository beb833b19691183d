use serde::{Deserialize, Serialize};
use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    time::Duration,
};
use thiserror::Error;
use tracing::debug;

use crate::project::FileCategory;

pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("No API key configured. Set GROQ_API_KEY, OPENAI_API_KEY or ADVISOR_API_KEY.")]
    MissingApiKey,

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to read configuration file {}: {message}", path.display())]
    File { path: PathBuf, message: String },
}

/// Per-task context ceilings, in characters, and file caps
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ContextLimits {
    pub analysis_chars: usize,
    pub security_chars: usize,
    pub performance_chars: usize,
    pub review_chars: usize,
    pub features_chars: usize,
    pub analysis_max_files: usize,
    pub security_max_files: usize,
}

impl Default for ContextLimits {
    fn default() -> Self {
        Self {
            analysis_chars: 2000,
            security_chars: 1000,
            performance_chars: 1500,
            review_chars: 12000,
            features_chars: 800,
            analysis_max_files: 25,
            security_max_files: 10,
        }
    }
}

/// Project scan settings
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ScanConfig {
    /// Directory names pruned in addition to the built-in VCS and dependency dirs
    pub extra_excluded_dirs: Vec<String>,

    /// Maximum traversal depth below the project root
    pub max_depth: Option<usize>,

    /// Additional glob patterns per category
    pub extra_patterns: HashMap<FileCategory, Vec<String>>,
}

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Bearer token for the completion endpoint
    #[serde(skip_serializing)]
    pub api_key: Option<String>,

    /// Full chat completions URL
    pub base_url: String,

    /// Model to use for every task
    pub model: String,

    /// Sampling temperature
    pub temperature: f32,

    /// Maximum tokens for responses
    pub max_tokens: u32,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,

    /// Root of the project being analyzed
    pub project_root: PathBuf,

    /// Display name used in prompts; defaults to the root directory name
    pub project_name: Option<String>,

    /// Files read first for the full analysis and feature suggestions
    pub key_files: Vec<String>,

    /// Files read for the performance audit
    pub performance_files: Vec<String>,

    pub limits: ContextLimits,

    pub scan: ScanConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.1,
            max_tokens: 4000,
            timeout_secs: 30,
            project_root: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            project_name: None,
            key_files: vec![
                "index.html".to_string(),
                "src/main.js".to_string(),
                "package.json".to_string(),
                "vite.config.js".to_string(),
            ],
            performance_files: vec![
                "index.html".to_string(),
                "src/main.js".to_string(),
                "vite.config.js".to_string(),
                "package.json".to_string(),
            ],
            limits: ContextLimits::default(),
            scan: ScanConfig::default(),
        }
    }
}

impl Config {
    /// Initialize configuration from file and environment, in that order
    pub fn init(project_root: Option<PathBuf>) -> Result<Self, ConfigError> {
        debug!("Initializing configuration");

        let mut config = match Self::load_from_file()? {
            Some(file_config) => file_config,
            None => Self::default(),
        };

        config.load_from_env();

        if let Some(root) = project_root {
            config.project_root = root;
        }

        Ok(config)
    }

    /// Load configuration from environment variables
    pub fn load_from_env(&mut self) {
        self.apply_env(|name| std::env::var(name).ok());
    }

    fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        // Later keys win: the tool-specific key overrides provider keys
        for name in ["OPENAI_API_KEY", "GROQ_API_KEY", "ADVISOR_API_KEY"] {
            if let Some(key) = var(name).filter(|k| !k.trim().is_empty()) {
                self.api_key = Some(key);
            }
        }

        if let Some(base_url) = var("ADVISOR_BASE_URL") {
            self.base_url = base_url;
        }

        if let Some(model) = var("ADVISOR_MODEL") {
            self.model = model;
        }

        if let Some(max_tokens) = var("ADVISOR_MAX_TOKENS").and_then(|v| v.parse().ok()) {
            self.max_tokens = max_tokens;
        }

        if let Some(temperature) = var("ADVISOR_TEMPERATURE").and_then(|v| v.parse().ok()) {
            self.temperature = temperature;
        }

        if let Some(timeout) = var("ADVISOR_TIMEOUT_SECS").and_then(|v| v.parse().ok()) {
            self.timeout_secs = timeout;
        }

        if let Some(name) = var("ADVISOR_PROJECT_NAME") {
            self.project_name = Some(name);
        }
    }

    /// Load the first configuration file found.
    ///
    /// Lookup order:
    /// 1. ./.repo-advisor.json
    /// 2. ./repo-advisor.json
    /// 3. $CONFIG_DIR/repo-advisor/config.json
    pub fn load_from_file() -> Result<Option<Self>, ConfigError> {
        let mut config_paths = vec![
            PathBuf::from("./.repo-advisor.json"),
            PathBuf::from("./repo-advisor.json"),
        ];

        if let Some(config_dir) = dirs::config_dir() {
            config_paths.push(config_dir.join("repo-advisor").join("config.json"));
        }

        for path in config_paths {
            if path.exists() {
                return Self::load_from_path(&path).map(Some);
            }
        }

        Ok(None)
    }

    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        debug!("Loading configuration from: {}", path.display());
        let file_error = |message: String| ConfigError::File {
            path: path.to_path_buf(),
            message,
        };

        let content = std::fs::read_to_string(path).map_err(|e| file_error(e.to_string()))?;
        serde_json::from_str(&content).map_err(|e| file_error(e.to_string()))
    }

    /// Name used for the project in prompts
    pub fn project_name(&self) -> String {
        if let Some(name) = self.project_name.as_ref().filter(|n| !n.trim().is_empty()) {
            return name.clone();
        }

        let root = canonical_or_self(&self.project_root);
        root.file_name()
            .and_then(|name| name.to_str())
            .map(str::to_string)
            .unwrap_or_else(|| "project".to_string())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Check if the configuration has a usable API key
    pub fn has_api_key(&self) -> bool {
        self.api_key
            .as_deref()
            .map(|key| !key.trim().is_empty())
            .unwrap_or(false)
    }

    /// Validate the configuration before any request is sent
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.has_api_key() {
            return Err(ConfigError::MissingApiKey);
        }

        if self.model.trim().is_empty() {
            return Err(ConfigError::Invalid("model is required".to_string()));
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ConfigError::Invalid(format!(
                "base_url must be an http(s) URL, got '{}'",
                self.base_url
            )));
        }

        if self.max_tokens == 0 {
            return Err(ConfigError::Invalid("max_tokens must be greater than 0".to_string()));
        }

        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ConfigError::Invalid(
                "temperature must be between 0.0 and 2.0".to_string(),
            ));
        }

        if self.timeout_secs == 0 {
            return Err(ConfigError::Invalid("timeout_secs must be greater than 0".to_string()));
        }

        let limits = &self.limits;
        let ceilings = [
            ("analysis_chars", limits.analysis_chars),
            ("security_chars", limits.security_chars),
            ("performance_chars", limits.performance_chars),
            ("review_chars", limits.review_chars),
            ("features_chars", limits.features_chars),
        ];
        for (name, value) in ceilings {
            if value == 0 {
                return Err(ConfigError::Invalid(format!("limits.{} must be greater than 0", name)));
            }
        }

        if !self.project_root.is_dir() {
            return Err(ConfigError::Invalid(format!(
                "project root {} is not a directory",
                self.project_root.display()
            )));
        }

        Ok(())
    }
}

/// Canonicalize when possible so `.` resolves to a real directory name
fn canonical_or_self(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn valid_config() -> Config {
        Config {
            api_key: Some("gsk_test".to_string()),
            project_root: std::env::temp_dir(),
            ..Config::default()
        }
    }

    #[test]
    fn test_default_values() {
        let config = Config::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.max_tokens, 4000);
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.limits.security_max_files, 10);
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_missing_api_key_is_fatal() {
        let config = Config {
            api_key: None,
            ..valid_config()
        };
        assert!(matches!(config.validate(), Err(ConfigError::MissingApiKey)));

        let blank = Config {
            api_key: Some("   ".to_string()),
            ..valid_config()
        };
        assert!(matches!(blank.validate(), Err(ConfigError::MissingApiKey)));
    }

    #[test]
    fn test_config_validation() {
        assert!(valid_config().validate().is_ok());

        let mut config = valid_config();
        config.temperature = 3.0;
        assert!(config.validate().is_err());

        let mut config = valid_config();
        config.max_tokens = 0;
        assert!(config.validate().is_err());

        let mut config = valid_config();
        config.limits.review_chars = 0;
        assert!(config.validate().is_err());

        let mut config = valid_config();
        config.base_url = "ftp://example.com".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_env_overrides() {
        let mut config = Config::default();
        let env: HashMap<&str, &str> = [
            ("GROQ_API_KEY", "groq"),
            ("ADVISOR_API_KEY", "advisor"),
            ("ADVISOR_MODEL", "custom-model"),
            ("ADVISOR_TEMPERATURE", "0.5"),
            ("ADVISOR_MAX_TOKENS", "not-a-number"),
        ]
        .into_iter()
        .collect();

        config.apply_env(|name| env.get(name).map(|v| v.to_string()));

        assert_eq!(config.api_key.as_deref(), Some("advisor"));
        assert_eq!(config.model, "custom-model");
        assert_eq!(config.temperature, 0.5);
        assert_eq!(config.max_tokens, 4000);
    }

    #[test]
    fn test_load_from_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("repo-advisor.json");
        std::fs::write(
            &path,
            r#"{
                "model": "file-model",
                "limits": { "security_chars": 500 },
                "scan": { "extra_excluded_dirs": ["dist"], "extra_patterns": { "markup": ["**/*.vue"] } }
            }"#,
        )
        .unwrap();

        let config = Config::load_from_path(&path).unwrap();
        assert_eq!(config.model, "file-model");
        assert_eq!(config.limits.security_chars, 500);
        assert_eq!(config.limits.analysis_chars, 2000);
        assert_eq!(config.scan.extra_excluded_dirs, vec!["dist".to_string()]);
        assert_eq!(
            config.scan.extra_patterns.get(&FileCategory::Markup),
            Some(&vec!["**/*.vue".to_string()])
        );
    }

    #[test]
    fn test_invalid_file_is_reported() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ nope").unwrap();

        assert!(matches!(
            Config::load_from_path(&path),
            Err(ConfigError::File { .. })
        ));
    }

    #[test]
    fn test_project_name_falls_back_to_directory() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("my-site");
        std::fs::create_dir(&root).unwrap();

        let config = Config {
            project_root: root,
            ..Config::default()
        };
        assert_eq!(config.project_name(), "my-site");

        let named = Config {
            project_name: Some("RescuePC".to_string()),
            ..config
        };
        assert_eq!(named.project_name(), "RescuePC");
    }
}
