//! Project file categorization

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fmt, io, path::Path};
use tracing::{info, warn};

use crate::config::ScanConfig;
use crate::utils::fs::{walk_files, WalkConfig};

/// Named group of project files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FileCategory {
    Markup,
    Stylesheet,
    Script,
    StructuredConfig,
    Documentation,
    Asset,
    Component,
    SecurityRelated,
}

impl FileCategory {
    pub const ALL: [FileCategory; 8] = [
        FileCategory::Markup,
        FileCategory::Stylesheet,
        FileCategory::Script,
        FileCategory::StructuredConfig,
        FileCategory::Documentation,
        FileCategory::Asset,
        FileCategory::Component,
        FileCategory::SecurityRelated,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FileCategory::Markup => "markup",
            FileCategory::Stylesheet => "stylesheet",
            FileCategory::Script => "script",
            FileCategory::StructuredConfig => "structured-config",
            FileCategory::Documentation => "documentation",
            FileCategory::Asset => "asset",
            FileCategory::Component => "component",
            FileCategory::SecurityRelated => "security-related",
        }
    }

    /// Built-in glob patterns, matched against `/`-separated relative paths
    pub fn default_patterns(&self) -> &'static [&'static str] {
        match self {
            FileCategory::Markup => &["**/*.html", "**/*.htm"],
            FileCategory::Stylesheet => &["**/*.css", "**/*.scss", "**/*.sass", "**/*.less"],
            FileCategory::Script => &[
                "**/*.js", "**/*.mjs", "**/*.cjs", "**/*.jsx", "**/*.ts", "**/*.tsx",
            ],
            FileCategory::StructuredConfig => &[
                "**/*.json",
                "**/.*rc*",
                "**/.*config*",
                "**/*.config.*",
                "**/*.toml",
                "**/*.yml",
                "**/*.yaml",
            ],
            FileCategory::Documentation => &["**/*.md", "**/*.txt"],
            FileCategory::Asset => &["**/assets/**"],
            FileCategory::Component => &["**/components/**"],
            FileCategory::SecurityRelated => &[
                "**/security*",
                "**/*security*",
                "**/*https*",
                "**/.htaccess",
                "**/netlify.toml",
            ],
        }
    }
}

impl fmt::Display for FileCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A category bound to its patterns
#[derive(Debug, Clone)]
pub struct CategoryRule {
    pub category: FileCategory,
    pub patterns: Vec<String>,
}

impl CategoryRule {
    /// Built-in rules for every category
    pub fn defaults() -> Vec<CategoryRule> {
        FileCategory::ALL
            .iter()
            .map(|category| CategoryRule {
                category: *category,
                patterns: category
                    .default_patterns()
                    .iter()
                    .map(|p| p.to_string())
                    .collect(),
            })
            .collect()
    }
}

/// Snapshot of a project's categorized files.
///
/// Paths are relative and unique within a category; the same path may be
/// listed under several categories.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProjectIndex {
    categories: BTreeMap<FileCategory, Vec<String>>,
}

impl ProjectIndex {
    /// Paths for one category, empty when nothing matched
    pub fn files(&self, category: FileCategory) -> &[String] {
        self.categories
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn categories(&self) -> impl Iterator<Item = (FileCategory, &[String])> {
        self.categories
            .iter()
            .map(|(category, files)| (*category, files.as_slice()))
    }

    /// Sorted union of every indexed path
    pub fn unique_paths(&self) -> Vec<String> {
        let mut paths: Vec<String> = self.categories.values().flatten().cloned().collect();
        paths.sort();
        paths.dedup();
        paths
    }

    pub fn contains(&self, path: &str) -> bool {
        self.categories
            .values()
            .any(|files| files.iter().any(|f| f == path))
    }

    pub fn category_counts(&self) -> BTreeMap<FileCategory, usize> {
        self.categories
            .iter()
            .map(|(category, files)| (*category, files.len()))
            .collect()
    }

    pub fn total_files(&self) -> usize {
        self.unique_paths().len()
    }
}

/// Walks a project and classifies its files
pub struct ProjectScanner {
    matchers: Vec<(FileCategory, GlobSet)>,
    walk: WalkConfig,
}

impl ProjectScanner {
    /// Scanner with the built-in rules plus the configured extra patterns
    pub fn new(config: &ScanConfig) -> Self {
        let mut rules = CategoryRule::defaults();
        for rule in &mut rules {
            if let Some(extra) = config.extra_patterns.get(&rule.category) {
                rule.patterns.extend(extra.iter().cloned());
            }
        }

        let walk = WalkConfig {
            max_depth: config.max_depth.or(WalkConfig::default().max_depth),
            excluded_dirs: config.extra_excluded_dirs.clone(),
        };

        Self::with_rules(rules, walk)
    }

    pub fn with_rules(rules: Vec<CategoryRule>, walk: WalkConfig) -> Self {
        let matchers = rules
            .into_iter()
            .map(|rule| (rule.category, build_globset(&rule.patterns)))
            .collect();

        Self { matchers, walk }
    }

    /// Scan `root` into a fresh index
    pub fn scan(&self, root: &Path) -> io::Result<ProjectIndex> {
        let files = walk_files(root, &self.walk)?;

        let mut categories: BTreeMap<FileCategory, Vec<String>> = self
            .matchers
            .iter()
            .map(|(category, _)| (*category, Vec::new()))
            .collect();

        for file in &files {
            for (category, set) in &self.matchers {
                if set.is_match(file) {
                    let bucket = categories.entry(*category).or_default();
                    if !bucket.contains(file) {
                        bucket.push(file.clone());
                    }
                }
            }
        }

        let index = ProjectIndex { categories };
        info!(
            "Scanned {} files across {} categories",
            index.total_files(),
            index.categories.len()
        );
        Ok(index)
    }
}

impl Default for ProjectScanner {
    fn default() -> Self {
        Self::new(&ScanConfig::default())
    }
}

/// Build a globset from patterns; invalid ones are logged and skipped
fn build_globset(patterns: &[String]) -> GlobSet {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        if pattern.trim().is_empty() {
            continue;
        }
        match GlobBuilder::new(pattern).literal_separator(true).build() {
            Ok(glob) => {
                builder.add(glob);
            }
            Err(e) => warn!("Ignoring invalid glob '{}': {}", pattern, e),
        }
    }

    builder.build().unwrap_or_else(|e| {
        warn!("Failed to build glob set: {}", e);
        GlobSet::empty()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::fs;
    use tempfile::TempDir;

    fn write(root: &Path, path: &str, contents: &str) {
        let full = root.join(path);
        fs::create_dir_all(full.parent().unwrap()).unwrap();
        fs::write(full, contents).unwrap();
    }

    fn sample_project() -> TempDir {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        write(root, "index.html", "<html></html>");
        write(root, "src/main.js", "import './app.js'");
        write(root, "src/styles/main.css", "body {}");
        write(root, "src/components/Header.js", "export {}");
        write(root, "src/security/https-enforcer.js", "export {}");
        write(root, "assets/logo.svg", "<svg/>");
        write(root, "package.json", "{}");
        write(root, "vite.config.js", "export default {}");
        write(root, ".eslintrc", "{}");
        write(root, "README.md", "# Site");
        write(root, ".git/config", "[core]");
        write(root, ".git/security-notes", "x");
        write(root, "node_modules/lib/security.js", "x");
        temp_dir
    }

    #[test]
    fn test_scan_categorizes_files() {
        let project = sample_project();
        let index = ProjectScanner::default().scan(project.path()).unwrap();

        assert_eq!(index.files(FileCategory::Markup), ["index.html"]);
        assert_eq!(index.files(FileCategory::Stylesheet), ["src/styles/main.css"]);
        assert_eq!(index.files(FileCategory::Asset), ["assets/logo.svg"]);
        assert_eq!(index.files(FileCategory::Documentation), ["README.md"]);
        assert_eq!(index.files(FileCategory::Component), ["src/components/Header.js"]);
        assert_eq!(
            index.files(FileCategory::SecurityRelated),
            ["src/security/https-enforcer.js"]
        );
        assert_eq!(
            index.files(FileCategory::StructuredConfig),
            [".eslintrc", "package.json", "vite.config.js"]
        );

        // A path may live in more than one category
        assert!(index
            .files(FileCategory::Script)
            .contains(&"src/security/https-enforcer.js".to_string()));
    }

    #[test]
    fn test_scan_never_indexes_excluded_subtrees() {
        let project = sample_project();
        let index = ProjectScanner::default().scan(project.path()).unwrap();

        for path in index.unique_paths() {
            assert!(!path.starts_with(".git/"), "indexed {}", path);
            assert!(!path.contains("node_modules"), "indexed {}", path);
        }
    }

    #[test]
    fn test_scan_is_deterministic() {
        let project = sample_project();
        let scanner = ProjectScanner::default();
        assert_eq!(
            scanner.scan(project.path()).unwrap(),
            scanner.scan(project.path()).unwrap()
        );
    }

    #[test]
    fn test_empty_category_is_empty_not_missing() {
        let temp_dir = TempDir::new().unwrap();
        write(temp_dir.path(), "notes.txt", "hello");

        let index = ProjectScanner::default().scan(temp_dir.path()).unwrap();
        assert!(index.files(FileCategory::Markup).is_empty());
        assert_eq!(index.category_counts().get(&FileCategory::Markup), Some(&0));
        assert_eq!(index.category_counts().len(), FileCategory::ALL.len());
    }

    #[test]
    fn test_extra_patterns_and_excluded_dirs() {
        let temp_dir = TempDir::new().unwrap();
        write(temp_dir.path(), "src/App.vue", "<template/>");
        write(temp_dir.path(), "dist/index.html", "<html/>");

        let config = ScanConfig {
            extra_excluded_dirs: vec!["dist".to_string()],
            max_depth: None,
            extra_patterns: HashMap::from([(FileCategory::Markup, vec!["**/*.vue".to_string()])]),
        };
        let index = ProjectScanner::new(&config).scan(temp_dir.path()).unwrap();

        assert_eq!(index.files(FileCategory::Markup), ["src/App.vue"]);
    }

    #[test]
    fn test_invalid_pattern_is_skipped() {
        let rules = vec![CategoryRule {
            category: FileCategory::Markup,
            patterns: vec!["**/[".to_string(), "**/*.html".to_string()],
        }];
        let temp_dir = TempDir::new().unwrap();
        write(temp_dir.path(), "a.html", "");

        let index = ProjectScanner::with_rules(rules, WalkConfig::default())
            .scan(temp_dir.path())
            .unwrap();
        assert_eq!(index.files(FileCategory::Markup), ["a.html"]);
    }

    #[test]
    fn test_category_serializes_kebab_case() {
        assert_eq!(
            serde_json::to_string(&FileCategory::StructuredConfig).unwrap(),
            "\"structured-config\""
        );
        assert_eq!(FileCategory::SecurityRelated.to_string(), "security-related");
    }
}
