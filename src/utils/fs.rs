// File system utilities

use std::{
    collections::HashSet,
    fs,
    io::{self, Read},
    path::{Component, Path},
};
use thiserror::Error;
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

use super::text::string::truncate_chars;

/// Version-control and dependency-tree directories that are never traversed,
/// whatever the configuration says.
pub const ALWAYS_EXCLUDED_DIRS: &[&str] = &[".git", ".hg", ".svn", "node_modules", "bower_components"];

/// Configuration for directory traversal
#[derive(Debug, Clone)]
pub struct WalkConfig {
    /// Maximum depth to traverse
    pub max_depth: Option<usize>,
    /// Directory names pruned on top of [`ALWAYS_EXCLUDED_DIRS`]
    pub excluded_dirs: Vec<String>,
}

impl Default for WalkConfig {
    fn default() -> Self {
        Self {
            max_depth: Some(20),
            excluded_dirs: Vec::new(),
        }
    }
}

/// Walk a directory and return the `/`-separated relative path of every
/// regular file outside excluded subtrees.
///
/// Entries are visited in file-name order so the result is stable for a given
/// tree. Unreadable directories are logged and skipped; only an unreadable root
/// is an error.
pub fn walk_files<P: AsRef<Path>>(root: P, config: &WalkConfig) -> io::Result<Vec<String>> {
    let root = root.as_ref();
    fs::read_dir(root)?;

    debug!("Walking directory: {} with config: {:?}", root.display(), config);

    let excluded: HashSet<&str> = ALWAYS_EXCLUDED_DIRS
        .iter()
        .copied()
        .chain(config.excluded_dirs.iter().map(String::as_str))
        .collect();

    let mut walker = WalkDir::new(root).follow_links(false).sort_by_file_name();
    if let Some(max_depth) = config.max_depth {
        walker = walker.max_depth(max_depth);
    }

    let mut files = Vec::new();
    let entries = walker
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !is_excluded_dir(entry, &excluded));

    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Skipping unreadable path: {}", e);
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        if let Some(relative_path) = relative_slash_path(root, entry.path()) {
            files.push(relative_path);
        }
    }

    debug!("Found {} files", files.len());
    Ok(files)
}

fn is_excluded_dir(entry: &DirEntry, excluded: &HashSet<&str>) -> bool {
    entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .map(|name| excluded.contains(name))
            .unwrap_or(false)
}

/// `/`-joined path of `path` below `root`, or `None` when it is not below it
pub fn relative_slash_path(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let parts: Vec<String> = relative
        .components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();

    if parts.is_empty() {
        None
    } else {
        Some(parts.join("/"))
    }
}

#[derive(Error, Debug)]
pub enum TextReadError {
    #[error("{0}")]
    Io(#[from] io::Error),

    #[error("not valid UTF-8 text")]
    NotUtf8,
}

/// Read the first `max_chars` characters of a UTF-8 file.
///
/// Only enough bytes to cover `max_chars` characters are read. Returns the
/// text and whether the file goes on past it. Bytes that do not decode are an
/// error only when they fall inside the kept prefix.
pub fn read_text_prefix<P: AsRef<Path>>(path: P, max_chars: usize) -> Result<(String, bool), TextReadError> {
    let path = path.as_ref();
    debug!("Reading up to {} chars from {}", max_chars, path.display());

    // A char is at most 4 bytes; the extra bytes show whether the file is longer
    let limit = (max_chars as u64).saturating_mul(4).saturating_add(4);
    let mut bytes = Vec::new();
    fs::File::open(path)?.take(limit).read_to_end(&mut bytes)?;

    match std::str::from_utf8(&bytes) {
        Ok(text) => {
            let (prefix, truncated) = truncate_chars(text, max_chars);
            Ok((prefix.to_string(), truncated))
        }
        Err(e) => {
            let valid = std::str::from_utf8(&bytes[..e.valid_up_to()]).map_err(|_| TextReadError::NotUtf8)?;
            if valid.chars().count() < max_chars {
                return Err(TextReadError::NotUtf8);
            }
            let (prefix, _) = truncate_chars(valid, max_chars);
            Ok((prefix.to_string(), true))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_walk_files_prunes_excluded_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        fs::create_dir_all(root.join("src")).unwrap();
        fs::create_dir_all(root.join(".git/hooks")).unwrap();
        fs::create_dir_all(root.join("web/node_modules/pkg")).unwrap();
        fs::create_dir_all(root.join("dist")).unwrap();

        fs::write(root.join("src/main.js"), "main()").unwrap();
        fs::write(root.join("index.html"), "<html>").unwrap();
        fs::write(root.join(".git/config"), "[core]").unwrap();
        fs::write(root.join(".git/hooks/security-check"), "#!/bin/sh").unwrap();
        fs::write(root.join("web/node_modules/pkg/index.js"), "x").unwrap();
        fs::write(root.join("dist/bundle.js"), "x").unwrap();
        fs::write(root.join(".htaccess"), "RewriteEngine On").unwrap();

        let config = WalkConfig {
            excluded_dirs: vec!["dist".to_string()],
            ..WalkConfig::default()
        };
        let names = walk_files(root, &config).unwrap();

        assert_eq!(names, vec![".htaccess", "index.html", "src/main.js"]);
    }

    #[test]
    fn test_walk_files_missing_root() {
        let temp_dir = TempDir::new().unwrap();
        assert!(walk_files(temp_dir.path().join("nope"), &WalkConfig::default()).is_err());
    }

    #[test]
    fn test_relative_slash_path() {
        let root = Path::new("/project");
        assert_eq!(
            relative_slash_path(root, Path::new("/project/src/app.js")),
            Some("src/app.js".to_string())
        );
        assert_eq!(relative_slash_path(root, Path::new("/project")), None);
        assert_eq!(relative_slash_path(root, Path::new("/elsewhere/a.js")), None);
    }

    #[test]
    fn test_read_text_prefix_rejects_binary() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("logo.png");
        fs::write(&path, [0x89, 0x50, 0x4e, 0x47, 0xff, 0xfe]).unwrap();

        assert!(matches!(read_text_prefix(&path, 100), Err(TextReadError::NotUtf8)));
        assert!(matches!(
            read_text_prefix(temp_dir.path().join("missing.txt"), 100),
            Err(TextReadError::Io(_))
        ));
    }

    #[test]
    fn test_read_text_prefix_whole_and_cut() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("app.js");
        fs::write(&path, "héllo world").unwrap();

        assert_eq!(read_text_prefix(&path, 11).unwrap(), ("héllo world".to_string(), false));
        assert_eq!(read_text_prefix(&path, 100).unwrap(), ("héllo world".to_string(), false));
        assert_eq!(read_text_prefix(&path, 2).unwrap(), ("hé".to_string(), true));
    }

    #[test]
    fn test_invalid_bytes_past_the_prefix_are_ignored() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("bundle.min.js");
        let mut bytes = vec![b'a'; 2_000_000];
        bytes.push(0xff);
        fs::write(&path, &bytes).unwrap();

        let (text, truncated) = read_text_prefix(&path, 2000).unwrap();
        assert_eq!(text, "a".repeat(2000));
        assert!(truncated);

        // Exactly the prefix is valid, the next byte is not
        let path = temp_dir.path().join("edge.txt");
        fs::write(&path, [b'x', b'y', 0xff]).unwrap();
        assert_eq!(read_text_prefix(&path, 2).unwrap(), ("xy".to_string(), true));
        assert!(matches!(read_text_prefix(&path, 3), Err(TextReadError::NotUtf8)));
    }

    #[test]
    fn test_multibyte_char_split_by_read_limit() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("emoji.txt");
        fs::write(&path, "🙂".repeat(50)).unwrap();

        let (text, truncated) = read_text_prefix(&path, 3).unwrap();
        assert_eq!(text, "🙂🙂🙂");
        assert!(truncated);
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_subdirectory_is_skipped() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join("locked")).unwrap();
        fs::write(root.join("locked/secret.js"), "x").unwrap();
        fs::write(root.join("open.js"), "x").unwrap();
        fs::set_permissions(root.join("locked"), fs::Permissions::from_mode(0o000)).unwrap();

        let result = walk_files(root, &WalkConfig::default());
        fs::set_permissions(root.join("locked"), fs::Permissions::from_mode(0o755)).unwrap();

        let names = result.unwrap();
        assert!(names.contains(&"open.js".to_string()));
    }
}
