//! Filesystem primitives backing the units of work.
//!
//! These run on the node that owns the build's files. Matching walks the base
//! directory recursively and evaluates glob patterns against relative paths
//! normalized to `/` separators, so results are stable across host OSes.

use crate::publish::errors::{PublishError, PublishResult};
use glob::Pattern;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

/// Matches files under `base_dir` against include/exclude glob patterns
///
/// Returns relative paths with `/` separators, files only. An empty exclude
/// pattern excludes nothing.
///
/// # Errors
///
/// `PathNotFound` when `base_dir` does not exist, `InvalidPattern` when a
/// pattern fails to parse.
pub fn match_files(
    base_dir: &Path,
    include: &str,
    exclude: &str,
) -> PublishResult<BTreeMap<String, String>> {
    if !base_dir.exists() {
        return Err(PublishError::PathNotFound(base_dir.to_path_buf()));
    }

    let include = Pattern::new(include).map_err(|e| PublishError::InvalidPattern {
        pattern: include.to_string(),
        reason: e.to_string(),
    })?;
    let exclude = if exclude.is_empty() {
        None
    } else {
        Some(Pattern::new(exclude).map_err(|e| PublishError::InvalidPattern {
            pattern: exclude.to_string(),
            reason: e.to_string(),
        })?)
    };

    let mut matches = BTreeMap::new();
    let mut stack = vec![base_dir.to_path_buf()];
    while let Some(dir) = stack.pop() {
        for entry in std::fs::read_dir(&dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.is_dir() {
                stack.push(path);
                continue;
            }
            let Ok(relative) = path.strip_prefix(base_dir) else {
                continue;
            };
            let relative = normalize_separators(relative);
            if include.matches(&relative)
                && exclude.as_ref().is_none_or(|e| !e.matches(&relative))
            {
                matches.insert(relative.clone(), relative);
            }
        }
    }

    debug!(
        base_dir = %base_dir.display(),
        count = matches.len(),
        "matched files"
    );
    Ok(matches)
}

/// Copies `source` to `dest`, creating parent directories as needed
///
/// Returns whether `dest` already existed before the copy. Re-runs over an
/// unchanged checkout overwrite the bytes without signalling a new file.
pub fn copy_file(source: &Path, dest: &Path) -> PublishResult<bool> {
    let existed = dest.exists();
    if let Some(parent) = dest.parent() {
        std::fs::create_dir_all(parent).map_err(|e| PublishError::CopyFailed {
            source_path: source.to_path_buf(),
            dest: dest.to_path_buf(),
            reason: e.to_string(),
        })?;
    }
    std::fs::copy(source, dest).map_err(|e| PublishError::CopyFailed {
        source_path: source.to_path_buf(),
        dest: dest.to_path_buf(),
        reason: e.to_string(),
    })?;
    Ok(existed)
}

/// Creates a directory tree, parents included; succeeds if already present
pub fn create_dir_tree(path: &Path) -> PublishResult<()> {
    std::fs::create_dir_all(path)?;
    Ok(())
}

fn normalize_separators(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Deletes a directory tree if it exists; missing is not an error
pub fn remove_dir_tree(path: &Path) -> PublishResult<()> {
    if path.exists() {
        std::fs::remove_dir_all(path)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(dir: &Path, name: &str) {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, b"x").unwrap();
    }

    #[test]
    fn test_match_files_simple_pattern() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "app-1.0.jar");
        touch(dir.path(), "notes.txt");

        let matches = match_files(dir.path(), "*.jar", "").unwrap();
        assert_eq!(matches.len(), 1);
        assert!(matches.contains_key("app-1.0.jar"));
    }

    #[test]
    fn test_match_files_recursive_pattern() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "libs/app.jar");
        touch(dir.path(), "libs/deep/util.jar");
        touch(dir.path(), "app.jar");

        let matches = match_files(dir.path(), "**/*.jar", "").unwrap();
        assert!(matches.contains_key("libs/app.jar"));
        assert!(matches.contains_key("libs/deep/util.jar"));
    }

    #[test]
    fn test_match_files_does_not_cross_directories_with_flat_pattern() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "libs/app.jar");
        touch(dir.path(), "top.jar");

        let matches = match_files(dir.path(), "*.jar", "").unwrap();
        assert!(matches.contains_key("top.jar"));
        assert!(!matches.contains_key("libs/app.jar"));
    }

    #[test]
    fn test_match_files_exclude_pattern() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "app.jar");
        touch(dir.path(), "app-sources.jar");

        let matches = match_files(dir.path(), "*.jar", "*-sources.jar").unwrap();
        assert!(matches.contains_key("app.jar"));
        assert!(!matches.contains_key("app-sources.jar"));
    }

    #[test]
    fn test_match_files_missing_base_dir() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope");
        assert!(matches!(
            match_files(&missing, "*.jar", ""),
            Err(PublishError::PathNotFound(_))
        ));
    }

    #[test]
    fn test_match_files_invalid_pattern() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            match_files(dir.path(), "[", ""),
            Err(PublishError::InvalidPattern { .. })
        ));
    }

    #[test]
    fn test_copy_file_reports_existence() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("src.bin");
        std::fs::write(&source, b"payload").unwrap();
        let dest = dir.path().join("out/dest.bin");

        assert!(!copy_file(&source, &dest).unwrap());
        assert_eq!(std::fs::read(&dest).unwrap(), b"payload");

        std::fs::write(&source, b"updated").unwrap();
        assert!(copy_file(&source, &dest).unwrap());
        assert_eq!(std::fs::read(&dest).unwrap(), b"updated");
    }

    #[test]
    fn test_remove_dir_tree_tolerates_missing() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("never-created");
        assert!(remove_dir_tree(&missing).is_ok());
    }
}
