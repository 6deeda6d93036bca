//! In-memory repository backend for development and testing.
//!
//! Holds the repository tree as a map of `/`-separated paths to file contents.
//! Checkouts materialize that tree on the local filesystem; pending additions
//! are recorded and folded into the tree on commit. The backend is strict
//! about double-adds so tests can assert the idempotent-add behavior of the
//! synchronizer.

use super::{Depth, PathKind, RepositoryClient, Revision};
use crate::publish::errors::{PublishError, PublishResult};
use parking_lot::Mutex;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

#[derive(Debug, Default)]
struct State {
    /// Repository files: path relative to the URL root -> contents
    files: BTreeMap<String, Vec<u8>>,
    /// Repository directories, relative to the URL root
    dirs: BTreeSet<String>,
    /// Pending additions, keyed by working-copy path
    pending: BTreeSet<PathBuf>,
    revision: Revision,
    commits: Vec<String>,
}

impl State {
    /// Registers `path` and every intermediate parent as a directory
    fn insert_dirs(&mut self, path: &str) {
        let mut current = String::new();
        for part in path.split('/').filter(|p| !p.is_empty()) {
            if !current.is_empty() {
                current.push('/');
            }
            current.push_str(part);
            self.dirs.insert(current.clone());
        }
    }
}

/// In-memory repository for development and testing
#[derive(Debug)]
pub struct MemoryRepository {
    url: String,
    state: Mutex<State>,
}

impl MemoryRepository {
    /// Creates an empty repository served at `url`
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            state: Mutex::new(State::default()),
        }
    }

    /// Seeds a directory into the repository tree
    pub fn seed_dir(&self, path: &str) {
        self.state.lock().insert_dirs(path);
    }

    /// Seeds a file (and its parent directories) into the repository tree
    pub fn seed_file(&self, path: &str, contents: &[u8]) {
        if let Some((parent, _)) = path.rsplit_once('/') {
            self.seed_dir(parent);
        }
        self.state.lock().files.insert(path.to_string(), contents.to_vec());
    }

    /// The latest committed revision
    #[must_use]
    pub fn revision(&self) -> Revision {
        self.state.lock().revision
    }

    /// Messages of all commits issued so far, in order
    #[must_use]
    pub fn commit_messages(&self) -> Vec<String> {
        self.state.lock().commits.clone()
    }

    /// Contents of a repository file, if present
    #[must_use]
    pub fn file(&self, path: &str) -> Option<Vec<u8>> {
        self.state.lock().files.get(path).cloned()
    }

    /// Number of additions currently pending
    #[must_use]
    pub fn pending_adds(&self) -> usize {
        self.state.lock().pending.len()
    }

    fn normalize(path: &str) -> String {
        path.trim_matches('/').to_string()
    }
}

/// Repository path (relative to the URL root, `/`-separated) of a
/// working-copy path under `root`
fn repo_path_under(root: &Path, path: &Path) -> PublishResult<String> {
    let relative = path.strip_prefix(root).map_err(|_| {
        PublishError::CommitFailed(format!(
            "path '{}' is outside the working copy",
            path.display()
        ))
    })?;
    Ok(relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/"))
}

impl RepositoryClient for MemoryRepository {
    fn url(&self) -> &str {
        &self.url
    }

    fn check_path_kind(&self, path: &str) -> PublishResult<PathKind> {
        let path = Self::normalize(path);
        let state = self.state.lock();
        if path.is_empty() || state.dirs.contains(&path) {
            return Ok(PathKind::Directory);
        }
        if state.files.contains_key(&path) {
            return Ok(PathKind::File);
        }
        Ok(PathKind::Absent)
    }

    fn checkout(&self, path: &str, dest: &Path, _depth: Depth) -> PublishResult<()> {
        let prefix = Self::normalize(path);
        let state = self.state.lock();
        std::fs::create_dir_all(dest)?;
        for (file, contents) in &state.files {
            let relative = if prefix.is_empty() {
                Some(file.as_str())
            } else {
                file.strip_prefix(&format!("{prefix}/"))
            };
            let Some(relative) = relative else { continue };
            let target = dest.join(relative);
            if let Some(parent) = target.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&target, contents)?;
        }
        Ok(())
    }

    fn add(&self, path: &Path, _depth: Depth) -> PublishResult<()> {
        let mut state = self.state.lock();
        if !state.pending.insert(path.to_path_buf()) {
            return Err(PublishError::RemoteExecutionFailed(format!(
                "'{}' is already under version control",
                path.display()
            )));
        }
        Ok(())
    }

    fn commit(&self, root: &Path, message: &str) -> PublishResult<Revision> {
        let mut state = self.state.lock();

        // Pending additions first, so new paths become tracked
        let pending: Vec<PathBuf> = state.pending.iter().cloned().collect();
        for path in pending {
            let repo_path = repo_path_under(root, &path)?;
            if path.is_dir() {
                state.insert_dirs(&repo_path);
            } else {
                let contents = std::fs::read(&path)
                    .map_err(|e| PublishError::CommitFailed(e.to_string()))?;
                if let Some((parent, _)) = repo_path.rsplit_once('/') {
                    state.insert_dirs(parent);
                }
                state.files.insert(repo_path, contents);
            }
        }
        state.pending.clear();

        // Then modifications of already-tracked files in the working copy
        let mut stack = vec![root.to_path_buf()];
        while let Some(dir) = stack.pop() {
            let Ok(entries) = std::fs::read_dir(&dir) else {
                continue;
            };
            for entry in entries.flatten() {
                let path = entry.path();
                if path.is_dir() {
                    stack.push(path);
                    continue;
                }
                let repo_path = repo_path_under(root, &path)?;
                if state.files.contains_key(&repo_path) {
                    let contents = std::fs::read(&path)
                        .map_err(|e| PublishError::CommitFailed(e.to_string()))?;
                    state.files.insert(repo_path, contents);
                }
            }
        }

        state.revision += 1;
        state.commits.push(message.to_string());
        Ok(state.revision)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_classify_seeded_paths() {
        let repo = MemoryRepository::new("memory://repo");
        repo.seed_dir("releases/stable");
        repo.seed_file("docs/readme.txt", b"hello");

        assert_eq!(repo.check_path_kind("").unwrap(), PathKind::Directory);
        assert_eq!(
            repo.check_path_kind("releases").unwrap(),
            PathKind::Directory
        );
        assert_eq!(
            repo.check_path_kind("releases/stable").unwrap(),
            PathKind::Directory
        );
        assert_eq!(
            repo.check_path_kind("docs/readme.txt").unwrap(),
            PathKind::File
        );
        assert_eq!(repo.check_path_kind("missing").unwrap(), PathKind::Absent);
    }

    #[test]
    fn test_checkout_materializes_subtree() {
        let repo = MemoryRepository::new("memory://repo");
        repo.seed_file("releases/app.jar", b"bytes");
        repo.seed_file("other/file.txt", b"not this one");

        let dir = TempDir::new().unwrap();
        repo.checkout("releases", dir.path(), Depth::Infinity).unwrap();

        assert_eq!(
            std::fs::read(dir.path().join("app.jar")).unwrap(),
            b"bytes"
        );
        assert!(!dir.path().join("file.txt").exists());
    }

    #[test]
    fn test_double_add_is_rejected() {
        let repo = MemoryRepository::new("memory://repo");
        let path = PathBuf::from("/wc/releases/app.jar");
        repo.add(&path, Depth::Files).unwrap();
        assert!(repo.add(&path, Depth::Files).is_err());
    }

    #[test]
    fn test_commit_folds_pending_files_into_tree() {
        let repo = MemoryRepository::new("memory://repo");
        let dir = TempDir::new().unwrap();
        let staged = dir.path().join("releases");
        std::fs::create_dir_all(&staged).unwrap();
        std::fs::write(staged.join("app.jar"), b"payload").unwrap();

        repo.add(&staged, Depth::Infinity).unwrap();
        repo.add(&staged.join("app.jar"), Depth::Files).unwrap();
        let revision = repo.commit(dir.path(), "publish build 1").unwrap();

        assert_eq!(revision, 1);
        assert_eq!(repo.file("releases/app.jar").unwrap(), b"payload");
        assert_eq!(repo.pending_adds(), 0);
        assert_eq!(repo.commit_messages(), vec!["publish build 1"]);
        assert_eq!(
            repo.check_path_kind("releases").unwrap(),
            PathKind::Directory
        );
    }
}
