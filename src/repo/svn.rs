//! Repository client backed by the `svn` command-line tool.
//!
//! Keeps the wire protocol out of the core: classify maps to `svn info`,
//! reconciliation to `svn checkout`/`svn add` and the final commit to
//! `svn commit`. Connecting runs one `svn info` against the URL so that an
//! unreachable repository fails the invocation before any filesystem work.

use super::{Depth, PathKind, RepositoryClient, Revision};
use crate::publish::config::Credential;
use crate::publish::errors::{PublishError, PublishResult};
use std::path::Path;
use std::process::Command;
use tracing::debug;

/// Repository client that shells out to `svn`
#[derive(Debug, Clone)]
pub struct SvnCliClient {
    url: String,
    credential: Credential,
}

impl SvnCliClient {
    /// Connects to `url`, verifying reachability with one `svn info` call
    ///
    /// # Errors
    ///
    /// Returns `RepositoryUnreachable` when the URL cannot be contacted or
    /// the `svn` binary is not available.
    pub fn connect(url: impl Into<String>, credential: Credential) -> PublishResult<Self> {
        let client = Self {
            url: url.into(),
            credential,
        };
        let output = client
            .svn(&["info", "--show-item", "kind", &client.url])
            .map_err(|e| PublishError::RepositoryUnreachable {
                url: client.url.clone(),
                reason: e.to_string(),
            })?;
        if !output.status.success() {
            return Err(PublishError::RepositoryUnreachable {
                url: client.url.clone(),
                reason: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(client)
    }

    fn svn(&self, args: &[&str]) -> std::io::Result<std::process::Output> {
        let mut command = Command::new("svn");
        command.arg("--non-interactive");
        if let Some(username) = &self.credential.username {
            command.args(["--username", username]);
        }
        if let Some(password) = &self.credential.password {
            command.args(["--password", password]);
        }
        command.args(args);
        debug!(args = ?args, "running svn");
        command.output()
    }

    fn remote_url(&self, path: &str) -> String {
        let path = path.trim_matches('/');
        if path.is_empty() {
            self.url.clone()
        } else {
            format!("{}/{path}", self.url.trim_end_matches('/'))
        }
    }

    fn depth_arg(depth: Depth) -> &'static str {
        match depth {
            Depth::Files => "files",
            Depth::Infinity => "infinity",
        }
    }
}

impl RepositoryClient for SvnCliClient {
    fn url(&self) -> &str {
        &self.url
    }

    fn check_path_kind(&self, path: &str) -> PublishResult<PathKind> {
        let target = self.remote_url(path);
        let output = self.svn(&["info", "--show-item", "kind", &target])?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            // E200009: path not found at HEAD; W170000: URL non-existent
            if stderr.contains("E200009") || stderr.contains("W170000") {
                return Ok(PathKind::Absent);
            }
            return Err(PublishError::RemoteExecutionFailed(format!(
                "svn info failed for '{target}': {}",
                stderr.trim()
            )));
        }
        match String::from_utf8_lossy(&output.stdout).trim() {
            "dir" => Ok(PathKind::Directory),
            "file" => Ok(PathKind::File),
            other => Err(PublishError::RemoteExecutionFailed(format!(
                "unexpected node kind '{other}' for '{target}'"
            ))),
        }
    }

    fn checkout(&self, path: &str, dest: &Path, depth: Depth) -> PublishResult<()> {
        let target = self.remote_url(path);
        let dest_str = dest.to_string_lossy();
        let output = self.svn(&[
            "checkout",
            "--depth",
            Self::depth_arg(depth),
            &target,
            &dest_str,
        ])?;
        if !output.status.success() {
            return Err(PublishError::RemoteExecutionFailed(format!(
                "svn checkout of '{target}' failed: {}",
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        Ok(())
    }

    fn add(&self, path: &Path, depth: Depth) -> PublishResult<()> {
        let path_str = path.to_string_lossy();
        let output = self.svn(&[
            "add",
            "--parents",
            "--depth",
            Self::depth_arg(depth),
            &path_str,
        ])?;
        if !output.status.success() {
            return Err(PublishError::RemoteExecutionFailed(format!(
                "svn add of '{path_str}' failed: {}",
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        Ok(())
    }

    fn commit(&self, root: &Path, message: &str) -> PublishResult<Revision> {
        let root_str = root.to_string_lossy();
        let output = self
            .svn(&["commit", "--message", message, &root_str])
            .map_err(|e| PublishError::CommitFailed(e.to_string()))?;
        if !output.status.success() {
            return Err(PublishError::CommitFailed(
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ));
        }
        // "Committed revision 42." on the last non-empty line
        let stdout = String::from_utf8_lossy(&output.stdout);
        let revision = stdout
            .lines()
            .rev()
            .find_map(|line| {
                line.trim()
                    .strip_prefix("Committed revision ")?
                    .trim_end_matches('.')
                    .parse::<Revision>()
                    .ok()
            })
            .unwrap_or_default();
        Ok(revision)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_url_joins_paths() {
        let client = SvnCliClient {
            url: "https://svn.example.com/repo/".to_string(),
            credential: Credential::default(),
        };
        assert_eq!(client.remote_url(""), "https://svn.example.com/repo/");
        assert_eq!(
            client.remote_url("releases/stable"),
            "https://svn.example.com/repo/releases/stable"
        );
        assert_eq!(
            client.remote_url("/releases/"),
            "https://svn.example.com/repo/releases"
        );
    }

    #[test]
    fn test_depth_arg() {
        assert_eq!(SvnCliClient::depth_arg(Depth::Files), "files");
        assert_eq!(SvnCliClient::depth_arg(Depth::Infinity), "infinity");
    }

    #[test]
    fn test_connect_to_missing_repository_is_unreachable() {
        // Needs the svn binary on the path
        if Command::new("svn").arg("--version").output().is_err() {
            return;
        }
        let empty = tempfile::TempDir::new().unwrap();
        let url = format!("file://{}/no-such-repo", empty.path().display());
        let result = SvnCliClient::connect(url, Credential::default());
        assert!(matches!(
            result,
            Err(PublishError::RepositoryUnreachable { .. })
        ));
    }
}
