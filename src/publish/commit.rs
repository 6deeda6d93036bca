//! Commit coordination for a synchronized working copy.
//!
//! One commit per invocation, or none at all: the `never` strategy and an
//! empty staged set both short-circuit without contacting the repository.

use crate::publish::config::Strategy;
use crate::publish::errors::PublishResult;
use crate::repo::{RepositoryClient, Revision};
use std::path::Path;
use tracing::info;

/// Why a publish invocation ended without a commit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The step is configured with the `never` strategy
    NeverStrategy,
    /// No item staged any file this run
    NothingStaged,
}

/// Result of the commit step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    /// A new revision was produced
    Committed(Revision),
    /// The commit was skipped; the repository was not contacted
    Skipped(SkipReason),
}

impl CommitOutcome {
    /// True when a new revision was produced
    #[must_use]
    pub fn is_committed(&self) -> bool {
        matches!(self, Self::Committed(_))
    }
}

/// Commits all pending changes under the working-copy root, or skips
///
/// # Errors
///
/// `CommitFailed` on any repository-client error; the caller performs
/// workspace cleanup and does not retry.
pub fn commit(
    repo: &dyn RepositoryClient,
    working_copy: &Path,
    message: &str,
    strategy: Strategy,
    staged_count: usize,
) -> PublishResult<CommitOutcome> {
    if strategy.is_never() {
        info!("strategy is 'never', skipping commit");
        return Ok(CommitOutcome::Skipped(SkipReason::NeverStrategy));
    }
    if staged_count == 0 {
        info!("no files staged, skipping commit");
        return Ok(CommitOutcome::Skipped(SkipReason::NothingStaged));
    }

    let revision = repo.commit(working_copy, message)?;
    info!(revision, staged = staged_count, "committed working copy");
    Ok(CommitOutcome::Committed(revision))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repo::MemoryRepository;
    use tempfile::TempDir;

    #[test]
    fn test_never_strategy_short_circuits() {
        let repo = MemoryRepository::new("memory://repo");
        let dir = TempDir::new().unwrap();

        let outcome = commit(&repo, dir.path(), "msg", Strategy::Never, 5).unwrap();
        assert_eq!(outcome, CommitOutcome::Skipped(SkipReason::NeverStrategy));
        assert_eq!(repo.revision(), 0);
        assert!(repo.commit_messages().is_empty());
    }

    #[test]
    fn test_empty_staged_set_skips_commit() {
        let repo = MemoryRepository::new("memory://repo");
        let dir = TempDir::new().unwrap();

        let outcome = commit(&repo, dir.path(), "msg", Strategy::Trigger, 0).unwrap();
        assert_eq!(outcome, CommitOutcome::Skipped(SkipReason::NothingStaged));
        assert_eq!(repo.revision(), 0);
    }

    #[test]
    fn test_commit_produces_revision() {
        let repo = MemoryRepository::new("memory://repo");
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("app.jar");
        std::fs::write(&file, b"jar").unwrap();
        repo.add(&file, crate::repo::Depth::Files).unwrap();

        let outcome = commit(&repo, dir.path(), "publish", Strategy::Always, 1).unwrap();
        assert_eq!(outcome, CommitOutcome::Committed(1));
        assert!(outcome.is_committed());
        assert_eq!(repo.commit_messages(), vec!["publish"]);
    }
}
