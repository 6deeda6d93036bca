//! Working-copy synchronization, the central piece of the publish pipeline.
//!
//! Per invocation the synchronizer prepares a fresh working copy and then
//! processes the artifact items strictly in configured order: classify the
//! destination in the repository, reconcile the working-copy directory
//! (create-and-add or checkout), gate on the item's trigger clauses, match
//! local files and place them with idempotent add semantics. Any failure
//! aborts the invocation; there is no retry and no partial commit.

use crate::environment::Environment;
use crate::executor::{RemoteExecutor, UnitOfWork, WorkOutput};
use crate::publish::config::{ArtifactItem, Strategy};
use crate::publish::errors::{PublishError, PublishResult};
use crate::publish::trigger;
use crate::repo::{Depth, PathKind, RepositoryClient};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Reconciles a working copy against the repository and stages matched files
pub struct WorkingCopySynchronizer<'a> {
    repo: &'a dyn RepositoryClient,
    executor: &'a dyn RemoteExecutor,
    working_copy: &'a Path,
    base_local_dir: &'a Path,
}

impl<'a> WorkingCopySynchronizer<'a> {
    /// Creates a synchronizer over `working_copy`, matching files under
    /// `base_local_dir`
    #[must_use]
    pub fn new(
        repo: &'a dyn RepositoryClient,
        executor: &'a dyn RemoteExecutor,
        working_copy: &'a Path,
        base_local_dir: &'a Path,
    ) -> Self {
        Self {
            repo,
            executor,
            working_copy,
            base_local_dir,
        }
    }

    /// Checks out the repository root into the fresh working copy
    pub fn prepare(&self) -> PublishResult<()> {
        info!(
            working_copy = %self.working_copy.display(),
            url = %self.repo.url(),
            "preparing working copy"
        );
        self.executor.run(UnitOfWork::Checkout {
            path: String::new(),
            dest: self.working_copy.to_path_buf(),
            depth: Depth::Infinity,
        })?;
        Ok(())
    }

    /// Processes all items in order and returns every file path placed into
    /// the working copy this run
    ///
    /// A failure on item `k` stops items `k+1..n` and aborts the invocation.
    pub fn synchronize(
        &self,
        items: &[ArtifactItem],
        env: &Environment,
        strategy: Strategy,
    ) -> PublishResult<Vec<PathBuf>> {
        let mut staged = Vec::new();
        let mut registered_dirs = BTreeSet::new();
        for (index, item) in items.iter().enumerate() {
            let placed = self
                .synchronize_item(item, env, strategy, &mut registered_dirs)
                .map_err(|e| e.for_item(index, &item.pattern))?;
            staged.extend(placed);
        }
        info!(staged = staged.len(), "working copy synchronized");
        Ok(staged)
    }

    fn synchronize_item(
        &self,
        item: &ArtifactItem,
        env: &Environment,
        strategy: Strategy,
        registered_dirs: &mut BTreeSet<PathBuf>,
    ) -> PublishResult<Vec<PathBuf>> {
        let item_dir = join_relative(self.working_copy, &item.destination_path);

        // Directory-level reconciliation happens before trigger gating, so a
        // gated-off item still leaves the destination checked out or created.
        let kind = self.repo.check_path_kind(&item.destination_path)?;
        debug!(
            destination = %item.destination_path,
            kind = ?kind,
            "classified destination path"
        );
        match kind {
            PathKind::Absent => {
                // A later item may target a destination an earlier item already
                // registered this run; the addition must not be re-issued.
                if registered_dirs.insert(item_dir.clone()) {
                    self.executor.run(UnitOfWork::CreateDirectory {
                        path: item_dir.clone(),
                    })?;
                    self.executor.run(UnitOfWork::AddPath {
                        path: item_dir.clone(),
                        depth: Depth::Infinity,
                    })?;
                }
            }
            PathKind::Directory => {
                self.executor.run(UnitOfWork::Checkout {
                    path: item.destination_path.clone(),
                    dest: item_dir.clone(),
                    depth: Depth::Infinity,
                })?;
            }
            PathKind::File => {
                // Inherited edge case: an existing plain file at the
                // destination gets no directory-level handling at all.
                warn!(
                    destination = %item.destination_path,
                    "destination exists as a plain file; skipping directory reconciliation"
                );
            }
        }

        if !trigger::is_eligible(&item.trigger_clauses(), env, strategy.is_always()) {
            info!(pattern = %item.pattern, "item gated off by trigger clauses");
            return Ok(Vec::new());
        }

        let match_base = join_relative(self.base_local_dir, &item.local_path);
        let output = self.executor.run(UnitOfWork::MatchFiles {
            base_dir: match_base.clone(),
            include: item.pattern.clone(),
            exclude: item.exclude_pattern.clone(),
        })?;
        let WorkOutput::Matches { files } = output else {
            return Err(PublishError::RemoteExecutionFailed(
                "match unit returned an unexpected output".to_string(),
            ));
        };
        debug!(pattern = %item.pattern, count = files.len(), "matched local files");

        let single_match = files.len() == 1;
        let mut placed = Vec::with_capacity(files.len());
        for relative in files.keys() {
            let source = join_relative(&match_base, relative);
            let dest_name = if single_match && !item.rename_to.is_empty() {
                item.rename_to.as_str()
            } else {
                base_name(relative)
            };
            let dest = item_dir.join(dest_name);

            let output = self.executor.run(UnitOfWork::CopyFile {
                source,
                dest: dest.clone(),
            })?;
            let WorkOutput::Copied { existed } = output else {
                return Err(PublishError::RemoteExecutionFailed(
                    "copy unit returned an unexpected output".to_string(),
                ));
            };
            // Only genuinely new paths are added; an overwrite of a checked
            // out file must not re-issue the addition.
            if !existed {
                self.executor.run(UnitOfWork::AddPath {
                    path: dest.clone(),
                    depth: Depth::Files,
                })?;
            }
            placed.push(dest);
        }
        Ok(placed)
    }
}

/// Joins a `/`-separated relative path onto `base`
fn join_relative(base: &Path, relative: &str) -> PathBuf {
    let mut path = base.to_path_buf();
    for part in relative.split('/').filter(|p| !p.is_empty()) {
        path.push(part);
    }
    path
}

/// Last `/`-separated component of a relative path
fn base_name(relative: &str) -> &str {
    relative.rsplit('/').next().unwrap_or(relative)
}
