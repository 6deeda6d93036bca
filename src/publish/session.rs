//! Top-level publish session.
//!
//! Owns one invocation end to end: validate the configuration, resolve
//! `${NAME}` tokens over a deep copy, reconcile the working copy, commit (or
//! skip) and clean the workspace up on every exit path.

use crate::environment::Environment;
use crate::executor::{self, LocalExecutor, RemoteExecutor};
use crate::publish::commit::{self, CommitOutcome};
use crate::publish::config::PublishConfig;
use crate::publish::errors::PublishResult;
use crate::publish::sync::WorkingCopySynchronizer;
use crate::repo::RepositoryClient;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info, warn};
use uuid::Uuid;

/// What one publish invocation produced
#[derive(Debug)]
pub struct PublishOutcome {
    /// Commit result, or why the commit was skipped
    pub commit: CommitOutcome,
    /// Every file placed into the working copy this run
    pub staged: Vec<PathBuf>,
}

/// One publish invocation over a validated, variable-resolved configuration
pub struct PublishSession {
    config: PublishConfig,
    env: Environment,
    workspace_root: PathBuf,
    base_local_dir: PathBuf,
}

impl PublishSession {
    /// Validates `config` and resolves variables over a deep copy
    ///
    /// `workspace_root` is where the temporary working copy lives;
    /// `base_local_dir` is the build directory file matching is rooted at.
    /// Validation happens before any I/O.
    ///
    /// # Errors
    ///
    /// `InvalidConfiguration` for an empty repository URL, empty credentials
    /// id, an item without a pattern or a repository URL that is unparsable
    /// after variable resolution.
    pub fn new(
        config: &PublishConfig,
        env: Environment,
        workspace_root: impl Into<PathBuf>,
        base_local_dir: impl Into<PathBuf>,
    ) -> PublishResult<Self> {
        config.validate()?;
        let resolved = config.resolved(&env);
        // URL parseability is only meaningful once variables are substituted
        resolved.validate_resolved()?;
        Ok(Self {
            config: resolved,
            env,
            workspace_root: workspace_root.into(),
            base_local_dir: base_local_dir.into(),
        })
    }

    /// The repository URL after variable resolution
    #[must_use]
    pub fn repository_url(&self) -> &str {
        &self.config.repository_url
    }

    /// Runs the invocation with a local, in-process executor
    pub fn run_local(&self, repo: Arc<dyn RepositoryClient>) -> PublishResult<PublishOutcome> {
        let executor = LocalExecutor::new(repo.clone());
        self.run(repo.as_ref(), &executor)
    }

    /// Runs the invocation against an already connected repository client and
    /// an execution bridge
    ///
    /// The working copy is deleted on every exit path; cleanup is best-effort
    /// and never masks the original failure.
    pub fn run(
        &self,
        repo: &dyn RepositoryClient,
        executor: &dyn RemoteExecutor,
    ) -> PublishResult<PublishOutcome> {
        let workspace = self
            .workspace_root
            .join(format!("artipub-{}", Uuid::new_v4()));
        let _guard = WorkspaceGuard::create(workspace.clone())?;

        info!(
            url = %self.config.repository_url,
            items = self.config.artifacts.len(),
            strategy = %self.config.strategy,
            workspace = %workspace.display(),
            "starting publish session"
        );

        let result = self.run_pipeline(repo, executor, &workspace);
        if let Err(e) = &result {
            error!(error = %e, "publish session failed");
        }
        result
    }

    fn run_pipeline(
        &self,
        repo: &dyn RepositoryClient,
        executor: &dyn RemoteExecutor,
        workspace: &Path,
    ) -> PublishResult<PublishOutcome> {
        let sync = WorkingCopySynchronizer::new(repo, executor, workspace, &self.base_local_dir);
        sync.prepare()?;
        let staged = sync.synchronize(&self.config.artifacts, &self.env, self.config.strategy)?;

        let outcome = commit::commit(
            repo,
            workspace,
            &self.config.commit_message,
            self.config.strategy,
            staged.len(),
        )?;

        Ok(PublishOutcome {
            commit: outcome,
            staged,
        })
    }
}

/// Scoped working-copy directory: wiped on creation, deleted on drop
struct WorkspaceGuard {
    path: PathBuf,
}

impl WorkspaceGuard {
    fn create(path: PathBuf) -> PublishResult<Self> {
        executor::remove_dir_tree(&path)?;
        std::fs::create_dir_all(&path)?;
        Ok(Self { path })
    }
}

impl Drop for WorkspaceGuard {
    fn drop(&mut self) {
        if let Err(e) = executor::remove_dir_tree(&self.path) {
            warn!(
                workspace = %self.path.display(),
                error = %e,
                "could not clean up working copy"
            );
        }
    }
}
