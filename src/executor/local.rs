//! Local executor that runs units of work in-process.
//!
//! Used when the control node and the execution node are the same process:
//! filesystem units go straight to the local filesystem, working-copy units
//! to the shared repository client. A remoting deployment replaces this with
//! a bridge that serializes the same units across the transport.

use super::fs_ops;
use super::traits::{RemoteExecutor, UnitOfWork, WorkOutput};
use crate::publish::errors::PublishResult;
use crate::repo::RepositoryClient;
use std::sync::Arc;
use tracing::debug;

/// Executor that services every unit of work in the current process
pub struct LocalExecutor {
    repo: Arc<dyn RepositoryClient>,
}

impl LocalExecutor {
    /// Creates a local executor sharing `repo` with the session
    #[must_use]
    pub fn new(repo: Arc<dyn RepositoryClient>) -> Self {
        Self { repo }
    }
}

impl RemoteExecutor for LocalExecutor {
    fn run(&self, work: UnitOfWork) -> PublishResult<WorkOutput> {
        debug!(work = ?work, "running unit of work locally");
        match work {
            UnitOfWork::CreateDirectory { path } => {
                fs_ops::create_dir_tree(&path)?;
                Ok(WorkOutput::Done)
            }
            UnitOfWork::Checkout { path, dest, depth } => {
                self.repo.checkout(&path, &dest, depth)?;
                Ok(WorkOutput::Done)
            }
            UnitOfWork::AddPath { path, depth } => {
                self.repo.add(&path, depth)?;
                Ok(WorkOutput::Done)
            }
            UnitOfWork::MatchFiles {
                base_dir,
                include,
                exclude,
            } => {
                let files = fs_ops::match_files(&base_dir, &include, &exclude)?;
                Ok(WorkOutput::Matches { files })
            }
            UnitOfWork::CopyFile { source, dest } => {
                let existed = fs_ops::copy_file(&source, &dest)?;
                Ok(WorkOutput::Copied { existed })
            }
        }
    }
}
