//! Remote execution traits and unit-of-work types.
//!
//! Filesystem-touching operations run on the node that owns the build's
//! files, which may or may not be the process running the publish step. The
//! bridge hides that distinction: callers submit a self-contained,
//! serializable [`UnitOfWork`] and receive a [`WorkOutput`] or a failure.

use crate::publish::errors::PublishResult;
use crate::repo::Depth;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// One filesystem or working-copy operation to run on the owning node
///
/// The set is closed on purpose: every operation crossing the execution
/// boundary is enumerated here and carries everything it needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum UnitOfWork {
    /// Create a directory tree, parents included
    CreateDirectory {
        /// Absolute path to create
        path: PathBuf,
    },

    /// Check out a repository path into a working-copy directory
    Checkout {
        /// Path relative to the connected repository URL; empty for the root
        path: String,
        /// Working-copy directory to populate
        dest: PathBuf,
        /// Checkout depth
        depth: Depth,
    },

    /// Register a working-copy path as a pending addition
    AddPath {
        /// Working-copy path to add
        path: PathBuf,
        /// Add depth; `Infinity` includes intermediate parents
        depth: Depth,
    },

    /// Match files under a base directory
    MatchFiles {
        /// Directory the patterns are evaluated against
        base_dir: PathBuf,
        /// Include pattern
        include: String,
        /// Exclude pattern; empty means no exclusions
        exclude: String,
    },

    /// Copy one file into the working copy
    CopyFile {
        /// Source file on the build filesystem
        source: PathBuf,
        /// Destination inside the working copy
        dest: PathBuf,
    },
}

/// Result of a successfully executed unit of work
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum WorkOutput {
    /// The operation completed and produced no data
    Done,

    /// Relative paths matched by a `MatchFiles` unit, `/`-separated
    Matches {
        /// Matched relative path -> matched relative path
        files: BTreeMap<String, String>,
    },

    /// Outcome of a `CopyFile` unit
    Copied {
        /// True when the destination already existed before the copy
        existed: bool,
    },
}

/// Capability for running units of work on the node owning the build's files
///
/// Implementations guarantee at-most-once execution per submission; a
/// transport failure surfaces as an error, never as a silent retry. The call
/// blocks for the duration of the operation; this is the only suspension
/// point in the pipeline.
pub trait RemoteExecutor: Send + Sync {
    /// Runs one unit of work to completion
    fn run(&self, work: UnitOfWork) -> PublishResult<WorkOutput>;
}
