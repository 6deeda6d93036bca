//! Repository client capability.
//!
//! The publish core needs four operations from a version-control backend:
//! classify a path at HEAD, check out a path into a directory, register a
//! pending addition and commit pending changes. Everything else (transport,
//! protocol, authentication mechanics) belongs to the implementation behind
//! [`RepositoryClient`].

mod memory;
mod svn;

pub use memory::MemoryRepository;
pub use svn::SvnCliClient;

use crate::publish::errors::PublishResult;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Classification of a repository path at the latest revision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PathKind {
    /// The path does not exist in the repository
    Absent,
    /// The path exists as a plain file
    File,
    /// The path exists as a directory
    Directory,
}

/// Depth of a checkout or add operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Depth {
    /// The target and its immediate files
    Files,
    /// The target and everything below it
    Infinity,
}

/// A committed repository revision
pub type Revision = u64;

/// Capability trait for the version-control backend
///
/// Implementations are created connected: constructing one that cannot reach
/// its repository fails with `RepositoryUnreachable`. A client instance is
/// used by exactly one publish session; it is not required to support
/// concurrent sessions over the same authentication context.
pub trait RepositoryClient: Send + Sync {
    /// The URL this client is connected to
    fn url(&self) -> &str;

    /// Classifies `path` (relative to the connected URL) at HEAD
    ///
    /// Read-only and idempotent; the result is never cached by the caller.
    fn check_path_kind(&self, path: &str) -> PublishResult<PathKind>;

    /// Checks out `path` (relative to the connected URL, empty for the root)
    /// into `dest`
    fn checkout(&self, path: &str, dest: &Path, depth: Depth) -> PublishResult<()>;

    /// Registers a working-copy path as a pending addition
    ///
    /// With `Depth::Infinity` intermediate parent directories are included.
    /// Adding a path that is already under version control is an error;
    /// callers are expected to add each path at most once.
    fn add(&self, path: &Path, depth: Depth) -> PublishResult<()>;

    /// Collects all pending changes under `root` and commits them
    fn commit(&self, root: &Path, message: &str) -> PublishResult<Revision>;
}
