//! Error types for the publish domain

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during a publish invocation
///
/// Every component surfaces failures through this single type; none of the
/// variants is retried automatically anywhere in the core.
#[derive(Error, Debug)]
pub enum PublishError {
    /// The step configuration is unusable before any I/O happens
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A connection to the repository could not be established
    #[error("cannot connect to repository '{url}': {reason}")]
    RepositoryUnreachable {
        /// Repository URL that was attempted.
        url: String,
        /// Reason reported by the client.
        reason: String,
    },

    /// A local path required for matching does not exist
    #[error("path does not exist: {0}")]
    PathNotFound(PathBuf),

    /// An include or exclude pattern is not syntactically valid
    #[error("invalid pattern '{pattern}': {reason}")]
    InvalidPattern {
        /// The offending pattern.
        pattern: String,
        /// Parser error detail.
        reason: String,
    },

    /// Copying a matched file into the working copy failed
    #[error("cannot copy '{source_path}' to '{dest}': {reason}")]
    CopyFailed {
        /// File that was being copied.
        source_path: PathBuf,
        /// Destination inside the working copy.
        dest: PathBuf,
        /// Underlying failure.
        reason: String,
    },

    /// The final commit was rejected by the repository
    #[error("cannot commit into repository: {0}")]
    CommitFailed(String),

    /// A unit of work could not be executed on the owning node
    #[error("remote execution failed: {0}")]
    RemoteExecutionFailed(String),

    /// IO error outside the more specific variants above
    #[error("IO error: {0}")]
    Io(String),

    /// Failure while processing one artifact item, keeping the underlying
    /// error reachable through `source()`
    #[error("artifact item #{index} ('{pattern}'): {source}")]
    Item {
        /// Zero-based position of the item in the configuration.
        index: usize,
        /// The item's include pattern, for log readability.
        pattern: String,
        /// The failure itself.
        source: Box<PublishError>,
    },
}

impl PublishError {
    /// Attaches the artifact item that was being processed, so every failure
    /// a single item causes names that item and its pattern
    #[must_use]
    pub fn for_item(self, index: usize, pattern: &str) -> Self {
        Self::Item {
            index,
            pattern: pattern.to_string(),
            source: Box::new(self),
        }
    }

    /// The error with any item context stripped
    #[must_use]
    pub fn root_cause(&self) -> &Self {
        match self {
            Self::Item { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

impl From<std::io::Error> for PublishError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

/// Convenience result alias used across the publish pipeline
pub type PublishResult<T> = Result<T, PublishError>;
