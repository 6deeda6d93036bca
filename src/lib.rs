//! # Artipub - publish build artifacts into a version-controlled repository
//!
//! Artipub runs as a step inside a larger build: it selects build-produced
//! files by glob pattern, gates each artifact item on build-environment
//! variables, reconciles a version-control working copy against the remote
//! repository state and commits the result as one atomic change.
//!
//! ## Pipeline
//!
//! 1. `${NAME}` placeholders in the step configuration are resolved against
//!    the invocation environment.
//! 2. Per item, the repository destination is classified (absent, file or
//!    directory) and the working copy reconciled accordingly.
//! 3. Trigger clauses decide whether the item contributes files at all.
//! 4. Matched files are copied in with idempotent add semantics.
//! 5. One commit for the whole invocation, or none (`never` strategy, or
//!    nothing staged).
//!
//! Filesystem-touching operations are expressed as serializable units of
//! work, so matching and copying can run on the node that owns the build's
//! files while the session runs on the control node.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use artipub::prelude::*;
//! use std::sync::Arc;
//!
//! let config = PublishConfig {
//!     repository_url: "https://svn.example.com/repo".to_string(),
//!     credentials_id: "svn-ci".to_string(),
//!     commit_message: "Publish build ${BUILD_NUMBER}".to_string(),
//!     strategy: Strategy::Trigger,
//!     artifacts: vec![
//!         ArtifactItem::new("*.jar", "build/libs")
//!             .with_destination("releases")
//!             .with_params("STAGE=release"),
//!     ],
//! };
//!
//! let env = Environment::from_process();
//! let session = PublishSession::new(&config, env, "/tmp", "/build")?;
//! let client = SvnCliClient::connect(
//!     session.repository_url(),
//!     Credential::new("ci", "secret"),
//! )?;
//! let outcome = session.run_local(Arc::new(client))?;
//! # Ok::<(), artipub::PublishError>(())
//! ```
//!
//! ## License
//!
//! Licensed under either of
//! - Apache License, Version 2.0 ([LICENSE-APACHE](LICENSE-APACHE) or <https://www.apache.org/licenses/LICENSE-2.0>)
//! - MIT license ([LICENSE-MIT](LICENSE-MIT) or <https://opensource.org/licenses/MIT>)
//!
//! at your option.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod cli;
pub mod environment;
pub mod executor;
pub mod infrastructure;
pub mod publish;
pub mod repo;

// Prelude module for common imports
pub mod prelude;

// Re-export commonly used types
pub use environment::Environment;
pub use executor::{LocalExecutor, RemoteExecutor, UnitOfWork, WorkOutput};
pub use infrastructure::init_logging;
pub use publish::{
    ArtifactItem, CommitOutcome, Credential, PublishConfig, PublishError, PublishOutcome,
    PublishResult, PublishSession, SkipReason, Strategy, WorkingCopySynchronizer,
};
pub use publish::vars::resolve;
pub use repo::{Depth, MemoryRepository, PathKind, RepositoryClient, Revision, SvnCliClient};
