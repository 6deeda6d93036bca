//! Prelude module for common imports

// Re-export publish types with full paths
pub use crate::environment::Environment;
pub use crate::publish::commit::{CommitOutcome, SkipReason};
pub use crate::publish::config::{ArtifactItem, Credential, PublishConfig, Strategy};
pub use crate::publish::errors::{PublishError, PublishResult};
pub use crate::publish::session::{PublishOutcome, PublishSession};
pub use crate::publish::sync::WorkingCopySynchronizer;

// Re-export repository and executor capabilities
pub use crate::executor::{LocalExecutor, RemoteExecutor, UnitOfWork, WorkOutput};
pub use crate::repo::{Depth, MemoryRepository, PathKind, RepositoryClient, SvnCliClient};
