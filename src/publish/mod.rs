//! Publish pipeline domain
//!
//! This module contains the artifact-reconciliation core: configuration
//! types, variable resolution, trigger gating, working-copy synchronization,
//! commit coordination and the session façade that wires them together.

pub mod commit;
pub mod config;
pub mod errors;
pub mod session;
pub mod sync;
pub mod trigger;
pub mod vars;

pub use commit::{CommitOutcome, SkipReason};
pub use config::{ArtifactItem, Credential, PublishConfig, Strategy};
pub use errors::{PublishError, PublishResult};
pub use session::{PublishOutcome, PublishSession};
pub use sync::WorkingCopySynchronizer;
