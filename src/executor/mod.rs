//! Remote execution layer
//!
//! This module contains the bridge for running filesystem and working-copy
//! operations on the node that owns the build's files.

mod fs_ops;
mod local;
mod traits;

pub use fs_ops::{copy_file, create_dir_tree, match_files, remove_dir_tree};
pub use local::LocalExecutor;
pub use traits::{RemoteExecutor, UnitOfWork, WorkOutput};
