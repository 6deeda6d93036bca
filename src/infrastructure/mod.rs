//! Infrastructure layer
//!
//! Process-level concerns that sit outside the publish domain.

mod logging;

pub use logging::init_logging;
