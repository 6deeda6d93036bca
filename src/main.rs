//! artipub - publish build artifacts into a version-controlled repository
//!
//! Command-line entry point for running artipub as a build step.
//!
//! ## Commands
//!
//! - `artipub run` - Execute one publish invocation from a config file
//! - `artipub check` - Validate a config and the repository connection
//! - `artipub completions` - Generate shell completions
//!
//! ## Quick Start
//!
//! ```bash
//! # Validate the step configuration and the repository connection
//! artipub check --config publish.yaml
//!
//! # Publish from a CI build
//! artipub run --config publish.yaml --base-dir "$WORKSPACE" \
//!     --param BUILD_NUMBER=42 --param STAGE=release
//! ```

use anyhow::Result;
use std::process::ExitCode;

fn main() -> ExitCode {
    artipub::init_logging(
        &std::env::var("ARTIPUB_LOG").unwrap_or_else(|_| "info".to_string()),
    );

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            if std::env::var("ARTIPUB_VERBOSE").is_ok() {
                eprintln!("{e:?}");
            }
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    artipub::cli::run()
}
