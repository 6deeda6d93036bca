//! `artipub check` - Validate a step configuration
//!
//! Validates the configuration file and, unless `--offline` is given,
//! attempts a repository connection, mirroring what a publish invocation
//! would do before any filesystem work.

use crate::environment::Environment;
use crate::publish::config::{Credential, PublishConfig};
use crate::repo::SvnCliClient;
use anyhow::{Context, Result};
use std::path::Path;

/// Validates `config_path` and optionally the repository connection
pub fn check_config(config_path: &Path, offline: bool) -> Result<()> {
    let raw = PublishConfig::load(config_path)
        .with_context(|| format!("cannot load configuration from {}", config_path.display()))?;
    raw.validate()?;
    // Same order as a publish invocation: substitute variables, then check
    // the resolved URL
    let config = raw.resolved(&Environment::from_process());
    config.validate_resolved()?;
    println!(
        "Configuration is valid: {} artifact item(s), strategy '{}'",
        config.artifacts.len(),
        config.strategy
    );

    if offline {
        return Ok(());
    }

    let credential = Credential {
        username: std::env::var("ARTIPUB_USERNAME").ok(),
        password: std::env::var("ARTIPUB_PASSWORD").ok(),
    };
    SvnCliClient::connect(&config.repository_url, credential)?;
    println!("Connected to repository {}", config.repository_url);
    Ok(())
}
