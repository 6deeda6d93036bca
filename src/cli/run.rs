//! `artipub run` - Execute one publish invocation
//!
//! Loads the step configuration, builds the invocation environment from the
//! process environment plus `--param` overrides, connects to the repository
//! and runs the session with a local executor.

use crate::environment::Environment;
use crate::publish::commit::CommitOutcome;
use crate::publish::config::{Credential, PublishConfig};
use crate::publish::session::PublishSession;
use crate::repo::SvnCliClient;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Runs a publish invocation from `config_path`
pub fn run_publish(
    config_path: &Path,
    base_dir: Option<PathBuf>,
    workspace: Option<PathBuf>,
    params: &[String],
) -> Result<()> {
    let config = PublishConfig::load(config_path)
        .with_context(|| format!("cannot load configuration from {}", config_path.display()))?;

    let mut env = Environment::from_process();
    for param in params {
        let (key, value) = param
            .split_once('=')
            .with_context(|| format!("parameter '{param}' is not KEY=VALUE"))?;
        env.insert(key, value);
    }

    let base_dir = match base_dir {
        Some(dir) => dir,
        None => std::env::current_dir().context("cannot determine current directory")?,
    };
    let workspace = workspace
        .or_else(|| env.get("WORKSPACE").map(PathBuf::from))
        .unwrap_or_else(|| base_dir.clone());

    let session = PublishSession::new(&config, env, workspace, base_dir)?;
    let client = SvnCliClient::connect(session.repository_url(), credential_from_env())?;
    let outcome = session.run_local(Arc::new(client))?;

    match outcome.commit {
        CommitOutcome::Committed(revision) => {
            println!(
                "Committed revision {revision} ({} file(s) published)",
                outcome.staged.len()
            );
        }
        CommitOutcome::Skipped(reason) => {
            println!("No commit issued ({reason:?})");
        }
    }
    Ok(())
}

/// Credential material from the environment; resolution of the configured
/// credentials id against a store belongs to the host build system
fn credential_from_env() -> Credential {
    Credential {
        username: std::env::var("ARTIPUB_USERNAME").ok(),
        password: std::env::var("ARTIPUB_PASSWORD").ok(),
    }
}
