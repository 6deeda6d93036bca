//! Step configuration: artifact items, strategy and validation.
//!
//! The host build system hands the core one [`PublishConfig`] per invocation.
//! The original configuration is never mutated; variable substitution happens
//! on a deep copy via [`PublishConfig::resolved`].

use crate::environment::Environment;
use crate::publish::errors::{PublishError, PublishResult};
use crate::publish::{trigger, vars};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Commit gating strategy for a publish step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Stage every item regardless of its trigger clauses
    Always,
    /// Reconcile directories but never commit
    Never,
    /// Stage items whose trigger clauses match the environment
    #[default]
    Trigger,
}

impl Strategy {
    /// True when item-level trigger clauses are overridden
    #[must_use]
    pub fn is_always(self) -> bool {
        matches!(self, Self::Always)
    }

    /// True when the commit is unconditionally skipped
    #[must_use]
    pub fn is_never(self) -> bool {
        matches!(self, Self::Never)
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Always => "always",
            Self::Never => "never",
            Self::Trigger => "trigger",
        };
        f.write_str(s)
    }
}

impl FromStr for Strategy {
    type Err = PublishError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "always" => Ok(Self::Always),
            "never" => Ok(Self::Never),
            "trigger" => Ok(Self::Trigger),
            other => Err(PublishError::InvalidConfiguration(format!(
                "unknown strategy '{other}', expected always, never or trigger"
            ))),
        }
    }
}

/// One publish rule: which local files go where in the repository
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ArtifactItem {
    /// Glob pattern used to find files covered by this item
    pub pattern: String,

    /// Glob pattern for files to leave out; empty means no exclusions
    pub exclude_pattern: String,

    /// Path within the repository where matched files are placed;
    /// empty means the repository root
    pub destination_path: String,

    /// Path, relative to the base local directory, where matching is rooted
    pub local_path: String,

    /// Explicit destination name; only applies when exactly one file matches
    pub rename_to: String,

    /// Comma-separated `key=value` trigger clauses; empty means always eligible
    pub params: String,
}

impl ArtifactItem {
    /// Creates an item matching `pattern` under `local_path`
    #[must_use]
    pub fn new(pattern: impl Into<String>, local_path: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            local_path: local_path.into(),
            ..Self::default()
        }
    }

    /// Sets the repository destination path
    #[must_use]
    pub fn with_destination(mut self, path: impl Into<String>) -> Self {
        self.destination_path = path.into();
        self
    }

    /// Sets the exclude pattern
    #[must_use]
    pub fn with_exclude(mut self, pattern: impl Into<String>) -> Self {
        self.exclude_pattern = pattern.into();
        self
    }

    /// Sets the single-match rename target
    #[must_use]
    pub fn with_rename(mut self, name: impl Into<String>) -> Self {
        self.rename_to = name.into();
        self
    }

    /// Sets the comma-separated trigger clauses
    #[must_use]
    pub fn with_params(mut self, params: impl Into<String>) -> Self {
        self.params = params.into();
        self
    }

    /// The trigger clauses in their internal, split form
    #[must_use]
    pub fn trigger_clauses(&self) -> Vec<String> {
        trigger::split_clauses(&self.params)
    }

    /// Expands `${NAME}` tokens in every free-text field
    ///
    /// The substitutable fields are enumerated here explicitly; adding a
    /// string field to this struct means adding it to this table.
    fn resolve_fields(&mut self, env: &Environment) {
        vars::resolve_field(&mut self.pattern, env);
        vars::resolve_field(&mut self.exclude_pattern, env);
        vars::resolve_field(&mut self.destination_path, env);
        vars::resolve_field(&mut self.local_path, env);
        vars::resolve_field(&mut self.rename_to, env);
        vars::resolve_field(&mut self.params, env);
    }
}

/// Credential material for the repository connection
///
/// Resolution from the host's credential store happens outside the core; the
/// pipeline only carries the result through to the repository client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credential {
    /// Username, when the credential carries one
    pub username: Option<String>,
    /// Password or token, when the credential carries one
    pub password: Option<String>,
}

impl Credential {
    /// Creates a username/password credential
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
            password: Some(password.into()),
        }
    }
}

/// Parameters of one publish step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct PublishConfig {
    /// Repository URL the working copy is reconciled against
    pub repository_url: String,

    /// Identifier of the credential to use, resolved by the host
    pub credentials_id: String,

    /// Commit message template; `${NAME}` tokens are expanded
    pub commit_message: String,

    /// Commit gating strategy
    pub strategy: Strategy,

    /// Ordered list of publish rules
    pub artifacts: Vec<ArtifactItem>,
}

impl PublishConfig {
    /// Loads a configuration from a YAML or JSON file
    pub fn load(path: &Path) -> PublishResult<Self> {
        let raw = std::fs::read_to_string(path)?;
        let config: Self = match path.extension().and_then(|e| e.to_str()) {
            Some("json") => serde_json::from_str(&raw).map_err(|e| {
                PublishError::InvalidConfiguration(format!("{}: {e}", path.display()))
            })?,
            _ => serde_yaml::from_str(&raw).map_err(|e| {
                PublishError::InvalidConfiguration(format!("{}: {e}", path.display()))
            })?,
        };
        Ok(config)
    }

    /// Checks the configuration shape before any I/O happens
    ///
    /// Safe to call on a raw configuration: the repository URL may still
    /// carry `${NAME}` tokens at this point, so parseability is deferred to
    /// [`PublishConfig::validate_resolved`].
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` for an empty repository URL, an empty
    /// credentials id or an item without a pattern.
    pub fn validate(&self) -> PublishResult<()> {
        if self.repository_url.trim().is_empty() {
            return Err(PublishError::InvalidConfiguration(
                "repository URL must not be empty".to_string(),
            ));
        }
        if self.credentials_id.trim().is_empty() {
            return Err(PublishError::InvalidConfiguration(
                "credentials id must not be empty".to_string(),
            ));
        }
        for (index, item) in self.artifacts.iter().enumerate() {
            if item.pattern.trim().is_empty() {
                return Err(PublishError::InvalidConfiguration(format!(
                    "artifact item #{index} has an empty pattern"
                )));
            }
        }
        Ok(())
    }

    /// Full validation of a variable-resolved configuration
    ///
    /// # Errors
    ///
    /// Everything [`PublishConfig::validate`] rejects, plus an unparsable
    /// repository URL.
    pub fn validate_resolved(&self) -> PublishResult<()> {
        self.validate()?;
        if let Err(e) = url::Url::parse(&self.repository_url) {
            return Err(PublishError::InvalidConfiguration(format!(
                "repository URL '{}' is not valid: {e}",
                self.repository_url
            )));
        }
        Ok(())
    }

    /// Returns a deep copy with `${NAME}` tokens expanded in every free-text
    /// field, leaving `self` untouched
    #[must_use]
    pub fn resolved(&self, env: &Environment) -> Self {
        let mut copy = self.clone();
        vars::resolve_field(&mut copy.repository_url, env);
        vars::resolve_field(&mut copy.commit_message, env);
        for item in &mut copy.artifacts {
            item.resolve_fields(env);
        }
        copy
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn valid_config() -> PublishConfig {
        PublishConfig {
            repository_url: "https://svn.example.com/repo/releases".to_string(),
            credentials_id: "svn-ci".to_string(),
            commit_message: "Publish ${BUILD_NUMBER}".to_string(),
            strategy: Strategy::Trigger,
            artifacts: vec![ArtifactItem::new("*.jar", "build/libs")],
        }
    }

    #[test]
    fn test_validate_accepts_valid_config() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_url() {
        let mut config = valid_config();
        config.repository_url = "  ".to_string();
        assert!(matches!(
            config.validate(),
            Err(PublishError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_validate_rejects_empty_credentials() {
        let mut config = valid_config();
        config.credentials_id = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_resolved_rejects_unparsable_url() {
        let mut config = valid_config();
        config.repository_url = "not a url".to_string();
        assert!(config.validate_resolved().is_err());
    }

    #[test]
    fn test_validate_accepts_placeholder_url_before_resolution() {
        let mut config = valid_config();
        config.repository_url = "${SVN_URL}".to_string();
        // Parseability is only checked once variables are substituted
        assert!(config.validate().is_ok());
        assert!(config.validate_resolved().is_err());

        let mut env = Environment::new();
        env.insert("SVN_URL", "https://svn.example.com/repo");
        assert!(config.resolved(&env).validate_resolved().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_pattern() {
        let mut config = valid_config();
        config.artifacts.push(ArtifactItem::default());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_resolved_does_not_mutate_original() {
        let mut env = Environment::new();
        env.insert("BUILD_NUMBER", "7");
        env.insert("STAGE", "release");

        let mut config = valid_config();
        config.artifacts[0].destination_path = "releases/${STAGE}".to_string();

        let resolved = config.resolved(&env);
        assert_eq!(resolved.commit_message, "Publish 7");
        assert_eq!(resolved.artifacts[0].destination_path, "releases/release");
        // The original is untouched
        assert_eq!(config.commit_message, "Publish ${BUILD_NUMBER}");
        assert_eq!(config.artifacts[0].destination_path, "releases/${STAGE}");
    }

    #[test]
    fn test_strategy_round_trip() {
        for (text, strategy) in [
            ("always", Strategy::Always),
            ("never", Strategy::Never),
            ("trigger", Strategy::Trigger),
        ] {
            assert_eq!(text.parse::<Strategy>().unwrap(), strategy);
            assert_eq!(strategy.to_string(), text);
        }
        assert!("sometimes".parse::<Strategy>().is_err());
    }

    #[test]
    fn test_config_deserializes_from_yaml() {
        let yaml = r#"
repositoryUrl: "https://svn.example.com/repo"
credentialsId: "svn-ci"
commitMessage: "Publish build ${BUILD_NUMBER}"
strategy: trigger
artifacts:
  - pattern: "*.jar"
    localPath: "build/libs"
    destinationPath: "releases"
    renameTo: "app.jar"
    params: "STAGE=release"
"#;
        let config: PublishConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.strategy, Strategy::Trigger);
        assert_eq!(config.artifacts.len(), 1);
        assert_eq!(config.artifacts[0].rename_to, "app.jar");
        assert_eq!(config.artifacts[0].trigger_clauses(), vec!["STAGE=release"]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_item_defaults_are_empty() {
        let item = ArtifactItem::new("*.zip", "dist");
        assert_eq!(item.exclude_pattern, "");
        assert_eq!(item.destination_path, "");
        assert_eq!(item.rename_to, "");
        assert!(item.trigger_clauses().is_empty());
    }
}
