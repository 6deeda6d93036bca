//! `${NAME}` placeholder resolution.
//!
//! Every free-text field of the step configuration (patterns, paths, trigger
//! clauses, the commit message and the repository URL) passes through
//! [`resolve`] before any repository or filesystem work starts.
//!
//! Semantics:
//!
//! - A template without any `${...}` token is returned unchanged.
//! - Every `${name}` whose name is present in the environment is replaced by
//!   the trimmed value.
//! - Unknown names stay verbatim, so a re-run with a richer environment can
//!   still resolve them.
//! - Malformed brace syntax (`${name` without a closing `}`) is literal text.

use crate::environment::Environment;
use once_cell::sync::Lazy;
use regex::Regex;

// Build parameters may carry dots and dashes in their names, so the name
// class accepts anything up to the closing brace.
static VAR_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\$\{([^{}]+)\}").unwrap());

/// Expands `${NAME}` tokens in `template` against `env`
///
/// Pure function; the environment value is trimmed before insertion, unknown
/// tokens are kept as-is.
///
/// # Example
///
/// ```rust
/// use artipub::{Environment, resolve};
///
/// let mut env = Environment::new();
/// env.insert("BUILD_NUMBER", "123");
/// assert_eq!(resolve("build-${BUILD_NUMBER}.jar", &env), "build-123.jar");
/// assert_eq!(resolve("${UNKNOWN}", &env), "${UNKNOWN}");
/// ```
#[must_use]
pub fn resolve(template: &str, env: &Environment) -> String {
    if !VAR_PATTERN.is_match(template) {
        return template.to_string();
    }

    VAR_PATTERN
        .replace_all(template, |caps: &regex::Captures| {
            let name = caps.get(1).map_or("", |m| m.as_str());
            match env.get(name) {
                Some(value) => value.trim().to_string(),
                // Keep the token if the variable is not defined
                None => caps
                    .get(0)
                    .map_or_else(String::new, |m| m.as_str().to_string()),
            }
        })
        .to_string()
}

/// Resolves a field in place, used by the per-type field tables
pub(crate) fn resolve_field(field: &mut String, env: &Environment) {
    let resolved = resolve(field, env);
    if resolved != *field {
        *field = resolved;
    }
}
