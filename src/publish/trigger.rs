//! Per-item trigger evaluation.
//!
//! An artifact item carries an ordered list of `key=value` clauses. The item
//! only contributes files when every clause matches the invocation
//! environment. Parsing is fail-closed: a clause that is not exactly one
//! `key=value` pair makes the whole item ineligible.

use crate::environment::Environment;
use tracing::debug;

/// Decides whether an artifact item is eligible to publish
///
/// - With the `always` strategy eligibility is unconditional.
/// - An empty clause list is eligible.
/// - An empty-string clause stops evaluation with the verdict so far; clauses
///   before it must already have matched.
/// - Otherwise all clauses must parse as exactly one `key=value` pair and the
///   value must equal the environment's value for `key` exactly
///   (case-sensitive). Logical AND only.
#[must_use]
pub fn is_eligible(clauses: &[String], env: &Environment, strategy_is_always: bool) -> bool {
    if strategy_is_always {
        return true;
    }

    for clause in clauses {
        if clause.is_empty() {
            break;
        }
        let Some((key, value)) = parse_clause(clause) else {
            debug!(clause = %clause, "malformed trigger clause, item ineligible");
            return false;
        };
        if env.get(key) != Some(value) {
            debug!(
                clause = %clause,
                env_value = ?env.get(key),
                "trigger clause does not match environment"
            );
            return false;
        }
    }

    true
}

/// Parses a clause into `(key, value)`; `None` when malformed
///
/// A clause is well-formed when it contains exactly one `=` and the value is
/// non-empty.
fn parse_clause(clause: &str) -> Option<(&str, &str)> {
    if clause.matches('=').count() != 1 {
        return None;
    }
    let (key, value) = clause.split_once('=')?;
    if value.is_empty() {
        return None;
    }
    Some((key, value))
}

/// Splits the comma-separated external form into individual clauses
#[must_use]
pub fn split_clauses(params: &str) -> Vec<String> {
    if params.is_empty() {
        return Vec::new();
    }
    params.split(',').map(|s| s.trim().to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env_with(pairs: &[(&str, &str)]) -> Environment {
        let mut env = Environment::new();
        for (k, v) in pairs {
            env.insert(*k, *v);
        }
        env
    }

    fn clauses(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn test_empty_clause_list_is_eligible() {
        let env = env_with(&[]);
        assert!(is_eligible(&[], &env, false));
    }

    #[test]
    fn test_single_empty_clause_is_eligible() {
        let env = env_with(&[]);
        assert!(is_eligible(&clauses(&[""]), &env, false));
    }

    #[test]
    fn test_matching_clause_is_eligible() {
        let env = env_with(&[("STAGE", "release")]);
        assert!(is_eligible(&clauses(&["STAGE=release"]), &env, false));
    }

    #[test]
    fn test_non_matching_clause_is_ineligible() {
        let env = env_with(&[("STAGE", "debug")]);
        assert!(!is_eligible(&clauses(&["STAGE=release"]), &env, false));
    }

    #[test]
    fn test_match_is_case_sensitive() {
        let env = env_with(&[("STAGE", "Release")]);
        assert!(!is_eligible(&clauses(&["STAGE=release"]), &env, false));
    }

    #[test]
    fn test_and_semantics_all_must_hold() {
        let env = env_with(&[("STAGE", "release"), ("ARCH", "x86_64")]);
        assert!(is_eligible(
            &clauses(&["STAGE=release", "ARCH=x86_64"]),
            &env,
            false
        ));
        assert!(!is_eligible(
            &clauses(&["STAGE=release", "ARCH=arm64"]),
            &env,
            false
        ));
    }

    #[test]
    fn test_malformed_clause_fails_closed() {
        let env = env_with(&[("STAGE", "release")]);
        // No '=' at all
        assert!(!is_eligible(&clauses(&["STAGE=release", "ARCH"]), &env, false));
        // Two '='
        assert!(!is_eligible(&clauses(&["A=b=c"]), &env, false));
        // Empty value
        assert!(!is_eligible(&clauses(&["STAGE="]), &env, false));
    }

    #[test]
    fn test_missing_env_key_is_ineligible() {
        let env = env_with(&[]);
        assert!(!is_eligible(&clauses(&["STAGE=release"]), &env, false));
    }

    #[test]
    fn test_always_strategy_overrides_clauses() {
        let env = env_with(&[]);
        assert!(is_eligible(&clauses(&["STAGE=release"]), &env, true));
        assert!(is_eligible(&clauses(&["not-a-clause"]), &env, true));
    }

    #[test]
    fn test_empty_clause_stops_evaluation() {
        let env = env_with(&[("STAGE", "release")]);
        // The clause after the empty one is never reached
        assert!(is_eligible(
            &clauses(&["STAGE=release", "", "ARCH=arm64"]),
            &env,
            false
        ));
    }

    #[test]
    fn test_split_clauses() {
        assert_eq!(split_clauses(""), Vec::<String>::new());
        assert_eq!(split_clauses("A=1"), vec!["A=1"]);
        assert_eq!(split_clauses("A=1, B=2"), vec!["A=1", "B=2"]);
    }
}
