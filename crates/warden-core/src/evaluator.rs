//! Pure policy evaluation.
//!
//! Deterministic first-match-wins evaluation of an ordered rule list over
//! an expanded role set. The evaluator performs no I/O and holds no state;
//! repeated evaluation with equal inputs yields byte-equal reason strings.

use std::collections::HashSet;

use serde_json::{Map, Value};

/// Reason returned when no rule matches the request.
pub const IMPLICIT_DENY_REASON: &str = "Implicit Deny: No matching rule found.";

/// Reason returned when no active policy exists.
///
/// Emitted by the decision service, never by [`evaluate`] itself.
pub const NO_ACTIVE_POLICY_REASON: &str = "System Error: No active policy found.";

/// Result of evaluating a rule list against a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluation {
    /// `true` for allow, `false` for deny.
    pub decision: bool,

    /// Human-readable explanation of the decision.
    pub reason: String,
}

/// Evaluates `rules` in order and returns the effect of the first rule
/// matching all three facets (role, action, resource attributes).
///
/// Facet semantics:
///
/// - role matches when the rule's `role` is `"*"` or is contained in
///   `expanded_roles`;
/// - action matches when the rule's `action` is `"*"` or equals `action`;
/// - the resource matches when `resource_match` is absent, null or empty,
///   or when every required key/value pair is present in `resource_attrs`.
///
/// A rule missing a facet field never matches that facet, and a
/// `resource_match` that is not an object never matches, so malformed
/// rules fall through to the implicit deny.
#[must_use]
pub fn evaluate(
    expanded_roles: &HashSet<String>,
    action: &str,
    resource_attrs: &Map<String, Value>,
    rules: &[Value],
) -> Evaluation {
    for (index, rule) in rules.iter().enumerate() {
        let Some(rule_role) = rule.get("role").and_then(Value::as_str) else {
            continue;
        };
        if rule_role != "*" && !expanded_roles.contains(rule_role) {
            continue;
        }

        let Some(rule_action) = rule.get("action").and_then(Value::as_str) else {
            continue;
        };
        if rule_action != "*" && rule_action != action {
            continue;
        }

        if !resource_matches(rule.get("resource_match"), resource_attrs) {
            continue;
        }

        let decision = rule.get("effect").and_then(Value::as_str) == Some("allow");
        return Evaluation {
            decision,
            reason: format!("Matched Rule #{index} (Role: {rule_role}, Action: {rule_action})."),
        };
    }

    Evaluation {
        decision: false,
        reason: IMPLICIT_DENY_REASON.to_string(),
    }
}

/// Checks the ABAC facet of a rule against the request's resource
/// attributes. A missing key in `resource_attrs` fails the match.
fn resource_matches(constraints: Option<&Value>, resource_attrs: &Map<String, Value>) -> bool {
    match constraints {
        None | Some(Value::Null) => true,
        Some(Value::Object(required)) => required
            .iter()
            .all(|(key, expected)| resource_attrs.get(key) == Some(expected)),
        Some(_) => false,
    }
}
