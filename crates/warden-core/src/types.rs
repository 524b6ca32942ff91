//! Domain types shared across the authorization service.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use time::OffsetDateTime;

// =============================================================================
// Role
// =============================================================================

/// A role in the authorization system.
///
/// Roles form a directed acyclic inheritance graph; edges are kept in the
/// store and resolved through [`crate::graph::RoleGraph`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    /// Stable integer identity.
    pub id: i64,

    /// Globally unique role name.
    pub name: String,

    /// Human-readable description of the role.
    pub description: Option<String>,
}

// =============================================================================
// Policy
// =============================================================================

/// A versioned authorization policy.
///
/// Policies are grouped by `name`; within a name, versions are strictly
/// increasing starting at 1. At most one policy is active at any time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Policy {
    /// Stable integer identity.
    pub id: i64,

    /// Name grouping a family of versions.
    pub name: String,

    /// Version within the `name` family, starting at 1.
    pub version: i32,

    /// Structured policy document. The single recognized key is `rules`,
    /// an ordered sequence of rule objects.
    pub content: Value,

    /// Whether this policy is the active one.
    pub is_active: bool,

    /// When this version was created.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl Policy {
    /// Returns the ordered rule sequence of this policy.
    ///
    /// A missing `rules` key or a `rules` value that is not an array is
    /// treated as an empty sequence, so malformed policy documents degrade
    /// to implicit deny instead of erroring.
    #[must_use]
    pub fn rules(&self) -> &[Value] {
        self.content
            .get("rules")
            .and_then(Value::as_array)
            .map_or(&[], Vec::as_slice)
    }
}

// =============================================================================
// Authorization Request / Response
// =============================================================================

/// An authorization request: who wants to do what to which resource.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthRequest {
    /// Subject attributes. The recognized key is `role`.
    pub subject: Map<String, Value>,

    /// The action being attempted.
    pub action: String,

    /// Resource attributes matched against rule `resource_match` conditions.
    pub resource: Map<String, Value>,

    /// When true, the decision is computed but not audited.
    #[serde(default)]
    pub dry_run: bool,
}

impl AuthRequest {
    /// Returns the subject's declared role.
    ///
    /// A missing, empty, or non-string `role` value defaults to `"guest"`.
    #[must_use]
    pub fn subject_role(&self) -> &str {
        self.subject
            .get("role")
            .and_then(Value::as_str)
            .filter(|role| !role.is_empty())
            .unwrap_or("guest")
    }
}

/// The outcome of an authorization request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthResponse {
    /// `true` for allow, `false` for deny.
    pub decision: bool,

    /// Human-readable explanation of the decision.
    pub reason: String,

    /// Id of the audit record written for this decision.
    ///
    /// Present iff an audit record was written (`dry_run == false` and no
    /// system-error short circuit).
    pub trace_id: Option<i64>,
}

// =============================================================================
// Audit Entry
// =============================================================================

/// One audit-trail entry describing a non-dry-run decision.
///
/// Subject and resource are persisted as canonical JSON renderings with
/// lexicographically sorted keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEntry {
    /// Textual rendering of the request's subject attributes.
    pub subject: String,

    /// The attempted action.
    pub action: String,

    /// Textual rendering of the request's resource attributes.
    pub resource: String,

    /// The decision that was made.
    pub decision: bool,

    /// The reason string returned to the caller.
    pub explanation: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn policy_with_content(content: Value) -> Policy {
        Policy {
            id: 1,
            name: "default".to_string(),
            version: 1,
            content,
            is_active: true,
            created_at: OffsetDateTime::UNIX_EPOCH,
        }
    }

    #[test]
    fn test_policy_rules() {
        let policy = policy_with_content(json!({
            "rules": [{"role": "admin", "action": "*", "effect": "allow"}]
        }));
        assert_eq!(policy.rules().len(), 1);
    }

    #[test]
    fn test_policy_rules_missing_key() {
        let policy = policy_with_content(json!({}));
        assert!(policy.rules().is_empty());
    }

    #[test]
    fn test_policy_rules_not_an_array() {
        let policy = policy_with_content(json!({"rules": "everything goes"}));
        assert!(policy.rules().is_empty());

        let policy = policy_with_content(json!("not even an object"));
        assert!(policy.rules().is_empty());
    }

    #[test]
    fn test_subject_role_defaults_to_guest() {
        let request: AuthRequest = serde_json::from_value(json!({
            "subject": {},
            "action": "read",
            "resource": {}
        }))
        .unwrap();
        assert_eq!(request.subject_role(), "guest");
        assert!(!request.dry_run);
    }

    #[test]
    fn test_subject_role_empty_or_non_string_defaults_to_guest() {
        let request: AuthRequest = serde_json::from_value(json!({
            "subject": {"role": ""},
            "action": "read",
            "resource": {}
        }))
        .unwrap();
        assert_eq!(request.subject_role(), "guest");

        let request: AuthRequest = serde_json::from_value(json!({
            "subject": {"role": 7},
            "action": "read",
            "resource": {}
        }))
        .unwrap();
        assert_eq!(request.subject_role(), "guest");
    }

    #[test]
    fn test_subject_role_declared() {
        let request: AuthRequest = serde_json::from_value(json!({
            "subject": {"role": "manager", "dept": "sales"},
            "action": "read",
            "resource": {},
            "dry_run": true
        }))
        .unwrap();
        assert_eq!(request.subject_role(), "manager");
        assert!(request.dry_run);
    }
}
