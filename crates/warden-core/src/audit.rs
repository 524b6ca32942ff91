//! Decision audit trail.
//!
//! Every non-dry-run decision is persisted as one append-only record whose
//! id becomes the trace id returned to the caller.

use std::sync::Arc;

use serde_json::{Map, Value};

use crate::AuthzResult;
use crate::storage::AuditStore;
use crate::types::{AuditEntry, AuthRequest};

/// Writes decision records to the audit store.
#[derive(Clone)]
pub struct Auditor {
    store: Arc<dyn AuditStore>,
}

impl Auditor {
    /// Creates a new auditor over the given store.
    #[must_use]
    pub fn new(store: Arc<dyn AuditStore>) -> Self {
        Self { store }
    }

    /// Appends one audit record for a computed decision and returns the
    /// assigned trace id.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails. Such a failure
    /// must be surfaced to the caller; it never alters the decision that
    /// was already computed.
    pub async fn record(
        &self,
        request: &AuthRequest,
        decision: bool,
        reason: &str,
    ) -> AuthzResult<i64> {
        let entry = AuditEntry {
            subject: render_attributes(&request.subject),
            action: request.action.clone(),
            resource: render_attributes(&request.resource),
            decision,
            explanation: reason.to_string(),
        };

        let trace_id = self.store.append(&entry).await?;
        tracing::debug!(trace_id, decision, "audit record written");
        Ok(trace_id)
    }
}

/// Renders an attribute map as canonical JSON.
///
/// `serde_json` maps iterate in key order, so the rendering is stable for
/// equal maps regardless of insertion order.
fn render_attributes(attributes: &Map<String, Value>) -> String {
    Value::Object(attributes.clone()).to_string()
}
