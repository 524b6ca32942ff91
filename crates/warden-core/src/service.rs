//! The authorization decision pipeline.
//!
//! Orchestrates the cache, registry, role graph, evaluator and auditor
//! into the single `authorize` entry point (and its batch variant).

use std::sync::Arc;

use crate::AuthzResult;
use crate::audit::Auditor;
use crate::cache::ActivePolicyCache;
use crate::evaluator::{self, NO_ACTIVE_POLICY_REASON};
use crate::graph::RoleGraph;
use crate::registry::PolicyRegistry;
use crate::types::{AuthRequest, AuthResponse};

/// Evaluates authorization requests against the active policy.
pub struct DecisionService {
    graph: RoleGraph,
    registry: PolicyRegistry,
    cache: ActivePolicyCache,
    auditor: Auditor,
}

impl DecisionService {
    /// Creates a new decision service from its collaborators.
    ///
    /// The cache handle must be the same one the registry installs into on
    /// activation, otherwise decisions would not observe activations.
    #[must_use]
    pub fn new(
        graph: RoleGraph,
        registry: PolicyRegistry,
        cache: ActivePolicyCache,
        auditor: Auditor,
    ) -> Self {
        Self {
            graph,
            registry,
            cache,
            auditor,
        }
    }

    /// Evaluates one authorization request.
    ///
    /// With no active policy (or a store failure while fetching it on a
    /// cold cache), the result is a deny with the system-error reason and
    /// no audit record. Otherwise the subject's role is expanded one hop,
    /// the active policy's rules are evaluated first-match-wins, and the
    /// decision is audited unless `dry_run` is set.
    ///
    /// # Errors
    ///
    /// Returns an error if role expansion or the audit write fails. An
    /// audit failure never alters the computed decision; it surfaces as a
    /// storage error after the fact.
    pub async fn authorize(&self, request: &AuthRequest) -> AuthzResult<AuthResponse> {
        let role = request.subject_role();
        tracing::info!(
            role,
            action = request.action.as_str(),
            dry_run = request.dry_run,
            "authorization request"
        );

        let policy = match self.cache.get().await {
            Some(policy) => Some(policy),
            None => {
                tracing::debug!("active-policy cache miss, fetching from store");
                match self.registry.active().await {
                    Ok(Some(policy)) => {
                        Some(self.cache.install_if_empty(Arc::new(policy)).await)
                    }
                    Ok(None) => None,
                    Err(err) => {
                        tracing::warn!(error = %err, "active policy fetch failed");
                        None
                    }
                }
            }
        };

        let Some(policy) = policy else {
            tracing::error!("no active policy found");
            return Ok(AuthResponse {
                decision: false,
                reason: NO_ACTIVE_POLICY_REASON.to_string(),
                trace_id: None,
            });
        };

        let expanded_roles = self.graph.expand(role).await?;
        let evaluation = evaluator::evaluate(
            &expanded_roles,
            &request.action,
            &request.resource,
            policy.rules(),
        );
        tracing::info!(
            decision = evaluation.decision,
            reason = evaluation.reason.as_str(),
            policy_id = policy.id,
            "authorization decision"
        );

        let trace_id = if request.dry_run {
            tracing::debug!("dry run, skipping audit record");
            None
        } else {
            Some(
                self.auditor
                    .record(request, evaluation.decision, &evaluation.reason)
                    .await?,
            )
        };

        Ok(AuthResponse {
            decision: evaluation.decision,
            reason: evaluation.reason,
            trace_id,
        })
    }

    /// Evaluates a batch of requests in declared order.
    ///
    /// Each request is evaluated and audited independently; an empty input
    /// yields an empty output.
    ///
    /// # Errors
    ///
    /// Returns the first error encountered; responses for requests before
    /// it are discarded.
    pub async fn authorize_batch(
        &self,
        requests: &[AuthRequest],
    ) -> AuthzResult<Vec<AuthResponse>> {
        let mut responses = Vec::with_capacity(requests.len());
        for request in requests {
            responses.push(self.authorize(request).await?);
        }
        Ok(responses)
    }
}
