//! # warden-core
//!
//! Core authorization engine for the warden decision service.
//!
//! This crate provides:
//! - Role-based access control with a one-hop role-inheritance graph
//! - Attribute-based rule conditions with equality matching
//! - Versioned policies with a single-active-policy invariant
//! - A single-slot cache for the active policy
//! - A pure first-match-wins rule evaluator
//! - An append-only audit trail yielding trace ids
//!
//! Persistence is abstracted behind the [`storage`] traits; backends live
//! in sibling crates (e.g. `warden-postgres`). The HTTP transport is a
//! thin adapter in `warden-server`.
//!
//! ## Modules
//!
//! - [`types`] - Domain types (roles, policies, requests, audit entries)
//! - [`error`] - Error types
//! - [`storage`] - Persistence traits implemented by backends
//! - [`graph`] - Role-inheritance graph with cycle prevention
//! - [`registry`] - Policy creation, versioning and activation
//! - [`cache`] - Single-slot active-policy cache
//! - [`evaluator`] - Pure rule evaluation
//! - [`audit`] - Decision audit trail
//! - [`service`] - The authorization decision pipeline

pub mod audit;
pub mod cache;
pub mod error;
pub mod evaluator;
pub mod graph;
pub mod registry;
pub mod service;
pub mod storage;
pub mod types;

pub use audit::Auditor;
pub use cache::ActivePolicyCache;
pub use error::AuthzError;
pub use evaluator::{Evaluation, IMPLICIT_DENY_REASON, NO_ACTIVE_POLICY_REASON, evaluate};
pub use graph::RoleGraph;
pub use registry::PolicyRegistry;
pub use service::DecisionService;
pub use storage::{AuditStore, PolicyStore, RoleStore};
pub use types::{AuditEntry, AuthRequest, AuthResponse, Policy, Role};

/// Type alias for authorization results.
pub type AuthzResult<T> = Result<T, AuthzError>;
