//! Authorization error types.
//!
//! This module defines all error types that can occur during authorization
//! and policy-management operations.

/// Errors that can occur during authorization and policy-management
/// operations.
#[derive(Debug, thiserror::Error)]
pub enum AuthzError {
    /// Creating the role would introduce a cycle in the inheritance graph.
    #[error("Cycle detected: {message}")]
    CycleDetected {
        /// Description of the rejected inheritance edge.
        message: String,
    },

    /// A declared parent role does not exist.
    #[error("Parent role '{name}' not found")]
    UnknownParent {
        /// The missing parent role name.
        name: String,
    },

    /// A uniqueness constraint was violated (duplicate role name or
    /// policy version).
    #[error("Conflict: {message}")]
    Conflict {
        /// Description of the conflicting write.
        message: String,
    },

    /// The requested entity does not exist.
    #[error("Not found: {message}")]
    NotFound {
        /// Description of what was looked up.
        message: String,
    },

    /// An error occurred while reading or writing persistent state.
    #[error("Storage error: {message}")]
    Storage {
        /// Description of the storage failure.
        message: String,
    },

    /// The service configuration is invalid.
    #[error("Configuration error: {message}")]
    Configuration {
        /// Description of the configuration error.
        message: String,
    },
}

impl AuthzError {
    /// Creates a new `CycleDetected` error.
    #[must_use]
    pub fn cycle_detected(message: impl Into<String>) -> Self {
        Self::CycleDetected {
            message: message.into(),
        }
    }

    /// Creates a new `UnknownParent` error.
    #[must_use]
    pub fn unknown_parent(name: impl Into<String>) -> Self {
        Self::UnknownParent { name: name.into() }
    }

    /// Creates a new `Conflict` error.
    #[must_use]
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    /// Creates a new `NotFound` error.
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Creates a new `Storage` error.
    #[must_use]
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Creates a new `Configuration` error.
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Returns `true` if this is a client error (4xx category).
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::CycleDetected { .. }
                | Self::UnknownParent { .. }
                | Self::Conflict { .. }
                | Self::NotFound { .. }
        )
    }

    /// Returns `true` if this is a server error (5xx category).
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        matches!(self, Self::Storage { .. } | Self::Configuration { .. })
    }

    /// Returns `true` if this is a `NotFound` or `UnknownParent` error.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::UnknownParent { .. })
    }

    /// Returns `true` if this is a `Conflict` error.
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AuthzError::cycle_detected("a role cannot inherit from itself");
        assert_eq!(
            err.to_string(),
            "Cycle detected: a role cannot inherit from itself"
        );

        let err = AuthzError::unknown_parent("manager");
        assert_eq!(err.to_string(), "Parent role 'manager' not found");

        let err = AuthzError::not_found("Policy 42");
        assert_eq!(err.to_string(), "Not found: Policy 42");

        let err = AuthzError::storage("connection refused");
        assert_eq!(err.to_string(), "Storage error: connection refused");
    }

    #[test]
    fn test_error_predicates() {
        let err = AuthzError::cycle_detected("self reference");
        assert!(err.is_client_error());
        assert!(!err.is_server_error());

        let err = AuthzError::unknown_parent("ghost");
        assert!(err.is_client_error());
        assert!(err.is_not_found());

        let err = AuthzError::conflict("role 'admin' already exists");
        assert!(err.is_conflict());
        assert!(err.is_client_error());

        let err = AuthzError::storage("database down");
        assert!(!err.is_client_error());
        assert!(err.is_server_error());
    }
}
