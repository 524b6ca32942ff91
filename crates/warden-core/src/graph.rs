//! Role-inheritance graph.
//!
//! A read-through view over the store's roles and edges. Edges are
//! directed child→parent and must stay acyclic; acyclicity is enforced at
//! creation time because roles are never mutated afterwards.

use std::collections::{HashSet, VecDeque};
use std::sync::Arc;

use crate::AuthzResult;
use crate::error::AuthzError;
use crate::storage::RoleStore;
use crate::types::Role;

/// Read-through view over the store's role-inheritance graph.
#[derive(Clone)]
pub struct RoleGraph {
    store: Arc<dyn RoleStore>,
}

impl RoleGraph {
    /// Creates a new graph over the given store.
    #[must_use]
    pub fn new(store: Arc<dyn RoleStore>) -> Self {
        Self { store }
    }

    /// Creates a role with zero or more declared parents.
    ///
    /// Every declared parent must already exist, which together with the
    /// ancestor-closure check below keeps the graph acyclic.
    ///
    /// # Errors
    ///
    /// - `CycleDetected` if the role names itself as a parent, or if any
    ///   declared parent already has the new name in its ancestor closure.
    /// - `UnknownParent` if a declared parent does not exist.
    /// - `Conflict` if a role with the same name already exists.
    pub async fn create(
        &self,
        name: &str,
        description: Option<&str>,
        parent_names: &[String],
    ) -> AuthzResult<Role> {
        tracing::info!(role = name, parents = ?parent_names, "creating role");

        if parent_names.iter().any(|parent| parent == name) {
            tracing::warn!(role = name, "rejected self-inheriting role");
            return Err(AuthzError::cycle_detected(
                "a role cannot inherit from itself",
            ));
        }

        let mut parent_ids = Vec::with_capacity(parent_names.len());
        for parent_name in parent_names {
            let parent = self
                .store
                .find_by_name(parent_name)
                .await?
                .ok_or_else(|| AuthzError::unknown_parent(parent_name))?;

            if self.ancestors_contain(&parent, name).await? {
                tracing::warn!(
                    role = name,
                    parent = parent_name.as_str(),
                    "rejected role that would close an inheritance cycle"
                );
                return Err(AuthzError::cycle_detected(format!(
                    "role '{name}' is already an ancestor of '{parent_name}'"
                )));
            }

            parent_ids.push(parent.id);
        }

        let role = self.store.create(name, description, &parent_ids).await?;
        tracing::info!(role = role.name.as_str(), role_id = role.id, "role created");
        Ok(role)
    }

    /// Expands a role name into the set used for rule matching: the name
    /// itself plus the names of its immediate parents.
    ///
    /// Expansion is deliberately one hop, not the transitive closure;
    /// widening it would change allow/deny outcomes for existing policies.
    /// An unknown role expands to `{name}` rather than erroring, so
    /// requests carrying not-yet-materialized roles still evaluate against
    /// wildcard and exact-string rules.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    pub async fn expand(&self, name: &str) -> AuthzResult<HashSet<String>> {
        let Some(role) = self.store.find_by_name(name).await? else {
            return Ok(HashSet::from([name.to_string()]));
        };

        let mut expanded = HashSet::from([role.name]);
        for parent in self.store.parents_of(role.id).await? {
            expanded.insert(parent.name);
        }
        Ok(expanded)
    }

    /// Walks the transitive ancestor closure of `start` looking for a role
    /// named `needle`.
    async fn ancestors_contain(&self, start: &Role, needle: &str) -> AuthzResult<bool> {
        if start.name == needle {
            return Ok(true);
        }

        let mut visited = HashSet::from([start.id]);
        let mut queue = VecDeque::from([start.id]);
        while let Some(role_id) = queue.pop_front() {
            for ancestor in self.store.parents_of(role_id).await? {
                if ancestor.name == needle {
                    return Ok(true);
                }
                if visited.insert(ancestor.id) {
                    queue.push_back(ancestor.id);
                }
            }
        }
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MockRoleStore {
        roles: Mutex<Vec<Role>>,
        edges: Mutex<Vec<(i64, i64)>>, // (parent_id, child_id)
    }

    impl MockRoleStore {
        fn with_roles(names: &[(&str, &[&str])]) -> Arc<Self> {
            let store = Arc::new(Self::default());
            for (name, parents) in names {
                let parent_ids: Vec<i64> = {
                    let roles = store.roles.lock().unwrap();
                    parents
                        .iter()
                        .map(|parent| {
                            roles
                                .iter()
                                .find(|role| role.name == *parent)
                                .expect("parent must be seeded first")
                                .id
                        })
                        .collect()
                };
                store.insert(name, &parent_ids);
            }
            store
        }

        fn insert(&self, name: &str, parent_ids: &[i64]) -> Role {
            let mut roles = self.roles.lock().unwrap();
            let role = Role {
                id: roles.len() as i64 + 1,
                name: name.to_string(),
                description: None,
            };
            roles.push(role.clone());
            let mut edges = self.edges.lock().unwrap();
            for parent_id in parent_ids {
                edges.push((*parent_id, role.id));
            }
            role
        }
    }

    #[async_trait]
    impl RoleStore for MockRoleStore {
        async fn find_by_name(&self, name: &str) -> AuthzResult<Option<Role>> {
            Ok(self
                .roles
                .lock()
                .unwrap()
                .iter()
                .find(|role| role.name == name)
                .cloned())
        }

        async fn parents_of(&self, role_id: i64) -> AuthzResult<Vec<Role>> {
            let edges = self.edges.lock().unwrap();
            let roles = self.roles.lock().unwrap();
            Ok(edges
                .iter()
                .filter(|(_, child)| *child == role_id)
                .filter_map(|(parent, _)| roles.iter().find(|role| role.id == *parent))
                .cloned()
                .collect())
        }

        async fn create(
            &self,
            name: &str,
            _description: Option<&str>,
            parent_ids: &[i64],
        ) -> AuthzResult<Role> {
            if self.roles.lock().unwrap().iter().any(|role| role.name == name) {
                return Err(AuthzError::conflict(format!(
                    "role '{name}' already exists"
                )));
            }
            Ok(self.insert(name, parent_ids))
        }
    }

    #[tokio::test]
    async fn test_create_rejects_self_parent() {
        let graph = RoleGraph::new(MockRoleStore::with_roles(&[]));
        let err = graph
            .create("admin", None, &["admin".to_string()])
            .await
            .unwrap_err();
        assert!(matches!(err, AuthzError::CycleDetected { .. }));
    }

    #[tokio::test]
    async fn test_create_rejects_unknown_parent() {
        let graph = RoleGraph::new(MockRoleStore::with_roles(&[]));
        let err = graph
            .create("child", None, &["ghost".to_string()])
            .await
            .unwrap_err();
        assert!(matches!(err, AuthzError::UnknownParent { name } if name == "ghost"));
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_name() {
        let store = MockRoleStore::with_roles(&[("employee", &[])]);
        let graph = RoleGraph::new(store);
        let err = graph.create("employee", None, &[]).await.unwrap_err();
        assert!(err.is_conflict());
    }

    #[tokio::test]
    async fn test_create_rejects_ancestor_cycle() {
        // grandparent -> parent chain already contains "grandparent", so a
        // new role named "grandparent"... cannot exist (duplicate). The
        // defense matters for a role whose name appears in a parent's
        // closure without being a stored role; simulate by checking the
        // closure directly through create's parent validation.
        let store = MockRoleStore::with_roles(&[("root", &[]), ("mid", &["root"])]);
        let graph = RoleGraph::new(store);
        // "root" is in mid's ancestor closure, so a role named "root"
        // declaring "mid" as parent would close a cycle.
        let err = graph
            .create("root", None, &["mid".to_string()])
            .await
            .unwrap_err();
        assert!(matches!(err, AuthzError::CycleDetected { .. }));
    }

    #[tokio::test]
    async fn test_create_with_parents_persists_edges() {
        let store = MockRoleStore::with_roles(&[("employee", &[])]);
        let graph = RoleGraph::new(store.clone());

        let role = graph
            .create("manager", Some("people lead"), &["employee".to_string()])
            .await
            .unwrap();
        assert_eq!(role.name, "manager");

        let expanded = graph.expand("manager").await.unwrap();
        assert_eq!(
            expanded,
            HashSet::from(["manager".to_string(), "employee".to_string()])
        );
    }

    #[tokio::test]
    async fn test_expand_unknown_role_returns_singleton() {
        let graph = RoleGraph::new(MockRoleStore::with_roles(&[]));
        let expanded = graph.expand("phantom").await.unwrap();
        assert_eq!(expanded, HashSet::from(["phantom".to_string()]));
    }

    #[tokio::test]
    async fn test_expand_is_single_hop() {
        let store = MockRoleStore::with_roles(&[
            ("employee", &[]),
            ("manager", &["employee"]),
            ("director", &["manager"]),
        ]);
        let graph = RoleGraph::new(store);

        let expanded = graph.expand("director").await.unwrap();
        assert!(expanded.contains("director"));
        assert!(expanded.contains("manager"));
        // Grandparents are deliberately not part of the expansion.
        assert!(!expanded.contains("employee"));
    }
}
