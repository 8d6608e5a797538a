//! repo::memory
//!
//! In-memory repository for deterministic testing.
//!
//! # Design
//!
//! The memory repository implements the same doorway as the file-backed
//! store, stores everything in memory, and adds two test affordances:
//! configurable creation failures and an operation log, so tests can assert
//! exactly which calls the reconciler issued.
//!
//! # Example
//!
//! ```
//! use nodetend::core::types::{ChildName, NodeTypeName, WorkspaceName};
//! use nodetend::repo::{memory::MemoryRepository, ContentRepository, EvaluationContext};
//!
//! let repo = MemoryRepository::new();
//! repo.seed_node("live", "/sites/home", "acme:page");
//!
//! let ctx = EvaluationContext::admin(WorkspaceName::new("live").unwrap());
//! let ty = NodeTypeName::new("acme:page").unwrap();
//! let records = repo.find_by_type(&ty).unwrap();
//! let home = repo.materialize(&records[0], &ctx).unwrap();
//!
//! let main = ChildName::new("main").unwrap();
//! let content = NodeTypeName::new("acme:content").unwrap();
//! repo.create_child(&home, &main, &content).unwrap();
//! assert_eq!(repo.create_calls().len(), 1);
//! ```

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::core::types::{
    ChildName, NodeIdentifier, NodePath, NodeTypeName, UtcTimestamp, WorkspaceName,
};
use crate::repo::{
    ChildCreationError, ContentRepository, EvaluationContext, NodeInstance, NodeRecord, RepoError,
    WorkspaceRef, WorkspaceStore,
};

/// A recorded repository operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// A `find_by_type` query.
    FindByType(NodeTypeName),
    /// A `create_child` attempt (recorded whether or not it succeeded).
    CreateChild {
        parent: NodePath,
        name: ChildName,
        child_type: NodeTypeName,
    },
}

/// Internal mutable state.
#[derive(Debug, Default)]
struct Inner {
    /// Records per workspace, in insertion order.
    workspaces: BTreeMap<WorkspaceName, Vec<NodeRecord>>,
    /// Paths at which creation should fail, with the error to return.
    fail_creations: BTreeMap<NodePath, ChildCreationError>,
    /// Recorded operations for verification.
    operations: Vec<Operation>,
}

/// In-memory repository.
///
/// Thread-safe via internal `Arc<Mutex<...>>` wrapping; clones share state.
#[derive(Debug, Clone, Default)]
pub struct MemoryRepository {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().expect("repository state poisoned")
    }

    /// Register a workspace without any nodes.
    ///
    /// # Panics
    ///
    /// Panics on an invalid workspace name; seeding helpers are
    /// test-support and expect statically-known inputs.
    pub fn seed_workspace(&self, workspace: &str) {
        let name = WorkspaceName::new(workspace).expect("valid workspace name");
        self.state().workspaces.entry(name).or_default();
    }

    /// Add a live, visible node, creating the workspace if needed.
    ///
    /// Returns the generated identifier.
    ///
    /// # Panics
    ///
    /// Panics on invalid names/paths; see [`Self::seed_workspace`].
    pub fn seed_node(&self, workspace: &str, path: &str, node_type: &str) -> NodeIdentifier {
        self.seed_record(NodeRecord {
            identifier: NodeIdentifier::generate(),
            workspace: WorkspaceName::new(workspace).expect("valid workspace name"),
            path: NodePath::new(path).expect("valid node path"),
            node_type: NodeTypeName::new(node_type).expect("valid node type name"),
            removed: false,
            hidden: false,
            accessible: true,
            created_at: None,
        })
    }

    /// Add a removed node, creating the workspace if needed.
    ///
    /// # Panics
    ///
    /// Panics on invalid names/paths; see [`Self::seed_workspace`].
    pub fn seed_removed_node(
        &self,
        workspace: &str,
        path: &str,
        node_type: &str,
    ) -> NodeIdentifier {
        self.seed_record(NodeRecord {
            identifier: NodeIdentifier::generate(),
            workspace: WorkspaceName::new(workspace).expect("valid workspace name"),
            path: NodePath::new(path).expect("valid node path"),
            node_type: NodeTypeName::new(node_type).expect("valid node type name"),
            removed: true,
            hidden: false,
            accessible: true,
            created_at: None,
        })
    }

    /// Add an arbitrary record, creating the workspace if needed.
    pub fn seed_record(&self, record: NodeRecord) -> NodeIdentifier {
        let identifier = record.identifier;
        let mut state = self.state();
        state
            .workspaces
            .entry(record.workspace.clone())
            .or_default()
            .push(record);
        identifier
    }

    /// Make the next creation at `path` fail with the given error.
    ///
    /// The failure is sticky: every attempt at that path fails until the
    /// injection is cleared by a successful run elsewhere or a new
    /// repository is built.
    ///
    /// # Panics
    ///
    /// Panics on an invalid path; see [`Self::seed_workspace`].
    pub fn fail_creation_at(&self, path: &str, error: ChildCreationError) {
        let path = NodePath::new(path).expect("valid node path");
        self.state().fail_creations.insert(path, error);
    }

    /// All recorded operations, in call order.
    pub fn operations(&self) -> Vec<Operation> {
        self.state().operations.clone()
    }

    /// Only the recorded `create_child` attempts, in call order.
    pub fn create_calls(&self) -> Vec<Operation> {
        self.state()
            .operations
            .iter()
            .filter(|op| matches!(op, Operation::CreateChild { .. }))
            .cloned()
            .collect()
    }

    /// Forget recorded operations (state is kept).
    pub fn clear_operations(&self) {
        self.state().operations.clear();
    }
}

impl ContentRepository for MemoryRepository {
    fn find_by_type(&self, node_type: &NodeTypeName) -> Result<Vec<NodeRecord>, RepoError> {
        let mut state = self.state();
        state
            .operations
            .push(Operation::FindByType(node_type.clone()));
        Ok(state
            .workspaces
            .values()
            .flatten()
            .filter(|r| r.node_type == *node_type)
            .cloned()
            .collect())
    }

    fn materialize(
        &self,
        record: &NodeRecord,
        context: &EvaluationContext,
    ) -> Option<NodeInstance> {
        if !context.admits(record) {
            return None;
        }
        Some(NodeInstance {
            identifier: record.identifier,
            workspace: record.workspace.clone(),
            path: record.path.clone(),
            node_type: record.node_type.clone(),
            removed: record.removed,
        })
    }

    fn child(&self, parent: &NodeInstance, name: &ChildName) -> Option<NodeInstance> {
        let child_path = parent.path.join(name);
        let state = self.state();
        state
            .workspaces
            .get(&parent.workspace)?
            .iter()
            .find(|r| r.path == child_path && !r.removed)
            .map(|r| NodeInstance {
                identifier: r.identifier,
                workspace: r.workspace.clone(),
                path: r.path.clone(),
                node_type: r.node_type.clone(),
                removed: r.removed,
            })
    }

    fn create_child(
        &self,
        parent: &NodeInstance,
        name: &ChildName,
        child_type: &NodeTypeName,
    ) -> Result<NodeInstance, ChildCreationError> {
        let child_path = parent.path.join(name);
        let mut state = self.state();
        state.operations.push(Operation::CreateChild {
            parent: parent.path.clone(),
            name: name.clone(),
            child_type: child_type.clone(),
        });

        if let Some(error) = state.fail_creations.get(&child_path) {
            return Err(error.clone());
        }

        let records = state
            .workspaces
            .get_mut(&parent.workspace)
            .ok_or_else(|| ChildCreationError::ParentMissing(parent.path.clone()))?;

        let parent_live = records
            .iter()
            .any(|r| r.identifier == parent.identifier && !r.removed);
        if !parent_live {
            return Err(ChildCreationError::ParentMissing(parent.path.clone()));
        }

        if records.iter().any(|r| r.path == child_path) {
            return Err(ChildCreationError::NodeExists(child_path));
        }

        let record = NodeRecord {
            identifier: NodeIdentifier::generate(),
            workspace: parent.workspace.clone(),
            path: child_path,
            node_type: child_type.clone(),
            removed: false,
            hidden: false,
            accessible: true,
            created_at: Some(UtcTimestamp::now()),
        };
        records.push(record.clone());

        Ok(NodeInstance {
            identifier: record.identifier,
            workspace: record.workspace,
            path: record.path,
            node_type: record.node_type,
            removed: false,
        })
    }
}

impl WorkspaceStore for MemoryRepository {
    fn find_all(&self) -> Result<Vec<WorkspaceRef>, RepoError> {
        let state = self.state();
        Ok(state
            .workspaces
            .keys()
            .map(|name| WorkspaceRef::new(name.clone()))
            .collect())
    }
}
