//! repo
//!
//! Single doorway to the content repository.
//!
//! # Architecture
//!
//! All node access flows through the [`ContentRepository`] trait: querying
//! raw records by type, materializing them into workspace-scoped instances,
//! child lookup, and the one mutating operation this tool performs - child
//! creation. Keeping one doorway means the reconciliation core never touches
//! storage details and test doubles slot in cleanly.
//!
//! # Modules
//!
//! - [`context`] - Evaluation contexts (workspace view configuration)
//! - [`workspace`] - Workspace enumeration
//! - [`cache`] - Content cache store
//! - [`file`] - File-backed repository implementation
//! - [`memory`] - In-memory repository for deterministic testing
//!
//! # Materialization
//!
//! [`ContentRepository::find_by_type`] returns raw records across all
//! workspaces; [`ContentRepository::materialize`] turns one record into a
//! usable [`NodeInstance`] for a given [`context::EvaluationContext`], or
//! `None` when the record cannot be realized in that context (wrong
//! workspace, or excluded by the context's visibility flags). Callers skip
//! `None` results; a record that cannot be realized is never an error.

pub mod cache;
pub mod context;
pub mod file;
pub mod memory;
pub mod workspace;

pub use cache::{CacheError, CacheStore, DirCache};
pub use context::{ContextOptions, EvaluationContext};
pub use file::FileRepository;
pub use memory::MemoryRepository;
pub use workspace::{WorkspaceRef, WorkspaceStore};

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::types::{
    ChildName, NodeIdentifier, NodePath, NodeTypeName, UtcTimestamp, WorkspaceName,
};
use crate::schema::SchemaError;

/// Unrecoverable repository failures.
///
/// These abort the whole run; per-child creation failures are
/// [`ChildCreationError`] and are handled inline by the reconciler.
#[derive(Debug, Error)]
pub enum RepoError {
    /// A store file could not be read.
    #[error("failed to read store file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A store file could not be parsed.
    #[error("failed to parse store file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    /// The repository directory layout is not usable.
    #[error("invalid repository layout: {0}")]
    InvalidLayout(String),

    /// The repository's schema could not be loaded.
    #[error(transparent)]
    Schema(#[from] SchemaError),
}

/// Failure of a single child-creation attempt.
///
/// Creation failures are expected operational outcomes (name collisions,
/// storage hiccups); the reconciler converts them into report lines and
/// counters instead of propagating them.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ChildCreationError {
    /// A node (removed or not) already occupies the target path.
    #[error("a node already exists at \"{0}\"")]
    NodeExists(NodePath),

    /// The parent vanished between gap detection and creation.
    #[error("parent node \"{0}\" no longer exists")]
    ParentMissing(NodePath),

    /// The requested child type is not part of the repository's schema.
    #[error("child type \"{0}\" is not registered")]
    UnknownChildType(NodeTypeName),

    /// The node could not be persisted.
    #[error("failed to persist node at \"{path}\": {message}")]
    Storage { path: NodePath, message: String },
}

/// A raw node record as stored by the repository.
///
/// Records are storage rows, not usable nodes; run them through
/// [`ContentRepository::materialize`] first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    /// Stable identity.
    pub identifier: NodeIdentifier,
    /// Owning workspace.
    pub workspace: WorkspaceName,
    /// Address within the workspace tree.
    pub path: NodePath,
    /// Node type name.
    #[serde(rename = "type")]
    pub node_type: NodeTypeName,
    /// Soft-deleted.
    #[serde(default)]
    pub removed: bool,
    /// Hidden from regular rendering.
    #[serde(default)]
    pub hidden: bool,
    /// Visible to the current access level.
    #[serde(default = "default_accessible")]
    pub accessible: bool,
    /// Creation timestamp, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<UtcTimestamp>,
}

fn default_accessible() -> bool {
    true
}

/// A materialized node: a workspace-scoped, read-only view.
///
/// Instances are cheap value snapshots. Child lookup and creation go through
/// the [`ContentRepository`] doorway with the instance as an argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeInstance {
    /// Stable identity.
    pub identifier: NodeIdentifier,
    /// Workspace this view belongs to.
    pub workspace: WorkspaceName,
    /// Address within the workspace tree.
    pub path: NodePath,
    /// Node type name.
    pub node_type: NodeTypeName,
    /// Soft-deleted.
    pub removed: bool,
}

/// The content repository doorway.
///
/// Implementations are internally synchronized; all methods take `&self`
/// so the repository can be shared behind a trait object.
pub trait ContentRepository {
    /// All raw records of exactly the given type, across workspaces.
    ///
    /// Scan order is the repository's storage order and is stable within a
    /// single call.
    ///
    /// # Errors
    ///
    /// Returns [`RepoError`] only for unrecoverable storage failures.
    fn find_by_type(&self, node_type: &NodeTypeName) -> Result<Vec<NodeRecord>, RepoError>;

    /// Realize a record in an evaluation context.
    ///
    /// Returns `None` when the record is not usable in this context: it
    /// belongs to another workspace, or the context's visibility flags
    /// exclude it. Skipped records are not errors.
    fn materialize(
        &self,
        record: &NodeRecord,
        context: &EvaluationContext,
    ) -> Option<NodeInstance>;

    /// Look up a child of a node by name.
    ///
    /// Returns `None` if no live (non-removed) node occupies the child path.
    fn child(&self, parent: &NodeInstance, name: &ChildName) -> Option<NodeInstance>;

    /// Create a child node under a parent.
    ///
    /// The single mutating operation of this tool. Callers must treat
    /// [`ChildCreationError::NodeExists`] as an ordinary outcome: nothing
    /// prevents another writer from filling the slot between gap detection
    /// and creation.
    ///
    /// # Errors
    ///
    /// Returns a [`ChildCreationError`] describing why the node could not
    /// be created.
    fn create_child(
        &self,
        parent: &NodeInstance,
        name: &ChildName,
        child_type: &NodeTypeName,
    ) -> Result<NodeInstance, ChildCreationError>;
}
