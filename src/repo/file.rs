//! repo::file
//!
//! File-backed content repository.
//!
//! # Layout
//!
//! ```text
//! <root>/
//!   nodetypes.toml            node type schema (see schema::file)
//!   workspaces/
//!     live/nodes.json         one JSON array of node records per workspace
//!     user-admin/nodes.json
//!   cache/                    content cache entries (see repo::cache)
//! ```
//!
//! A record looks like:
//!
//! ```json
//! {
//!   "identifier": "2f0c8a3e-5d3f-4a41-9d8e-6f2b1c7a9e10",
//!   "path": "/sites/home",
//!   "type": "acme:page",
//!   "removed": false,
//!   "hidden": false,
//!   "accessible": true
//! }
//! ```
//!
//! The whole store is loaded at open time; child creation appends to the
//! in-memory state and rewrites the owning workspace file. A failed rewrite
//! rolls the in-memory append back, so memory and disk stay in step.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use serde::{Deserialize, Serialize};

use crate::core::types::{
    ChildName, NodeIdentifier, NodePath, NodeTypeName, UtcTimestamp, WorkspaceName,
};
use crate::repo::{
    CacheStore, ChildCreationError, ContentRepository, DirCache, EvaluationContext, NodeInstance,
    NodeRecord, RepoError, WorkspaceRef, WorkspaceStore,
};
use crate::schema::file::{load_registry, SCHEMA_FILE_NAME};
use crate::schema::{Registry, TypeRegistry};

/// Directory holding one subdirectory per workspace.
const WORKSPACES_DIR: &str = "workspaces";

/// Per-workspace node store file.
const NODES_FILE_NAME: &str = "nodes.json";

/// Content cache directory.
const CACHE_DIR: &str = "cache";

/// On-disk node record. The workspace is the directory, not a field.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredNode {
    identifier: NodeIdentifier,
    path: NodePath,
    #[serde(rename = "type")]
    node_type: NodeTypeName,
    #[serde(default)]
    removed: bool,
    #[serde(default)]
    hidden: bool,
    #[serde(default = "default_accessible")]
    accessible: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    created_at: Option<UtcTimestamp>,
}

fn default_accessible() -> bool {
    true
}

impl StoredNode {
    fn into_record(self, workspace: &WorkspaceName) -> NodeRecord {
        NodeRecord {
            identifier: self.identifier,
            workspace: workspace.clone(),
            path: self.path,
            node_type: self.node_type,
            removed: self.removed,
            hidden: self.hidden,
            accessible: self.accessible,
            created_at: self.created_at,
        }
    }

    fn from_record(record: &NodeRecord) -> Self {
        Self {
            identifier: record.identifier,
            path: record.path.clone(),
            node_type: record.node_type.clone(),
            removed: record.removed,
            hidden: record.hidden,
            accessible: record.accessible,
            created_at: record.created_at.clone(),
        }
    }
}

/// Mutable store state, shared behind a mutex.
#[derive(Debug)]
struct Inner {
    /// Records per workspace, in file order.
    workspaces: BTreeMap<WorkspaceName, Vec<NodeRecord>>,
}

/// File-backed content repository.
#[derive(Debug)]
pub struct FileRepository {
    root: PathBuf,
    registry: Registry,
    inner: Mutex<Inner>,
}

impl FileRepository {
    /// Open a repository at the given root.
    ///
    /// Loads the schema and every workspace's node store. A missing
    /// `workspaces/` directory means no workspaces; a workspace directory
    /// without a `nodes.json` means an empty workspace.
    ///
    /// # Errors
    ///
    /// Returns [`RepoError`] if the schema or a store file cannot be loaded,
    /// or if the layout is unusable (e.g. a workspace directory whose name
    /// is not a valid workspace name).
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, RepoError> {
        let root = root.into();
        let registry = load_registry(&root.join(SCHEMA_FILE_NAME))?;

        let mut workspaces = BTreeMap::new();
        let workspaces_dir = root.join(WORKSPACES_DIR);
        if workspaces_dir.is_dir() {
            let entries = fs::read_dir(&workspaces_dir).map_err(|e| RepoError::ReadError {
                path: workspaces_dir.clone(),
                source: e,
            })?;
            for entry in entries {
                let entry = entry.map_err(|e| RepoError::ReadError {
                    path: workspaces_dir.clone(),
                    source: e,
                })?;
                if !entry.path().is_dir() {
                    continue;
                }
                let dir_name = entry.file_name().to_string_lossy().into_owned();
                let name = WorkspaceName::new(dir_name.clone()).map_err(|_| {
                    RepoError::InvalidLayout(format!(
                        "'{}' is not a valid workspace directory name",
                        dir_name
                    ))
                })?;
                let records = Self::load_workspace(&entry.path(), &name)?;
                workspaces.insert(name, records);
            }
        } else if workspaces_dir.exists() {
            return Err(RepoError::InvalidLayout(format!(
                "'{}' is not a directory",
                workspaces_dir.display()
            )));
        }

        Ok(Self {
            root,
            registry,
            inner: Mutex::new(Inner { workspaces }),
        })
    }

    fn load_workspace(
        dir: &Path,
        name: &WorkspaceName,
    ) -> Result<Vec<NodeRecord>, RepoError> {
        let path = dir.join(NODES_FILE_NAME);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let contents = fs::read_to_string(&path).map_err(|e| RepoError::ReadError {
            path: path.clone(),
            source: e,
        })?;
        let stored: Vec<StoredNode> =
            serde_json::from_str(&contents).map_err(|e| RepoError::ParseError {
                path: path.clone(),
                message: e.to_string(),
            })?;
        Ok(stored.into_iter().map(|s| s.into_record(name)).collect())
    }

    /// The repository root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The repository's node type registry.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// The repository's content cache.
    pub fn cache(&self) -> impl CacheStore {
        DirCache::new(self.root.join(CACHE_DIR))
    }

    fn state(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().expect("repository state poisoned")
    }

    /// Rewrite one workspace's store file from the in-memory records.
    fn persist_workspace(
        &self,
        workspace: &WorkspaceName,
        records: &[NodeRecord],
    ) -> std::io::Result<()> {
        let dir = self.root.join(WORKSPACES_DIR).join(workspace.as_str());
        fs::create_dir_all(&dir)?;
        let stored: Vec<StoredNode> = records.iter().map(StoredNode::from_record).collect();
        let json = serde_json::to_string_pretty(&stored).map_err(std::io::Error::other)?;
        fs::write(dir.join(NODES_FILE_NAME), json)
    }
}

impl ContentRepository for FileRepository {
    fn find_by_type(&self, node_type: &NodeTypeName) -> Result<Vec<NodeRecord>, RepoError> {
        let state = self.state();
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
        if !self.registry.has_type(child_type) {
            return Err(ChildCreationError::UnknownChildType(child_type.clone()));
        }

        let child_path = parent.path.join(name);
        let mut state = self.state();
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

        // Any occupant blocks the path, removed ones included; resurrecting
        // removed content is not this tool's call to make.
        if records.iter().any(|r| r.path == child_path) {
            return Err(ChildCreationError::NodeExists(child_path));
        }

        let record = NodeRecord {
            identifier: NodeIdentifier::generate(),
            workspace: parent.workspace.clone(),
            path: child_path.clone(),
            node_type: child_type.clone(),
            removed: false,
            hidden: false,
            accessible: true,
            created_at: Some(UtcTimestamp::now()),
        };
        records.push(record.clone());

        if let Err(e) = self.persist_workspace(&parent.workspace, records) {
            // Keep memory consistent with disk
            records.pop();
            return Err(ChildCreationError::Storage {
                path: child_path,
                message: e.to_string(),
            });
        }

        Ok(NodeInstance {
            identifier: record.identifier,
            workspace: record.workspace,
            path: record.path,
            node_type: record.node_type,
            removed: false,
        })
    }
}

impl WorkspaceStore for FileRepository {
    fn find_all(&self) -> Result<Vec<WorkspaceRef>, RepoError> {
        let state = self.state();
        Ok(state
            .workspaces
            .keys()
            .map(|name| WorkspaceRef::new(name.clone()))
            .collect())
    }
}
