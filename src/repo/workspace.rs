//! repo::workspace
//!
//! Workspace enumeration.

use crate::core::types::WorkspaceName;
use crate::repo::RepoError;

/// A reference to a workspace known to the repository.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct WorkspaceRef {
    name: WorkspaceName,
}

impl WorkspaceRef {
    /// Create a reference to a named workspace.
    pub fn new(name: WorkspaceName) -> Self {
        Self { name }
    }

    /// The workspace name.
    pub fn name(&self) -> &WorkspaceName {
        &self.name
    }
}

impl std::fmt::Display for WorkspaceRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Enumeration of the repository's workspaces.
pub trait WorkspaceStore {
    /// All known workspaces, lexicographic by name.
    ///
    /// # Errors
    ///
    /// Returns [`RepoError`] for unrecoverable storage failures.
    fn find_all(&self) -> Result<Vec<WorkspaceRef>, RepoError>;
}
