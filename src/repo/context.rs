//! repo::context
//!
//! Evaluation contexts: workspace-scoped view configuration.
//!
//! # Design
//!
//! A context selects a workspace and decides how much of the tree is
//! visible while traversing it. Contexts are plain values; "releasing" a
//! context is dropping it, which makes deterministic release on every exit
//! path a property of scoping rather than discipline.
//!
//! Maintenance runs always use [`EvaluationContext::admin`]: hidden and
//! inaccessible content must be visible to the repair pass, otherwise gaps
//! would be mis-detected and creation would collide with existing children.

use crate::core::types::WorkspaceName;
use crate::repo::NodeRecord;

/// Configuration for creating an evaluation context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextOptions {
    /// Workspace the context is scoped to.
    pub workspace_name: WorkspaceName,
    /// Whether hidden content is part of the view.
    pub invisible_content_shown: bool,
    /// Whether access-restricted content is part of the view.
    pub inaccessible_content_shown: bool,
}

/// A workspace-scoped view of the content tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluationContext {
    options: ContextOptions,
}

impl EvaluationContext {
    /// Create a context from explicit options.
    pub fn create(options: ContextOptions) -> Self {
        Self { options }
    }

    /// Create an administrative context for a workspace.
    ///
    /// Shows everything: invisible and inaccessible content included.
    pub fn admin(workspace_name: WorkspaceName) -> Self {
        Self::create(ContextOptions {
            workspace_name,
            invisible_content_shown: true,
            inaccessible_content_shown: true,
        })
    }

    /// The workspace this context is scoped to.
    pub fn workspace(&self) -> &WorkspaceName {
        &self.options.workspace_name
    }

    /// Whether hidden content is part of the view.
    pub fn invisible_content_shown(&self) -> bool {
        self.options.invisible_content_shown
    }

    /// Whether access-restricted content is part of the view.
    pub fn inaccessible_content_shown(&self) -> bool {
        self.options.inaccessible_content_shown
    }

    /// Check whether a raw record is realizable in this context.
    ///
    /// Shared by repository implementations: the record must belong to this
    /// context's workspace and pass the visibility flags. Removal is not a
    /// context concern; removed nodes materialize and are filtered by the
    /// scanner.
    pub fn admits(&self, record: &NodeRecord) -> bool {
        if record.workspace != self.options.workspace_name {
            return false;
        }
        if record.hidden && !self.options.invisible_content_shown {
            return false;
        }
        if !record.accessible && !self.options.inaccessible_content_shown {
            return false;
        }
        true
    }
}
