//! reconcile::driver
//!
//! Run driver: reconciliation over one or all workspaces.
//!
//! # Design
//!
//! The driver is the outward-facing composition root. It resolves which
//! workspaces to process, enumerates the registry's concrete types for full
//! passes, runs the [`Reconciler`] per workspace, and hands each workspace's
//! report back as a [`WorkspaceRun`] for the CLI to display as one block.

use thiserror::Error;

use crate::core::types::{NodeTypeName, WorkspaceName};
use crate::reconcile::{ReconcileError, Reconciler, RunReport};
use crate::repo::{ContentRepository, RepoError, WorkspaceStore};
use crate::schema::TypeRegistry;

/// Errors from driving a run.
#[derive(Debug, Error)]
pub enum DriverError {
    /// The requested workspace is not known to the repository.
    #[error("workspace \"{0}\" does not exist")]
    UnknownWorkspace(WorkspaceName),

    /// Workspace enumeration failed.
    #[error(transparent)]
    Repo(#[from] RepoError),

    /// A reconciliation pass failed unrecoverably.
    #[error(transparent)]
    Reconcile(#[from] ReconcileError),
}

/// One workspace's reconciliation result.
#[derive(Debug, Clone)]
pub struct WorkspaceRun {
    /// The processed workspace.
    pub workspace: WorkspaceName,
    /// The accumulated report.
    pub report: RunReport,
}

impl WorkspaceRun {
    /// Heading for displaying this run's report as one message block.
    pub fn heading(&self) -> String {
        format!("Auto created child nodes for {}", self.workspace)
    }
}

/// Drives reconciliation runs across workspaces.
pub struct RunDriver<'a> {
    registry: &'a dyn TypeRegistry,
    repo: &'a dyn ContentRepository,
    workspaces: &'a dyn WorkspaceStore,
}

impl<'a> RunDriver<'a> {
    /// Create a driver over the injected collaborators.
    pub fn new(
        registry: &'a dyn TypeRegistry,
        repo: &'a dyn ContentRepository,
        workspaces: &'a dyn WorkspaceStore,
    ) -> Self {
        Self {
            registry,
            repo,
            workspaces,
        }
    }

    /// Reconcile every workspace, in enumeration order.
    ///
    /// With `node_type` set, only that type is processed per workspace;
    /// otherwise every concrete registry type is.
    ///
    /// # Errors
    ///
    /// Returns [`DriverError`] for unrecoverable failures; per-child
    /// creation failures stay inside the reports.
    pub fn run_all(
        &self,
        node_type: Option<&NodeTypeName>,
        dry_run: bool,
    ) -> Result<Vec<WorkspaceRun>, DriverError> {
        let mut runs = Vec::new();
        for workspace in self.workspaces.find_all()? {
            runs.push(self.run(workspace.name(), node_type, dry_run)?);
        }
        Ok(runs)
    }

    /// Reconcile one named workspace.
    ///
    /// # Errors
    ///
    /// Returns [`DriverError::UnknownWorkspace`] if the name is not known,
    /// and other [`DriverError`] variants for unrecoverable failures.
    pub fn run_workspace(
        &self,
        workspace: &WorkspaceName,
        node_type: Option<&NodeTypeName>,
        dry_run: bool,
    ) -> Result<WorkspaceRun, DriverError> {
        let known = self
            .workspaces
            .find_all()?
            .iter()
            .any(|w| w.name() == workspace);
        if !known {
            return Err(DriverError::UnknownWorkspace(workspace.clone()));
        }
        self.run(workspace, node_type, dry_run)
    }

    fn run(
        &self,
        workspace: &WorkspaceName,
        node_type: Option<&NodeTypeName>,
        dry_run: bool,
    ) -> Result<WorkspaceRun, DriverError> {
        // An explicit type is taken as given, abstract or not; full passes
        // enumerate concrete types only.
        let roots: Vec<NodeTypeName> = match node_type {
            Some(name) => vec![name.clone()],
            None => self
                .registry
                .list_all_types()
                .into_iter()
                .filter(|def| !def.is_abstract)
                .map(|def| def.name)
                .collect(),
        };

        let reconciler = Reconciler::new(self.registry, self.repo);
        let report = reconciler.reconcile(workspace, &roots, dry_run)?;
        Ok(WorkspaceRun {
            workspace: workspace.clone(),
            report,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repo::memory::MemoryRepository;
    use crate::schema::{NodeTypeDef, Registry};

    fn ty(name: &str) -> NodeTypeName {
        NodeTypeName::new(name).unwrap()
    }

    fn ws(name: &str) -> WorkspaceName {
        WorkspaceName::new(name).unwrap()
    }

    fn registry() -> Registry {
        Registry::from_defs(vec![
            NodeTypeDef::new("acme:document", true).with_child("main", "acme:content"),
            NodeTypeDef::new("acme:page", false).with_supertype("acme:document"),
            NodeTypeDef::new("acme:content", false),
        ])
        .unwrap()
    }

    #[test]
    fn run_all_processes_every_workspace() {
        let registry = registry();
        let repo = MemoryRepository::new();
        repo.seed_node("live", "/home", "acme:page");
        repo.seed_node("draft", "/wip", "acme:page");

        let driver = RunDriver::new(&registry, &repo, &repo);
        let runs = driver.run_all(None, false).unwrap();

        let names: Vec<String> = runs.iter().map(|r| r.workspace.to_string()).collect();
        assert_eq!(names, vec!["draft", "live"]);
        assert_eq!(runs[0].report.created(), 1);
        assert_eq!(runs[1].report.created(), 1);
    }

    #[test]
    fn full_pass_skips_abstract_roots() {
        let registry = registry();
        let repo = MemoryRepository::new();
        repo.seed_workspace("live");

        let driver = RunDriver::new(&registry, &repo, &repo);
        let runs = driver.run_all(None, false).unwrap();

        let rendered = runs[0].report.render();
        assert!(!rendered.contains("Working on node type \"acme:document\""));
        assert!(rendered.contains("Working on node type \"acme:page\""));
    }

    #[test]
    fn explicit_type_bypasses_abstract_filter() {
        let registry = registry();
        let repo = MemoryRepository::new();
        repo.seed_workspace("live");

        let driver = RunDriver::new(&registry, &repo, &repo);
        let run = driver
            .run_workspace(&ws("live"), Some(&ty("acme:document")), false)
            .unwrap();

        assert!(run
            .report
            .render()
            .contains("Working on node type \"acme:document\""));
    }

    #[test]
    fn unknown_workspace_is_an_error() {
        let registry = registry();
        let repo = MemoryRepository::new();
        repo.seed_workspace("live");

        let driver = RunDriver::new(&registry, &repo, &repo);
        let result = driver.run_workspace(&ws("nope"), None, false);
        assert!(matches!(result, Err(DriverError::UnknownWorkspace(_))));
    }

    #[test]
    fn heading_names_the_workspace() {
        let run = WorkspaceRun {
            workspace: ws("live"),
            report: RunReport::new(),
        };
        assert_eq!(run.heading(), "Auto created child nodes for live");
    }
}
