//! reconcile
//!
//! The reconciliation core: detect and repair missing auto-created child
//! nodes.
//!
//! # Architecture
//!
//! A pass over one root type expands it into its concrete subtype closure
//! ([`expand`]), scans each closure member's live instances ([`scan`]),
//! computes each instance's missing child slots ([`gaps`]), creates the
//! missing children (unless dry-running), and accumulates a structured
//! [`report::RunReport`]. The [`driver::RunDriver`] composes passes over
//! whole workspaces.
//!
//! # Error Policy
//!
//! - An unknown root type ends only that type's pass, with a single
//!   "does not exist" line and untouched counters.
//! - A failed child creation becomes a report line and an error count;
//!   sibling slots and nodes are still processed.
//! - Anything else (storage failure, corrupt store) aborts the run.
//!
//! # Example
//!
//! ```
//! use nodetend::core::types::{NodeTypeName, WorkspaceName};
//! use nodetend::reconcile::Reconciler;
//! use nodetend::repo::memory::MemoryRepository;
//! use nodetend::schema::{NodeTypeDef, Registry};
//!
//! let registry = Registry::from_defs(vec![
//!     NodeTypeDef::new("acme:page", false).with_child("main", "acme:content"),
//!     NodeTypeDef::new("acme:content", false),
//! ])
//! .unwrap();
//!
//! let repo = MemoryRepository::new();
//! repo.seed_node("live", "/home", "acme:page");
//!
//! let reconciler = Reconciler::new(&registry, &repo);
//! let report = reconciler
//!     .reconcile_type(
//!         &NodeTypeName::new("acme:page").unwrap(),
//!         &WorkspaceName::new("live").unwrap(),
//!         false,
//!     )
//!     .unwrap();
//! assert_eq!(report.created(), 1);
//! ```

pub mod driver;
pub mod expand;
pub mod gaps;
pub mod report;
pub mod scan;

pub use driver::{DriverError, RunDriver, WorkspaceRun};
pub use expand::expand;
pub use gaps::missing_children;
pub use report::RunReport;
pub use scan::NodeScanner;

use thiserror::Error;

use crate::core::types::{NodeTypeName, WorkspaceName};
use crate::repo::{ContentRepository, EvaluationContext, RepoError};
use crate::schema::{RegistryError, TypeRegistry};

/// Unrecoverable reconciliation failures.
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// The repository failed underneath the pass.
    #[error(transparent)]
    Repo(#[from] RepoError),
}

/// Orchestrates type expansion, scanning, gap detection and creation.
///
/// Collaborators are injected explicitly; the reconciler owns no state
/// beyond the borrowed registry and repository.
pub struct Reconciler<'a> {
    registry: &'a dyn TypeRegistry,
    repo: &'a dyn ContentRepository,
}

impl<'a> Reconciler<'a> {
    /// Create a reconciler over a registry and repository.
    pub fn new(registry: &'a dyn TypeRegistry, repo: &'a dyn ContentRepository) -> Self {
        Self { registry, repo }
    }

    /// Reconcile a workspace against a sequence of root types.
    ///
    /// Runs one type pass per root, in caller order, and merges the pass
    /// reports in traversal order. Callers running a full pass enumerate the
    /// registry's concrete types; this method does not filter abstract
    /// roots itself.
    ///
    /// # Errors
    ///
    /// Returns [`ReconcileError`] only for unrecoverable repository
    /// failures; see the module-level error policy.
    pub fn reconcile(
        &self,
        workspace: &WorkspaceName,
        roots: &[NodeTypeName],
        dry_run: bool,
    ) -> Result<RunReport, ReconcileError> {
        let mut report = RunReport::new();
        for root in roots {
            report.merge(self.reconcile_type(root, workspace, dry_run)?);
        }
        Ok(report)
    }

    /// Run one reconciliation pass for a root type in a workspace.
    ///
    /// `root` is a name hint; the authoritative definition is re-resolved
    /// from the registry (and the pass reduces to a "does not exist" line
    /// when that fails). Within the pass, each closure member gets one
    /// evaluation context scoped to its scan loop; a node's missing slots
    /// are created sequentially, and each creation failure is absorbed into
    /// the report.
    ///
    /// # Errors
    ///
    /// Returns [`ReconcileError`] only for unrecoverable repository
    /// failures.
    pub fn reconcile_type(
        &self,
        root: &NodeTypeName,
        workspace: &WorkspaceName,
        dry_run: bool,
    ) -> Result<RunReport, ReconcileError> {
        let mut report = RunReport::new();

        let closure = match expand(self.registry, root) {
            Ok(closure) => closure,
            Err(RegistryError::UnknownType(name)) => {
                report.push_line(format!("Node type \"{name}\" does not exist"));
                return Ok(report);
            }
        };

        report.push_line("");
        report.push_line(format!("Working on node type \"{root}\" ..."));

        let scanner = NodeScanner::new(self.repo);
        for (type_name, def) in &closure {
            let required = &def.required_children;
            // One context per closure member, released when the loop body ends
            let context = EvaluationContext::admin(workspace.clone());
            for node in scanner.scan(type_name, &context)? {
                for slot in missing_children(self.repo, &node, required) {
                    if dry_run {
                        report.record_created();
                        report.push_line(format!(
                            "Missing node named \"{}\" in \"{}\"",
                            slot, node.path
                        ));
                        continue;
                    }
                    // Expansion guarantees the slot is present in the map
                    let expected = &required[&slot];
                    match self.repo.create_child(&node, &slot, expected) {
                        Ok(_) => {
                            report.record_created();
                            report.push_line(format!(
                                "Auto created node named \"{}\" in \"{}\"",
                                slot, node.path
                            ));
                        }
                        Err(error) => {
                            report.record_error();
                            report.push_line(format!(
                                "Could not create node named \"{}\" in \"{}\" ({})",
                                slot, node.path, error
                            ));
                        }
                    }
                }
            }
        }

        if report.is_clean() {
            report.push_line(format!(
                "All \"{root}\" nodes in workspace \"{workspace}\" have an up-to-date structure"
            ));
        } else if dry_run {
            report.push_line(format!(
                "{} missing child nodes need to be created",
                report.created()
            ));
        } else {
            report.push_line(format!("Created {} new child nodes", report.created()));
            if report.errors() > 0 {
                report.push_line(format!(
                    "{} Errors occurred during child node creation",
                    report.errors()
                ));
            }
        }
        report.push_line("");

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repo::memory::MemoryRepository;
    use crate::repo::ChildCreationError;
    use crate::schema::{NodeTypeDef, Registry};

    fn ty(name: &str) -> NodeTypeName {
        NodeTypeName::new(name).unwrap()
    }

    fn ws(name: &str) -> WorkspaceName {
        WorkspaceName::new(name).unwrap()
    }

    fn registry() -> Registry {
        Registry::from_defs(vec![
            NodeTypeDef::new("acme:page", false).with_child("main", "acme:content"),
            NodeTypeDef::new("acme:landing-page", false)
                .with_supertype("acme:page")
                .with_child("hero", "acme:banner"),
            NodeTypeDef::new("acme:content", false),
            NodeTypeDef::new("acme:banner", false),
            NodeTypeDef::new("acme:plain", false),
        ])
        .unwrap()
    }

    #[test]
    fn up_to_date_type_yields_summary_line_only() {
        let registry = registry();
        let repo = MemoryRepository::new();
        repo.seed_node("live", "/p", "acme:plain");

        let reconciler = Reconciler::new(&registry, &repo);
        let report = reconciler
            .reconcile_type(&ty("acme:plain"), &ws("live"), false)
            .unwrap();

        assert!(report.is_clean());
        let rendered = report.render();
        assert!(rendered
            .contains("All \"acme:plain\" nodes in workspace \"live\" have an up-to-date structure"));
        assert!(!rendered.contains("new child nodes"));
    }

    #[test]
    fn missing_children_are_created() {
        let registry = registry();
        let repo = MemoryRepository::new();
        repo.seed_node("live", "/home", "acme:page");

        let reconciler = Reconciler::new(&registry, &repo);
        let report = reconciler
            .reconcile_type(&ty("acme:page"), &ws("live"), false)
            .unwrap();

        assert_eq!(report.created(), 1);
        assert_eq!(report.errors(), 0);
        assert!(report
            .render()
            .contains("Auto created node named \"main\" in \"/home\""));
        assert_eq!(repo.create_calls().len(), 1);
    }

    #[test]
    fn dry_run_counts_but_does_not_create() {
        let registry = registry();
        let repo = MemoryRepository::new();
        repo.seed_node("live", "/home", "acme:page");

        let reconciler = Reconciler::new(&registry, &repo);
        let report = reconciler
            .reconcile_type(&ty("acme:page"), &ws("live"), true)
            .unwrap();

        assert_eq!(report.created(), 1);
        assert!(report
            .render()
            .contains("Missing node named \"main\" in \"/home\""));
        assert!(report
            .render()
            .contains("1 missing child nodes need to be created"));
        assert!(repo.create_calls().is_empty());
    }

    #[test]
    fn subtype_instances_are_reconciled_under_the_root_pass() {
        let registry = registry();
        let repo = MemoryRepository::new();
        repo.seed_node("live", "/landing", "acme:landing-page");

        let reconciler = Reconciler::new(&registry, &repo);
        let report = reconciler
            .reconcile_type(&ty("acme:page"), &ws("live"), false)
            .unwrap();

        // Inherited "main" and own "hero" both created
        assert_eq!(report.created(), 2);
        let rendered = report.render();
        assert!(rendered.contains("\"hero\" in \"/landing\""));
        assert!(rendered.contains("\"main\" in \"/landing\""));
    }

    #[test]
    fn unknown_root_type_is_a_single_line() {
        let registry = registry();
        let repo = MemoryRepository::new();

        let reconciler = Reconciler::new(&registry, &repo);
        let report = reconciler
            .reconcile_type(&ty("acme:ghost"), &ws("live"), false)
            .unwrap();

        assert!(report.is_clean());
        assert_eq!(report.lines(), ["Node type \"acme:ghost\" does not exist"]);
    }

    #[test]
    fn creation_failure_is_absorbed_and_siblings_continue() {
        let registry = registry();
        let repo = MemoryRepository::new();
        repo.seed_node("live", "/landing", "acme:landing-page");
        repo.fail_creation_at(
            "/landing/hero",
            ChildCreationError::Storage {
                path: crate::core::types::NodePath::new("/landing/hero").unwrap(),
                message: "disk full".into(),
            },
        );

        let reconciler = Reconciler::new(&registry, &repo);
        let report = reconciler
            .reconcile_type(&ty("acme:landing-page"), &ws("live"), false)
            .unwrap();

        // hero fails, main still gets created
        assert_eq!(report.errors(), 1);
        assert_eq!(report.created(), 1);
        let rendered = report.render();
        assert!(rendered.contains("Could not create node named \"hero\" in \"/landing\""));
        assert!(rendered.contains("disk full"));
        assert!(rendered.contains("Auto created node named \"main\" in \"/landing\""));
        assert!(rendered.contains("Created 1 new child nodes"));
        assert!(rendered.contains("1 Errors occurred during child node creation"));
    }

    #[test]
    fn removed_nodes_are_not_repaired() {
        let registry = registry();
        let repo = MemoryRepository::new();
        repo.seed_removed_node("live", "/gone", "acme:page");

        let reconciler = Reconciler::new(&registry, &repo);
        let report = reconciler
            .reconcile_type(&ty("acme:page"), &ws("live"), false)
            .unwrap();

        assert!(report.is_clean());
        assert!(repo.create_calls().is_empty());
    }

    #[test]
    fn workspace_pass_merges_type_passes_in_order() {
        let registry = registry();
        let repo = MemoryRepository::new();
        repo.seed_node("live", "/home", "acme:page");
        repo.seed_node("live", "/p", "acme:plain");

        let reconciler = Reconciler::new(&registry, &repo);
        let report = reconciler
            .reconcile(&ws("live"), &[ty("acme:page"), ty("acme:plain")], false)
            .unwrap();

        assert_eq!(report.created(), 1);
        let rendered = report.render();
        let page_header = rendered.find("Working on node type \"acme:page\"").unwrap();
        let plain_header = rendered.find("Working on node type \"acme:plain\"").unwrap();
        assert!(page_header < plain_header);
    }
}
