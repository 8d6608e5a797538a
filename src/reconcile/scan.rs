//! reconcile::scan
//!
//! Node scanning: live instances of a type within an evaluation context.

use crate::core::types::NodeTypeName;
use crate::repo::{ContentRepository, EvaluationContext, NodeInstance, RepoError};

/// Scans the repository for live node instances.
///
/// A scan is restartable: every call re-queries the repository, so a second
/// scan observes children created since the first.
pub struct NodeScanner<'a> {
    repo: &'a dyn ContentRepository,
}

impl<'a> NodeScanner<'a> {
    /// Create a scanner over a repository.
    pub fn new(repo: &'a dyn ContentRepository) -> Self {
        Self { repo }
    }

    /// Produce the live instances of exactly `node_type` in `context`.
    ///
    /// Records that cannot be materialized in the context are skipped, as
    /// are removed instances; skips never fail the run.
    ///
    /// # Errors
    ///
    /// Returns [`RepoError`] only when the underlying query fails
    /// unrecoverably.
    pub fn scan<'ctx>(
        &'ctx self,
        node_type: &NodeTypeName,
        context: &'ctx EvaluationContext,
    ) -> Result<impl Iterator<Item = NodeInstance> + 'ctx, RepoError> {
        let records = self.repo.find_by_type(node_type)?;
        // Reborrowed at the context's lifetime so the iterator is tied to
        // the scope the context lives in
        let repo: &'ctx dyn ContentRepository = self.repo;
        Ok(records
            .into_iter()
            .filter_map(move |record| repo.materialize(&record, context))
            .filter(|node| !node.removed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::WorkspaceName;
    use crate::repo::memory::MemoryRepository;

    fn ty(name: &str) -> NodeTypeName {
        NodeTypeName::new(name).unwrap()
    }

    fn admin(workspace: &str) -> EvaluationContext {
        EvaluationContext::admin(WorkspaceName::new(workspace).unwrap())
    }

    #[test]
    fn scans_only_the_exact_type() {
        let repo = MemoryRepository::new();
        repo.seed_node("live", "/a", "acme:page");
        repo.seed_node("live", "/b", "acme:landing-page");

        let ctx = admin("live");
        let scanner = NodeScanner::new(&repo);
        let nodes: Vec<NodeInstance> = scanner.scan(&ty("acme:page"), &ctx).unwrap().collect();
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].path.as_str(), "/a");
    }

    #[test]
    fn removed_nodes_are_skipped() {
        let repo = MemoryRepository::new();
        repo.seed_node("live", "/a", "acme:page");
        repo.seed_removed_node("live", "/b", "acme:page");

        let ctx = admin("live");
        let scanner = NodeScanner::new(&repo);
        let nodes: Vec<NodeInstance> = scanner.scan(&ty("acme:page"), &ctx).unwrap().collect();
        assert_eq!(nodes.len(), 1);
    }

    #[test]
    fn other_workspaces_are_skipped() {
        let repo = MemoryRepository::new();
        repo.seed_node("live", "/a", "acme:page");
        repo.seed_node("draft", "/b", "acme:page");

        let ctx = admin("live");
        let scanner = NodeScanner::new(&repo);
        let nodes: Vec<NodeInstance> = scanner.scan(&ty("acme:page"), &ctx).unwrap().collect();
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].path.as_str(), "/a");
    }

    #[test]
    fn scan_is_restartable() {
        let repo = MemoryRepository::new();
        repo.seed_node("live", "/a", "acme:page");

        let ctx = admin("live");
        let scanner = NodeScanner::new(&repo);
        assert_eq!(scanner.scan(&ty("acme:page"), &ctx).unwrap().count(), 1);

        repo.seed_node("live", "/b", "acme:page");
        assert_eq!(scanner.scan(&ty("acme:page"), &ctx).unwrap().count(), 2);
    }
}
