//! reconcile::gaps
//!
//! Gap detection: which required child slots a node is missing.

use std::collections::BTreeMap;

use crate::core::types::{ChildName, NodeTypeName};
use crate::repo::{ContentRepository, NodeInstance};

/// Compute the required child slots absent from a node.
///
/// A slot is missing iff the repository has no live child under that name.
/// Presence-only: the type of an existing child is not checked. The result
/// is ordered by slot name, which pins report and creation order.
///
/// Gaps are computed fresh on every call and must not be cached across a
/// creation attempt; the creation call itself is the authority on conflicts.
pub fn missing_children(
    repo: &dyn ContentRepository,
    node: &NodeInstance,
    required: &BTreeMap<ChildName, NodeTypeName>,
) -> Vec<ChildName> {
    required
        .keys()
        .filter(|name| repo.child(node, name).is_none())
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::WorkspaceName;
    use crate::repo::{memory::MemoryRepository, EvaluationContext};

    fn required(slots: &[(&str, &str)]) -> BTreeMap<ChildName, NodeTypeName> {
        slots
            .iter()
            .map(|(name, ty)| {
                (
                    ChildName::new(*name).unwrap(),
                    NodeTypeName::new(*ty).unwrap(),
                )
            })
            .collect()
    }

    fn live_instance(repo: &MemoryRepository, path: &str) -> NodeInstance {
        let ctx = EvaluationContext::admin(WorkspaceName::new("live").unwrap());
        let ty = NodeTypeName::new("acme:page").unwrap();
        repo.find_by_type(&ty)
            .unwrap()
            .iter()
            .find(|r| r.path.as_str() == path)
            .and_then(|r| repo.materialize(r, &ctx))
            .expect("instance present")
    }

    #[test]
    fn no_required_slots_no_gap() {
        let repo = MemoryRepository::new();
        repo.seed_node("live", "/a", "acme:page");
        let node = live_instance(&repo, "/a");

        assert!(missing_children(&repo, &node, &required(&[])).is_empty());
    }

    #[test]
    fn all_slots_missing() {
        let repo = MemoryRepository::new();
        repo.seed_node("live", "/a", "acme:page");
        let node = live_instance(&repo, "/a");

        let gaps = missing_children(
            &repo,
            &node,
            &required(&[("main", "acme:content"), ("hero", "acme:banner")]),
        );
        let names: Vec<&str> = gaps.iter().map(|n| n.as_str()).collect();
        // Sorted by slot name
        assert_eq!(names, vec!["hero", "main"]);
    }

    #[test]
    fn present_children_are_not_gaps() {
        let repo = MemoryRepository::new();
        repo.seed_node("live", "/a", "acme:page");
        repo.seed_node("live", "/a/main", "acme:content");
        let node = live_instance(&repo, "/a");

        let gaps = missing_children(
            &repo,
            &node,
            &required(&[("main", "acme:content"), ("hero", "acme:banner")]),
        );
        let names: Vec<&str> = gaps.iter().map(|n| n.as_str()).collect();
        assert_eq!(names, vec!["hero"]);
    }

    #[test]
    fn child_type_is_not_verified() {
        let repo = MemoryRepository::new();
        repo.seed_node("live", "/a", "acme:page");
        // Wrong type in the slot; presence is all that counts
        repo.seed_node("live", "/a/main", "acme:banner");
        let node = live_instance(&repo, "/a");

        let gaps = missing_children(&repo, &node, &required(&[("main", "acme:content")]));
        assert!(gaps.is_empty());
    }

    #[test]
    fn removed_child_reads_as_missing() {
        let repo = MemoryRepository::new();
        repo.seed_node("live", "/a", "acme:page");
        repo.seed_removed_node("live", "/a/main", "acme:content");
        let node = live_instance(&repo, "/a");

        let gaps = missing_children(&repo, &node, &required(&[("main", "acme:content")]));
        assert_eq!(gaps.len(), 1);
    }
}
