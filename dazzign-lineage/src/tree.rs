//! Lineage tree construction
//!
//! A lineage is stored flat: every record carries its own id and an optional
//! parent id. `build_tree` turns one lineage's records into a rooted tree.
//! Construction is fully iterative (adjacency grouping plus a breadth-first
//! worklist) so pathologically deep edit chains cannot overflow the stack.

use crate::{Error, Result};
use dazzign_core::{ImageNode, NodeId};
use serde::Serialize;
use std::collections::{HashMap, HashSet, VecDeque};

/// A node of the in-memory lineage tree
///
/// Transient and derived: rebuilt on every view load, never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct LineageNode {
    /// The underlying image record
    pub node: ImageNode,

    /// Children in input-collection order
    pub children: Vec<LineageNode>,
}

impl LineageNode {
    fn leaf(node: ImageNode) -> Self {
        Self {
            node,
            children: Vec::new(),
        }
    }

    /// Number of nodes in this subtree, including self
    pub fn node_count(&self) -> usize {
        self.breadth_first().len()
    }

    /// Depth of the deepest descendant; a lone node has depth 0
    pub fn depth(&self) -> usize {
        let mut max_depth = 0;
        let mut queue: VecDeque<(&LineageNode, usize)> = VecDeque::new();
        queue.push_back((self, 0));
        while let Some((node, depth)) = queue.pop_front() {
            max_depth = max_depth.max(depth);
            for child in &node.children {
                queue.push_back((child, depth + 1));
            }
        }
        max_depth
    }

    /// Find the subtree rooted at `id`, if present
    pub fn find(&self, id: NodeId) -> Option<&LineageNode> {
        self.breadth_first().into_iter().find(|n| n.node.id == id)
    }

    /// All nodes of this subtree in breadth-first order, children kept in
    /// their stored order
    pub fn breadth_first(&self) -> Vec<&LineageNode> {
        let mut out = Vec::new();
        let mut queue: VecDeque<&LineageNode> = VecDeque::new();
        queue.push_back(self);
        while let Some(node) = queue.pop_front() {
            out.push(node);
            for child in &node.children {
                queue.push_back(child);
            }
        }
        out
    }
}

/// Build the lineage tree rooted at `root_id` from one lineage's flat records
///
/// Children are attached in the order their records appear in `records`
/// (stable; never sorted by any key). Records not reachable from the root
/// (e.g. its ancestors, when the full lineage set is passed in) are simply
/// left out of the result. Duplicate ids are a data-integrity precondition
/// of the caller and are not validated here.
///
/// # Errors
///
/// Returns [`Error::RootNotFound`] when no record's id matches `root_id`,
/// and [`Error::InvalidLineage`] when a parent cycle is reachable from the
/// root (corrupt data; the walk must not spin on it).
pub fn build_tree(records: Vec<ImageNode>, root_id: NodeId) -> Result<LineageNode> {
    if !records.iter().any(|r| r.id == root_id) {
        return Err(Error::RootNotFound(root_id));
    }

    // Group child ids by parent id, preserving input order.
    let mut children_of: HashMap<NodeId, Vec<NodeId>> = HashMap::new();
    for record in &records {
        if let Some(parent_id) = record.parent_id {
            children_of.entry(parent_id).or_default().push(record.id);
        }
    }

    let mut leaves: HashMap<NodeId, LineageNode> = records
        .into_iter()
        .map(|record| (record.id, LineageNode::leaf(record)))
        .collect();

    // Breadth-first pass from the root to fix the attachment order: a
    // parent's subtree is assembled only after every deeper level is done,
    // so we replay the BFS order in reverse.
    let mut order = Vec::new();
    let mut seen = HashSet::new();
    seen.insert(root_id);
    let mut queue = VecDeque::new();
    queue.push_back(root_id);
    while let Some(id) = queue.pop_front() {
        order.push(id);
        if let Some(child_ids) = children_of.get(&id) {
            for &child_id in child_ids {
                if !seen.insert(child_id) {
                    return Err(Error::InvalidLineage(format!(
                        "parent cycle at node {child_id}"
                    )));
                }
                queue.push_back(child_id);
            }
        }
    }

    for id in order.into_iter().rev() {
        if let Some(child_ids) = children_of.get(&id) {
            let mut children = Vec::with_capacity(child_ids.len());
            for child_id in child_ids {
                if let Some(child) = leaves.remove(child_id) {
                    children.push(child);
                }
            }
            if let Some(parent) = leaves.get_mut(&id) {
                parent.children = children;
            }
        }
    }

    leaves
        .remove(&root_id)
        .ok_or_else(|| Error::RootNotFound(root_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use dazzign_core::ImageNode;

    fn records() -> Vec<ImageNode> {
        vec![
            ImageNode::root(1, "origin"),
            ImageNode::child_of(2, 1, "v2"),
            ImageNode::child_of(3, 1, "v3"),
            ImageNode::child_of(4, 2, "v4"),
        ]
    }

    fn child_ids(node: &LineageNode) -> Vec<i64> {
        node.children.iter().map(|c| c.node.id.0).collect()
    }

    #[test]
    fn test_small_lineage_shape() {
        // [{id:1,parent:none},{id:2,parent:1},{id:3,parent:1},{id:4,parent:2}]
        let tree = build_tree(records(), NodeId(1)).unwrap();

        assert_eq!(tree.node.id, NodeId(1));
        assert_eq!(child_ids(&tree), [2, 3]);
        assert_eq!(child_ids(&tree.children[0]), [4]);
        assert!(tree.children[1].children.is_empty());
    }

    #[test]
    fn test_every_non_root_attached_under_its_parent() {
        let tree = build_tree(records(), NodeId(1)).unwrap();

        for node in tree.breadth_first() {
            for child in &node.children {
                assert_eq!(child.node.parent_id, Some(node.node.id));
            }
        }
        assert_eq!(tree.node_count(), 4);
    }

    #[test]
    fn test_root_not_found() {
        let err = build_tree(records(), NodeId(99)).unwrap_err();
        assert!(matches!(err, Error::RootNotFound(NodeId(99))));
    }

    #[test]
    fn test_children_follow_input_order_not_id_order() {
        let records = vec![
            ImageNode::root(1, "origin"),
            ImageNode::child_of(5, 1, "later id first"),
            ImageNode::child_of(2, 1, "earlier id second"),
        ];
        let tree = build_tree(records, NodeId(1)).unwrap();
        assert_eq!(child_ids(&tree), [5, 2]);
    }

    #[test]
    fn test_rebuild_is_idempotent() {
        let first = build_tree(records(), NodeId(1)).unwrap();
        let second = build_tree(records(), NodeId(1)).unwrap();

        let shape = |tree: &LineageNode| {
            tree.breadth_first()
                .iter()
                .map(|n| (n.node.id, child_ids(n)))
                .collect::<Vec<_>>()
        };
        assert_eq!(shape(&first), shape(&second));
    }

    #[test]
    fn test_subtree_root_drops_ancestors() {
        // Rooting at 2 must keep 4 and drop 1 and 3.
        let tree = build_tree(records(), NodeId(2)).unwrap();
        assert_eq!(tree.node.id, NodeId(2));
        assert_eq!(tree.node_count(), 2);
        assert_eq!(child_ids(&tree), [4]);
    }

    #[test]
    fn test_deep_chain_does_not_recurse() {
        // 10k-deep edit chain; a recursive build would overflow the stack.
        let mut records = vec![ImageNode::root(0, "origin")];
        for i in 1..10_000 {
            records.push(ImageNode::child_of(i, i - 1, format!("v{i}")));
        }
        let tree = build_tree(records, NodeId(0)).unwrap();
        assert_eq!(tree.node_count(), 10_000);
        assert_eq!(tree.depth(), 9_999);
    }

    #[test]
    fn test_parent_cycle_is_rejected() {
        // Two records pointing at each other; each alone satisfies the
        // root/parent invariant. The build must stop and report it.
        let records = vec![
            ImageNode::child_of(1, 2, "a"),
            ImageNode::child_of(2, 1, "b"),
        ];
        let err = build_tree(records, NodeId(1)).unwrap_err();
        assert!(matches!(err, Error::InvalidLineage(_)));
    }

    #[test]
    fn test_single_node_lineage() {
        let tree = build_tree(vec![ImageNode::root(7, "only")], NodeId(7)).unwrap();
        assert_eq!(tree.node_count(), 1);
        assert_eq!(tree.depth(), 0);
        assert!(tree.find(NodeId(7)).is_some());
        assert!(tree.find(NodeId(8)).is_none());
    }
}
