//! Lineage traversal queries
//!
//! Queries run over one lineage's flat record set, without materializing the
//! tree: ancestor chains, descendant sets, depth, and root lookup.

use dazzign_core::{ImageNode, NodeId};
use std::collections::{HashMap, HashSet, VecDeque};

/// Query helper over a flat lineage record set
pub struct LineageQuery<'a> {
    records: &'a [ImageNode],
    by_id: HashMap<NodeId, usize>,
    children_of: HashMap<NodeId, Vec<usize>>,
}

impl<'a> LineageQuery<'a> {
    /// Index the given records for traversal
    pub fn new(records: &'a [ImageNode]) -> Self {
        let mut by_id = HashMap::with_capacity(records.len());
        let mut children_of: HashMap<NodeId, Vec<usize>> = HashMap::new();
        for (idx, record) in records.iter().enumerate() {
            by_id.insert(record.id, idx);
            if let Some(parent_id) = record.parent_id {
                children_of.entry(parent_id).or_default().push(idx);
            }
        }
        Self {
            records,
            by_id,
            children_of,
        }
    }

    /// Look up one record by id
    pub fn get(&self, id: NodeId) -> Option<&'a ImageNode> {
        self.by_id.get(&id).map(|&idx| &self.records[idx])
    }

    /// The ancestor chain of `id`, nearest parent first
    ///
    /// Stops at the root, at a dangling parent pointer, or on revisiting a
    /// node (a parent cycle is corrupt data, not a reason to spin forever).
    pub fn ancestors(&self, id: NodeId) -> Vec<&'a ImageNode> {
        let mut out = Vec::new();
        let mut seen = HashSet::new();
        seen.insert(id);

        let mut current = self.get(id).and_then(|n| n.parent_id);
        while let Some(parent_id) = current {
            if !seen.insert(parent_id) {
                break;
            }
            match self.get(parent_id) {
                Some(parent) => {
                    out.push(parent);
                    current = parent.parent_id;
                }
                None => break,
            }
        }
        out
    }

    /// All descendants of `id` in breadth-first order, children kept in
    /// input order
    pub fn descendants(&self, id: NodeId) -> Vec<&'a ImageNode> {
        let mut out = Vec::new();
        let mut queue = VecDeque::new();
        queue.push_back(id);
        while let Some(current) = queue.pop_front() {
            if let Some(child_idxs) = self.children_of.get(&current) {
                for &idx in child_idxs {
                    let child = &self.records[idx];
                    out.push(child);
                    queue.push_back(child.id);
                }
            }
        }
        out
    }

    /// The root record of the lineage containing `id`
    pub fn root_of(&self, id: NodeId) -> Option<&'a ImageNode> {
        match self.ancestors(id).last() {
            Some(top) => Some(top),
            None => self.get(id),
        }
    }

    /// Distance from `id` up to its root
    pub fn depth_of(&self, id: NodeId) -> usize {
        self.ancestors(id).len()
    }
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

    #[test]
    fn test_ancestors_nearest_first() {
        let records = records();
        let query = LineageQuery::new(&records);

        let ancestors: Vec<i64> = query.ancestors(NodeId(4)).iter().map(|n| n.id.0).collect();
        assert_eq!(ancestors, [2, 1]);
        assert!(query.ancestors(NodeId(1)).is_empty());
    }

    #[test]
    fn test_descendants_breadth_first() {
        let records = records();
        let query = LineageQuery::new(&records);

        let descendants: Vec<i64> = query.descendants(NodeId(1)).iter().map(|n| n.id.0).collect();
        assert_eq!(descendants, [2, 3, 4]);
        assert!(query.descendants(NodeId(4)).is_empty());
    }

    #[test]
    fn test_root_and_depth() {
        let records = records();
        let query = LineageQuery::new(&records);

        assert_eq!(query.root_of(NodeId(4)).unwrap().id, NodeId(1));
        assert_eq!(query.root_of(NodeId(1)).unwrap().id, NodeId(1));
        assert_eq!(query.depth_of(NodeId(4)), 2);
        assert_eq!(query.depth_of(NodeId(1)), 0);
    }

    #[test]
    fn test_parent_cycle_terminates() {
        let a = ImageNode::child_of(1, 2, "a");
        let b = ImageNode::child_of(2, 1, "b");
        let records = vec![a, b];
        let query = LineageQuery::new(&records);

        // Corrupt data; the walk must still terminate.
        let ancestors = query.ancestors(NodeId(1));
        assert!(ancestors.len() <= 2);
    }

    #[test]
    fn test_unknown_id() {
        let records = records();
        let query = LineageQuery::new(&records);
        assert!(query.get(NodeId(42)).is_none());
        assert!(query.ancestors(NodeId(42)).is_empty());
    }
}
