//! History-view layout
//!
//! Flattens a lineage tree into the layout model the history view draws
//! from: one row of nodes per depth level plus the parent→child connector
//! edges. The currently-active node is passed in as plain data and stamped
//! onto the layout; nothing here holds shared state.

use crate::tree::LineageNode;
use dazzign_core::NodeId;
use serde::Serialize;
use std::collections::VecDeque;

/// One node as placed in the layout
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LayoutNode {
    pub id: NodeId,
    pub parent_id: Option<NodeId>,

    /// Row index, i.e. distance from the layout root
    pub depth: usize,

    /// Whether this is the currently-active node
    pub active: bool,

    /// Number of direct children, for drawing fan-out connectors
    pub child_count: usize,
}

/// A parent→child connector line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LayoutEdge {
    pub from: NodeId,
    pub to: NodeId,
}

/// Emitted when a node in the layout is activated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SelectionEvent {
    pub node_id: NodeId,
}

/// The laid-out lineage tree: rows of nodes plus connector edges
///
/// Purely presentational; building it has no side effects and selection
/// emits an event for the caller to dispatch upward.
#[derive(Debug, Clone, Serialize)]
pub struct TreeLayout {
    rows: Vec<Vec<LayoutNode>>,
    edges: Vec<LayoutEdge>,
}

impl TreeLayout {
    /// Lay out `root` level by level, marking `active` if present
    ///
    /// Within a row, nodes appear in breadth-first order, which preserves
    /// each parent's stored child order.
    pub fn build(root: &LineageNode, active: Option<NodeId>) -> Self {
        let mut rows: Vec<Vec<LayoutNode>> = Vec::new();
        let mut edges = Vec::new();
        let mut queue: VecDeque<(&LineageNode, usize)> = VecDeque::new();
        queue.push_back((root, 0));

        while let Some((node, depth)) = queue.pop_front() {
            if rows.len() == depth {
                rows.push(Vec::new());
            }
            rows[depth].push(LayoutNode {
                id: node.node.id,
                parent_id: node.node.parent_id,
                depth,
                active: active == Some(node.node.id),
                child_count: node.children.len(),
            });
            for child in &node.children {
                edges.push(LayoutEdge {
                    from: node.node.id,
                    to: child.node.id,
                });
                queue.push_back((child, depth + 1));
            }
        }

        Self { rows, edges }
    }

    /// Rows of nodes, index 0 being the root row
    pub fn rows(&self) -> &[Vec<LayoutNode>] {
        &self.rows
    }

    /// Parent→child connector edges in layout order
    pub fn edges(&self) -> &[LayoutEdge] {
        &self.edges
    }

    /// Total number of laid-out nodes
    pub fn node_count(&self) -> usize {
        self.rows.iter().map(Vec::len).sum()
    }

    /// Whether `id` was laid out
    pub fn contains(&self, id: NodeId) -> bool {
        self.rows.iter().flatten().any(|n| n.id == id)
    }

    /// The active node's id, if any was marked
    pub fn active_node(&self) -> Option<NodeId> {
        self.rows
            .iter()
            .flatten()
            .find(|n| n.active)
            .map(|n| n.id)
    }

    /// Activate a node: emits exactly one selection event carrying its id
    /// when the node exists in this layout, and nothing otherwise
    pub fn select(&self, id: NodeId) -> Option<SelectionEvent> {
        self.contains(id).then_some(SelectionEvent { node_id: id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::build_tree;
    use dazzign_core::ImageNode;

    fn layout(active: Option<NodeId>) -> TreeLayout {
        let records = vec![
            ImageNode::root(1, "origin"),
            ImageNode::child_of(2, 1, "v2"),
            ImageNode::child_of(3, 1, "v3"),
            ImageNode::child_of(4, 2, "v4"),
        ];
        let tree = build_tree(records, NodeId(1)).unwrap();
        TreeLayout::build(&tree, active)
    }

    #[test]
    fn test_rows_follow_depth() {
        let layout = layout(None);

        let row_ids: Vec<Vec<i64>> = layout
            .rows()
            .iter()
            .map(|row| row.iter().map(|n| n.id.0).collect())
            .collect();
        assert_eq!(row_ids, vec![vec![1], vec![2, 3], vec![4]]);
        assert_eq!(layout.node_count(), 4);
    }

    #[test]
    fn test_edges_connect_parents_to_children() {
        let layout = layout(None);

        let edges: Vec<(i64, i64)> = layout.edges().iter().map(|e| (e.from.0, e.to.0)).collect();
        assert_eq!(edges, [(1, 2), (1, 3), (2, 4)]);
    }

    #[test]
    fn test_active_node_is_plain_data() {
        let layout = layout(Some(NodeId(3)));
        assert_eq!(layout.active_node(), Some(NodeId(3)));

        let inactive = layout
            .rows()
            .iter()
            .flatten()
            .filter(|n| !n.active)
            .count();
        assert_eq!(inactive, 3);
    }

    #[test]
    fn test_select_emits_exactly_one_event_with_the_id() {
        let layout = layout(None);

        let event = layout.select(NodeId(4));
        assert_eq!(event, Some(SelectionEvent { node_id: NodeId(4) }));
    }

    #[test]
    fn test_select_unknown_node_emits_nothing() {
        let layout = layout(None);
        assert_eq!(layout.select(NodeId(42)), None);
    }

    #[test]
    fn test_child_count_for_fan_out() {
        let layout = layout(None);
        let root = &layout.rows()[0][0];
        assert_eq!(root.child_count, 2);
        let leaf = &layout.rows()[2][0];
        assert_eq!(leaf.child_count, 0);
    }
}
