//! Bundled sample data
//!
//! Tiny placeholder PNGs served by the sample image backend, and a small
//! canned lineage used when the read-path sample fallback is enabled.

use dazzign_core::{extract_spec, ImageNode, NodeId};

/// Small base64-encoded PNGs, used in place of real renders
pub const SAMPLE_IMAGES: [&str; 4] = [
    // 1x1 transparent
    "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mP8z8BQDwAEhQGAhKmMIQAAAABJRU5ErkJggg==",
    // 1x1 dark
    "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAQAAAC1HAwCAAAAC0lEQVR42mNk+A8AAQUBAScY42YAAAAASUVORK5CYII=",
    // 8x8 gray
    "iVBORw0KGgoAAAANSUhEUgAAAAgAAAAIAQMAAAD+wSzIAAAABlBMVEX///+/v7+jQ3Y5AAAADklEQVQI12P4AIX8EAgALgAD/aNpbtEAAAAASUVORK5CYII",
    // 10x10 blue
    "iVBORw0KGgoAAAANSUhEUgAAAAoAAAAKCAYAAACNMs+9AAAAFUlEQVR42mNkYPhfz0AEYBxVSF+FAP5FDvcfRYWgAAAAAElFTkSuQmCC",
];

const SAMPLE_PROMPTS: [&str; 3] = [
    "a minimalist white mid-tower case with tempered glass",
    "a black cube case with mesh front and rgb lighting",
    "a futuristic open-frame case with water cooling in a dark room",
];

fn sample_node(id: i64, parent_id: Option<i64>, prompt: &str, image_index: usize) -> ImageNode {
    let mut node = match parent_id {
        None => ImageNode::root(NodeId(id), prompt),
        Some(parent) => ImageNode::child_of(NodeId(id), NodeId(parent), prompt),
    };
    node.spec = extract_spec(prompt);
    node.image_base64 = Some(SAMPLE_IMAGES[image_index % SAMPLE_IMAGES.len()].to_string());
    node
}

/// Canned root nodes for the list endpoint fallback
pub fn sample_root_nodes() -> Vec<ImageNode> {
    SAMPLE_PROMPTS
        .iter()
        .enumerate()
        .map(|(i, prompt)| sample_node(i as i64 + 1, None, prompt, i))
        .collect()
}

/// The canned node standing in for `id`, for the single-node fallback
pub fn sample_node_for(id: NodeId) -> ImageNode {
    let mut nodes = sample_root_nodes();
    let pick = nodes.iter().position(|n| n.id == id).unwrap_or(0);
    nodes.swap_remove(pick)
}

/// Canned lineage for the tree endpoint fallback: one root with two
/// children, one of which has a child of its own
pub fn sample_lineage() -> Vec<ImageNode> {
    vec![
        sample_node(1, None, SAMPLE_PROMPTS[0], 0),
        sample_node(2, Some(1), "the same case in black", 1),
        sample_node(3, Some(1), "the same case with rgb lighting", 2),
        sample_node(4, Some(2), "the black version with a mesh front", 3),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_roots_satisfy_invariant() {
        for node in sample_root_nodes() {
            assert!(node.validate_root_invariant().is_ok());
            assert!(node.is_root);
        }
    }

    #[test]
    fn test_sample_node_lookup_prefers_matching_id() {
        assert_eq!(sample_node_for(NodeId(2)).id, NodeId(2));
        // Unknown ids still get a valid node
        let node = sample_node_for(NodeId(99));
        assert!(node.validate_root_invariant().is_ok());
    }

    #[test]
    fn test_sample_lineage_builds_a_tree() {
        let tree = dazzign_lineage::build_tree(sample_lineage(), NodeId(1)).unwrap();
        assert_eq!(tree.node_count(), 4);
        assert_eq!(tree.children.len(), 2);
    }
}
