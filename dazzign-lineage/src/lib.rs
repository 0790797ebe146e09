//! # Dazzign Lineage
//!
//! Lineage tree operations for image version history: building a rooted
//! tree out of flat parent-pointer records, traversal queries, and the
//! layout model the history view renders from.

pub mod layout;
pub mod queries;
pub mod tree;

// Re-export commonly used types
pub use layout::{LayoutEdge, LayoutNode, SelectionEvent, TreeLayout};
pub use queries::LineageQuery;
pub use tree::{build_tree, LineageNode};

use dazzign_core::NodeId;

/// Result type for lineage operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for lineage operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Root node not found: {0}")]
    RootNotFound(NodeId),

    #[error("Invalid lineage: {0}")]
    InvalidLineage(String),
}
