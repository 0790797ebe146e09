//! # Dazzign Core
//!
//! Core domain types for the Dazzign image-generation service: image nodes
//! with parent/child version lineage, the structured design specification,
//! and prompt composition.

pub mod extract;
pub mod node;
pub mod prompt;
pub mod spec;

// Re-export commonly used types
pub use extract::extract_spec;
pub use node::{ActionKind, ImageNode, NodeId};
pub use prompt::{structured_prompt, DEFAULT_NEGATIVE_PROMPT};
pub use spec::{CategoryInfo, DesignSpec, SpecCategory};

/// Result type for core domain operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for core domain operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid node: {0}")]
    InvalidNode(String),

    #[error("Unknown action kind: {0}")]
    UnknownAction(String),

    #[error("Unknown spec category: {0}")]
    UnknownCategory(String),
}
