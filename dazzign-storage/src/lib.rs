//! # Dazzign Storage
//!
//! PostgreSQL persistence for image nodes: one `nodes` table with a
//! nullable self-referential parent column. Point lookup, root listing,
//! and reachable-set queries; everything else lives above this crate.

pub mod migrations;
pub mod models;
pub mod postgres;

// Re-export commonly used types
pub use models::{NewNode, NodeModel};
pub use postgres::{PoolConfig, PostgresStorage};

/// Result type for storage operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for storage operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Migration error: {0}")]
    Migration(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
