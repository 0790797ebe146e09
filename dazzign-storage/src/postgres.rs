//! PostgreSQL storage implementation

use crate::models::{NewNode, NodeModel};
use crate::Result;
use sqlx::{postgres::PgPoolOptions, PgPool};
use tracing::instrument;

/// Configuration for the PostgreSQL connection pool
#[derive(Debug, Clone)]
pub struct PoolConfig {
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_secs: u64,
    pub idle_timeout_secs: Option<u64>,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_connections: 5,
            min_connections: 1,
            acquire_timeout_secs: 30,
            idle_timeout_secs: None,
        }
    }
}

/// PostgreSQL storage backend for image nodes
pub struct PostgresStorage {
    pool: PgPool,
}

const NODE_COLUMNS: &str = "id, is_root, parent_id, prompt, negative_prompt, spec_json, \
     request_params, image_base64, image_path, action_type, created_at";

impl PostgresStorage {
    /// Connect with the default pool configuration
    pub async fn new(database_url: &str) -> Result<Self> {
        Self::with_pool_config(database_url, PoolConfig::default()).await
    }

    /// Connect using an explicit pool configuration
    pub async fn with_pool_config(database_url: &str, config: PoolConfig) -> Result<Self> {
        if config.min_connections == 0 {
            return Err(crate::Error::ValidationError(
                "min_connections must be > 0".to_string(),
            ));
        }
        if config.max_connections < config.min_connections {
            return Err(crate::Error::ValidationError(
                "max_connections must be >= min_connections".to_string(),
            ));
        }

        let mut opts = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(std::time::Duration::from_secs(config.acquire_timeout_secs));

        if let Some(idle) = config.idle_timeout_secs {
            opts = opts.idle_timeout(std::time::Duration::from_secs(idle));
        }

        let pool = opts.connect(database_url).await?;
        Ok(Self { pool })
    }

    /// Get a reference to the connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    // ========== Input Validation Helpers ==========

    /// Validate pagination parameters
    fn validate_pagination_params(limit: i64, offset: i64) -> Result<()> {
        if limit <= 0 {
            return Err(crate::Error::ValidationError(
                "Limit must be greater than 0".to_string(),
            ));
        }
        if limit > 100 {
            return Err(crate::Error::ValidationError(
                "Limit cannot exceed 100".to_string(),
            ));
        }
        if offset < 0 {
            return Err(crate::Error::ValidationError(
                "Offset must be non-negative".to_string(),
            ));
        }
        Ok(())
    }

    /// Validate a new node before it touches the database
    fn validate_new_node(node: &NewNode) -> Result<()> {
        if node.prompt.trim().is_empty() {
            return Err(crate::Error::ValidationError(
                "Prompt cannot be empty".to_string(),
            ));
        }
        match (node.is_root, node.parent_id) {
            (true, Some(_)) => Err(crate::Error::ValidationError(
                "A root node cannot have a parent".to_string(),
            )),
            (false, None) => Err(crate::Error::ValidationError(
                "A non-root node must have a parent".to_string(),
            )),
            _ => Ok(()),
        }
    }

    // ========== Node Operations ==========

    /// Insert a new node and return the stored row
    ///
    /// Nodes are immutable once created; there are no update or delete
    /// operations. The root/parent invariant is validated here and again by
    /// a CHECK constraint at rest.
    #[instrument(
        skip(self, node),
        fields(
            db.system = "postgresql",
            db.operation = "INSERT",
            db.sql.table = "nodes",
            parent_id = ?node.parent_id,
            action = %node.action
        )
    )]
    pub async fn create_node(&self, node: &NewNode) -> Result<NodeModel> {
        Self::validate_new_node(node)?;

        let created = sqlx::query_as::<_, NodeModel>(
            r#"
            INSERT INTO nodes (
                is_root, parent_id, prompt, negative_prompt, spec_json,
                request_params, image_base64, image_path, action_type
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id, is_root, parent_id, prompt, negative_prompt, spec_json,
                      request_params, image_base64, image_path, action_type, created_at
            "#,
        )
        .bind(node.is_root)
        .bind(node.parent_id)
        .bind(&node.prompt)
        .bind(&node.negative_prompt)
        .bind(sqlx::types::Json(&node.spec))
        .bind(node.request_params.as_ref().map(sqlx::types::Json))
        .bind(&node.image_base64)
        .bind(&node.image_path)
        .bind(node.action.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    /// Point lookup by id
    #[instrument(
        skip(self),
        fields(
            db.system = "postgresql",
            db.operation = "SELECT",
            db.sql.table = "nodes",
            node_id = %id
        )
    )]
    pub async fn get_node(&self, id: i64) -> Result<NodeModel> {
        let node = sqlx::query_as::<_, NodeModel>(&format!(
            "SELECT {NODE_COLUMNS} FROM nodes WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| crate::Error::NotFound(format!("Node {id}")))?;

        Ok(node)
    }

    /// List root-flagged nodes, newest first, with a total count
    #[instrument(skip(self), fields(limit = limit, offset = offset))]
    pub async fn list_root_nodes(&self, limit: i64, offset: i64) -> Result<(Vec<NodeModel>, i64)> {
        Self::validate_pagination_params(limit, offset)?;

        let nodes = sqlx::query_as::<_, NodeModel>(&format!(
            r#"
            SELECT {NODE_COLUMNS}
            FROM nodes
            WHERE is_root
            ORDER BY created_at DESC, id DESC
            LIMIT $1 OFFSET $2
            "#
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let total: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM nodes WHERE is_root")
            .fetch_one(&self.pool)
            .await?;

        Ok((nodes, total.0))
    }

    /// All records reachable from `id`: its ancestors, itself, and every
    /// descendant
    ///
    /// The traversal breadth is delegated entirely to the database via a
    /// recursive CTE; rows come back oldest first so tree construction sees
    /// them in insertion order.
    #[instrument(
        skip(self),
        fields(
            db.system = "postgresql",
            db.operation = "SELECT",
            db.sql.table = "nodes",
            node_id = %id
        )
    )]
    pub async fn get_lineage_set(&self, id: i64) -> Result<Vec<NodeModel>> {
        let rows = sqlx::query_as::<_, NodeModel>(
            r#"
            WITH RECURSIVE ancestors AS (
                SELECT n.* FROM nodes n WHERE n.id = $1
                UNION ALL
                SELECT n.* FROM nodes n
                JOIN ancestors a ON n.id = a.parent_id
            ),
            descendants AS (
                SELECT n.* FROM nodes n WHERE n.id = $1
                UNION ALL
                SELECT n.* FROM nodes n
                JOIN descendants d ON n.parent_id = d.id
            ),
            lineage AS (
                SELECT * FROM ancestors
                UNION
                SELECT * FROM descendants
            )
            SELECT id, is_root, parent_id, prompt, negative_prompt, spec_json,
                   request_params, image_base64, image_path, action_type, created_at
            FROM lineage
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        if rows.is_empty() {
            return Err(crate::Error::NotFound(format!("Node {id}")));
        }
        Ok(rows)
    }

    /// Health check for readiness probes
    #[instrument(skip(self))]
    pub async fn health_check(&self) -> Result<()> {
        sqlx::query("SELECT 1").fetch_one(&self.pool).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_validation() {
        assert!(PostgresStorage::validate_pagination_params(20, 0).is_ok());
        assert!(PostgresStorage::validate_pagination_params(0, 0).is_err());
        assert!(PostgresStorage::validate_pagination_params(101, 0).is_err());
        assert!(PostgresStorage::validate_pagination_params(20, -1).is_err());
    }

    #[test]
    fn test_new_node_validation_rejects_invariant_violations() {
        let mut root = NewNode::generate("a case");
        assert!(PostgresStorage::validate_new_node(&root).is_ok());

        root.parent_id = Some(9);
        assert!(PostgresStorage::validate_new_node(&root).is_err());

        let mut edit = NewNode::edit(1, "a darker case");
        assert!(PostgresStorage::validate_new_node(&edit).is_ok());

        edit.parent_id = None;
        assert!(PostgresStorage::validate_new_node(&edit).is_err());
    }

    #[test]
    fn test_new_node_validation_rejects_blank_prompt() {
        let node = NewNode::generate("   ");
        assert!(PostgresStorage::validate_new_node(&node).is_err());
    }

    // Queries against a live database are covered by the server's
    // integration environment; unit tests here stay connection-free.
}
