//! Request and response payloads for the HTTP interface

use chrono::{DateTime, Utc};
use dazzign_core::{ActionKind, DesignSpec, ImageNode, NodeId};
use dazzign_lineage::LineageNode;
use serde::{Deserialize, Serialize};

/// One node, as returned by the node endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeResponse {
    pub id: NodeId,
    pub is_root: bool,
    pub parent_id: Option<NodeId>,
    pub prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub negative_prompt: Option<String>,
    #[serde(default, skip_serializing_if = "DesignSpec::is_empty")]
    pub spec: DesignSpec,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_params: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_base64: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_path: Option<String>,
    pub action: ActionKind,
    pub created_at: DateTime<Utc>,
}

impl From<ImageNode> for NodeResponse {
    fn from(node: ImageNode) -> Self {
        Self {
            id: node.id,
            is_root: node.is_root,
            parent_id: node.parent_id,
            prompt: node.prompt,
            negative_prompt: node.negative_prompt,
            spec: node.spec,
            request_params: node.request_params,
            image_base64: node.image_base64,
            image_path: node.image_path,
            action: node.action,
            created_at: node.created_at,
        }
    }
}

/// Paginated list of root nodes
#[derive(Debug, Serialize, Deserialize)]
pub struct RootNodesResponse {
    pub nodes: Vec<NodeResponse>,
    pub total: i64,
    pub page: i64,
    pub page_size: i64,
}

/// One node in a lineage tree, children nested
#[derive(Debug, Serialize)]
pub struct TreeNodeResponse {
    #[serde(flatten)]
    pub node: NodeResponse,
    pub children: Vec<TreeNodeResponse>,
}

impl From<LineageNode> for TreeNodeResponse {
    fn from(lineage: LineageNode) -> Self {
        Self {
            node: NodeResponse::from(lineage.node),
            children: lineage.children.into_iter().map(Self::from).collect(),
        }
    }
}

/// Full lineage tree rooted at the requested node's root ancestor
#[derive(Debug, Serialize)]
pub struct NodeTreeResponse {
    pub tree: TreeNodeResponse,
}

/// Pagination query parameters for GET /node/root
#[derive(Debug, Deserialize)]
pub struct PaginationParams {
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_page_size")]
    pub page_size: i64,
}

fn default_page() -> i64 {
    1
}

fn default_page_size() -> i64 {
    20
}

/// Body for POST /images/generate
#[derive(Debug, Deserialize)]
pub struct GenerateImageRequest {
    pub prompt: String,
    #[serde(default)]
    pub negative_prompt: Option<String>,
    #[serde(default)]
    pub spec: DesignSpec,
    #[serde(default)]
    pub parent_id: Option<NodeId>,
    #[serde(default)]
    pub action: Option<ActionKind>,
    #[serde(default)]
    pub seed: Option<u64>,
}

/// Body for POST /text-gen/to-spec
#[derive(Debug, Deserialize)]
pub struct ToSpecRequest {
    pub prompt: String,
}

/// Extraction result: the original prompt, the attributes found in it, and
/// the structured prompt assembled from them
#[derive(Debug, Serialize)]
pub struct ToSpecResponse {
    pub prompt: String,
    pub attributes: DesignSpec,
    pub structured_prompt: String,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
