//! Database models for image nodes

use chrono::{DateTime, Utc};
use dazzign_core::{ActionKind, DesignSpec, ImageNode, NodeId};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Image node row as stored in the `nodes` table
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct NodeModel {
    pub id: i64,
    pub is_root: bool,
    pub parent_id: Option<i64>,
    pub prompt: String,
    pub negative_prompt: Option<String>,
    pub spec_json: Option<sqlx::types::Json<DesignSpec>>,
    pub request_params: Option<sqlx::types::Json<serde_json::Value>>,
    pub image_base64: Option<String>,
    pub image_path: Option<String>,
    pub action_type: String,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<NodeModel> for ImageNode {
    type Error = crate::Error;

    fn try_from(row: NodeModel) -> crate::Result<ImageNode> {
        let action: ActionKind = row
            .action_type
            .parse()
            .map_err(|e| crate::Error::Internal(format!("corrupt action_type: {e}")))?;

        Ok(ImageNode {
            id: NodeId(row.id),
            is_root: row.is_root,
            parent_id: row.parent_id.map(NodeId),
            prompt: row.prompt,
            negative_prompt: row.negative_prompt,
            spec: row.spec_json.map(|json| json.0).unwrap_or_default(),
            request_params: row.request_params.map(|json| json.0),
            image_base64: row.image_base64,
            image_path: row.image_path,
            action,
            created_at: row.created_at,
        })
    }
}

/// Values for inserting a new node; the id is assigned by the database
#[derive(Debug, Clone)]
pub struct NewNode {
    pub is_root: bool,
    pub parent_id: Option<i64>,
    pub prompt: String,
    pub negative_prompt: Option<String>,
    pub spec: DesignSpec,
    pub request_params: Option<serde_json::Value>,
    pub image_base64: Option<String>,
    pub image_path: Option<String>,
    pub action: ActionKind,
}

impl NewNode {
    /// A fresh root generation
    pub fn generate(prompt: impl Into<String>) -> Self {
        Self {
            is_root: true,
            parent_id: None,
            prompt: prompt.into(),
            negative_prompt: None,
            spec: DesignSpec::default(),
            request_params: None,
            image_base64: None,
            image_path: None,
            action: ActionKind::Generate,
        }
    }

    /// An edit branched from `parent_id`
    pub fn edit(parent_id: i64, prompt: impl Into<String>) -> Self {
        Self {
            is_root: false,
            parent_id: Some(parent_id),
            prompt: prompt.into(),
            negative_prompt: None,
            spec: DesignSpec::default(),
            request_params: None,
            image_base64: None,
            image_path: None,
            action: ActionKind::Edit,
        }
    }
}
