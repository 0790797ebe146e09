//! Image node definitions
//!
//! An image node is a single generated or edited image together with the
//! request that produced it. Nodes form a tree: every non-root node points
//! at the node it was branched from.

use crate::spec::DesignSpec;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Unique identifier for an image node
///
/// Identifiers are assigned by storage on insert; in-memory construction
/// (tests, sample data) picks them explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub i64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<i64> for NodeId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

/// How a node was produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    /// Fresh generation from a prompt
    Generate,

    /// Branched from an existing node with a modified prompt or spec
    Edit,
}

impl ActionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::Generate => "generate",
            ActionKind::Edit => "edit",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActionKind {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "generate" => Ok(ActionKind::Generate),
            "edit" => Ok(ActionKind::Edit),
            other => Err(crate::Error::UnknownAction(other.to_string())),
        }
    }
}

/// A single generated or edited image
///
/// Created once by a generation request and immutable thereafter; no update
/// or delete operations are exposed anywhere in the system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageNode {
    /// Unique identifier
    pub id: NodeId,

    /// Whether this node is the origin of its lineage
    pub is_root: bool,

    /// The node this one was branched from; `None` exactly when `is_root`
    pub parent_id: Option<NodeId>,

    /// The user's prompt text
    pub prompt: String,

    /// Negative prompt passed to the image backend
    pub negative_prompt: Option<String>,

    /// Structured design specification
    #[serde(default)]
    pub spec: DesignSpec,

    /// Free-form parameters recorded from the generation request
    pub request_params: Option<serde_json::Value>,

    /// Generated image payload, base64-encoded
    pub image_base64: Option<String>,

    /// Optional path to the image on disk
    pub image_path: Option<String>,

    /// How this node was produced
    pub action: ActionKind,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl ImageNode {
    /// Check the root/parent invariant: a node is root iff it has no parent
    pub fn validate_root_invariant(&self) -> crate::Result<()> {
        match (self.is_root, self.parent_id) {
            (true, Some(parent)) => Err(crate::Error::InvalidNode(format!(
                "node {} is flagged as root but has parent {}",
                self.id, parent
            ))),
            (false, None) => Err(crate::Error::InvalidNode(format!(
                "node {} has no parent but is not flagged as root",
                self.id
            ))),
            _ => Ok(()),
        }
    }

    /// Construct a root node with the given id and prompt
    pub fn root(id: impl Into<NodeId>, prompt: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            is_root: true,
            parent_id: None,
            prompt: prompt.into(),
            negative_prompt: None,
            spec: DesignSpec::default(),
            request_params: None,
            image_base64: None,
            image_path: None,
            action: ActionKind::Generate,
            created_at: Utc::now(),
        }
    }

    /// Construct a node branched from `parent_id`
    pub fn child_of(
        id: impl Into<NodeId>,
        parent_id: impl Into<NodeId>,
        prompt: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            is_root: false,
            parent_id: Some(parent_id.into()),
            prompt: prompt.into(),
            negative_prompt: None,
            spec: DesignSpec::default(),
            request_params: None,
            image_base64: None,
            image_path: None,
            action: ActionKind::Edit,
            created_at: Utc::now(),
        }
    }
}
