//! HTTP handlers and routing

use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

use dazzign_core::{
    structured_prompt, ActionKind, ImageNode, NodeId, DEFAULT_NEGATIVE_PROMPT,
};
use dazzign_storage::{NewNode, PostgresStorage};

use crate::metrics;
use crate::providers::{GenerationRequest, ImageBackend, SpecBackend};
use crate::samples;
use crate::types::{
    GenerateImageRequest, HealthResponse, NodeResponse, NodeTreeResponse, PaginationParams,
    RootNodesResponse, ToSpecRequest, ToSpecResponse, TreeNodeResponse,
};

/// Shared state for all handlers
#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<PostgresStorage>,
    pub image_backend: Arc<dyn ImageBackend>,
    pub spec_backend: Arc<dyn SpecBackend>,
    pub sample_fallback: bool,
}

/// Errors surfaced to HTTP clients
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Upstream(String),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Upstream(_) => StatusCode::BAD_GATEWAY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(status = %status, detail = %self, "request failed");
        }
        (status, Json(json!({ "detail": self.to_string() }))).into_response()
    }
}

impl From<dazzign_storage::Error> for ApiError {
    fn from(err: dazzign_storage::Error) -> Self {
        match err {
            dazzign_storage::Error::NotFound(msg) => ApiError::NotFound(msg),
            dazzign_storage::Error::ValidationError(msg) => ApiError::BadRequest(msg),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

/// Build the application router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/ready", get(ready))
        .route("/metrics", get(metrics_handler))
        .route("/node/root", get(list_root_nodes))
        .route("/node/:id", get(get_node))
        .route("/node/:id/tree", get(get_node_tree))
        .route("/text-gen/to-spec", post(to_spec))
        .route("/images/generate", post(generate_image))
        .with_state(state)
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

async fn ready(State(state): State<AppState>) -> Response {
    match state.storage.health_check().await {
        Ok(()) => (StatusCode::OK, Json(json!({ "status": "ready" }))).into_response(),
        Err(err) => {
            warn!(error = %err, "readiness check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "not ready" })),
            )
                .into_response()
        }
    }
}

async fn metrics_handler() -> Response {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        metrics::gather(),
    )
        .into_response()
}

/// Validate pagination and compute the row offset
///
/// The page and page size arrive straight off the query string, so the
/// multiplication must not be allowed to overflow.
fn pagination_offset(page: i64, page_size: i64) -> Result<i64, ApiError> {
    if page < 1 {
        return Err(ApiError::BadRequest("page must be >= 1".to_string()));
    }
    if !(1..=100).contains(&page_size) {
        return Err(ApiError::BadRequest(
            "page_size must be between 1 and 100".to_string(),
        ));
    }
    page.checked_sub(1)
        .and_then(|p| p.checked_mul(page_size))
        .ok_or_else(|| ApiError::BadRequest("page is out of range".to_string()))
}

#[instrument(skip(state))]
async fn list_root_nodes(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<RootNodesResponse>, ApiError> {
    let offset = pagination_offset(params.page, params.page_size)?;
    let (nodes, total) = match state.storage.list_root_nodes(params.page_size, offset).await {
        Ok(result) => result,
        Err(err) if state.sample_fallback && !matches!(err, dazzign_storage::Error::ValidationError(_)) => {
            warn!(error = %err, "serving sample root nodes after storage failure");
            metrics::SAMPLE_FALLBACKS_TOTAL
                .with_label_values(&["root_nodes"])
                .inc();
            let samples = samples::sample_root_nodes();
            let total = samples.len() as i64;
            return Ok(Json(RootNodesResponse {
                nodes: samples.into_iter().map(NodeResponse::from).collect(),
                total,
                page: params.page,
                page_size: params.page_size,
            }));
        }
        Err(err) => return Err(err.into()),
    };

    let nodes = nodes
        .into_iter()
        .map(|row| ImageNode::try_from(row).map(NodeResponse::from))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Json(RootNodesResponse {
        nodes,
        total,
        page: params.page,
        page_size: params.page_size,
    }))
}

#[instrument(skip(state))]
async fn get_node(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<NodeResponse>, ApiError> {
    let node = match state.storage.get_node(id).await {
        Ok(row) => ImageNode::try_from(row)?,
        Err(dazzign_storage::Error::NotFound(msg)) => return Err(ApiError::NotFound(msg)),
        Err(err) if state.sample_fallback => {
            warn!(error = %err, "serving sample node after storage failure");
            metrics::SAMPLE_FALLBACKS_TOTAL
                .with_label_values(&["node"])
                .inc();
            samples::sample_node_for(NodeId(id))
        }
        Err(err) => return Err(err.into()),
    };
    Ok(Json(NodeResponse::from(node)))
}

#[instrument(skip(state))]
async fn get_node_tree(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<NodeTreeResponse>, ApiError> {
    let records = match state.storage.get_lineage_set(id).await {
        Ok(rows) => rows
            .into_iter()
            .map(ImageNode::try_from)
            .collect::<Result<Vec<_>, _>>()?,
        Err(dazzign_storage::Error::NotFound(msg)) => return Err(ApiError::NotFound(msg)),
        Err(err) if state.sample_fallback => {
            warn!(error = %err, "serving sample lineage after storage failure");
            metrics::SAMPLE_FALLBACKS_TOTAL
                .with_label_values(&["node_tree"])
                .inc();
            let tree = dazzign_lineage::build_tree(samples::sample_lineage(), NodeId(1))
                .map_err(|e| ApiError::Internal(e.to_string()))?;
            return Ok(Json(NodeTreeResponse {
                tree: TreeNodeResponse::from(tree),
            }));
        }
        Err(err) => return Err(err.into()),
    };

    let tree = dazzign_lineage::build_tree(records, NodeId(id)).map_err(|err| match err {
        dazzign_lineage::Error::RootNotFound(id) => {
            ApiError::NotFound(format!("Node {id} not found"))
        }
        other => ApiError::Internal(other.to_string()),
    })?;

    Ok(Json(NodeTreeResponse {
        tree: TreeNodeResponse::from(tree),
    }))
}

#[instrument(skip(state, request))]
async fn to_spec(
    State(state): State<AppState>,
    Json(request): Json<ToSpecRequest>,
) -> Result<Json<ToSpecResponse>, ApiError> {
    if request.prompt.trim().is_empty() {
        return Err(ApiError::BadRequest("prompt must not be empty".to_string()));
    }

    let provider = state.spec_backend.name();
    let attributes = match state.spec_backend.extract(&request.prompt).await {
        Ok(spec) => {
            metrics::SPEC_EXTRACTIONS_TOTAL
                .with_label_values(&[provider, "success"])
                .inc();
            spec
        }
        Err(err) => {
            // Extraction never fails the request: fall back to the local scanner
            warn!(provider, error = %err, "spec extraction failed, using keyword scan");
            metrics::SPEC_EXTRACTIONS_TOTAL
                .with_label_values(&[provider, "error"])
                .inc();
            dazzign_core::extract_spec(&request.prompt)
        }
    };

    let structured = structured_prompt(&attributes);
    Ok(Json(ToSpecResponse {
        prompt: request.prompt,
        attributes,
        structured_prompt: structured,
    }))
}

/// Decide the action for a generation request. An explicit action must be
/// consistent with the presence of a parent; with no explicit action, a
/// parent means edit and no parent means generate.
fn resolve_action(
    action: Option<ActionKind>,
    parent_id: Option<NodeId>,
) -> Result<ActionKind, ApiError> {
    match (action, parent_id) {
        (Some(ActionKind::Edit), None) => Err(ApiError::BadRequest(
            "edit action requires a parent_id".to_string(),
        )),
        (Some(ActionKind::Generate), Some(_)) => Err(ApiError::BadRequest(
            "generate action cannot have a parent_id".to_string(),
        )),
        (Some(action), _) => Ok(action),
        (None, Some(_)) => Ok(ActionKind::Edit),
        (None, None) => Ok(ActionKind::Generate),
    }
}

#[instrument(skip(state, request))]
async fn generate_image(
    State(state): State<AppState>,
    Json(request): Json<GenerateImageRequest>,
) -> Result<(StatusCode, Json<NodeResponse>), ApiError> {
    if request.prompt.trim().is_empty() {
        return Err(ApiError::BadRequest("prompt must not be empty".to_string()));
    }

    let action = resolve_action(request.action, request.parent_id)?;

    if let Some(parent_id) = request.parent_id {
        // Reject dangling parents up front instead of surfacing a
        // foreign-key violation from the insert
        state.storage.get_node(parent_id.0).await.map_err(|err| match err {
            dazzign_storage::Error::NotFound(_) => {
                ApiError::BadRequest(format!("Parent node {parent_id} not found"))
            }
            other => other.into(),
        })?;
    }

    // When the request carries a spec, generate from its structured prompt;
    // otherwise use the free-form prompt as-is
    let generation_prompt = if request.spec.is_empty() {
        request.prompt.clone()
    } else {
        structured_prompt(&request.spec)
    };
    let negative_prompt = request
        .negative_prompt
        .clone()
        .unwrap_or_else(|| DEFAULT_NEGATIVE_PROMPT.to_string());

    let mut generation = GenerationRequest::new(generation_prompt.clone(), negative_prompt.clone());
    if let Some(seed) = request.seed {
        generation.seed = seed;
    }

    let provider = state.image_backend.name();
    let timer = metrics::GENERATION_DURATION_SECONDS
        .with_label_values(&[provider])
        .start_timer();
    let image_base64 = match state.image_backend.generate(&generation).await {
        Ok(image) => {
            timer.observe_duration();
            metrics::GENERATION_TOTAL
                .with_label_values(&[provider, "success"])
                .inc();
            image
        }
        Err(err) => {
            timer.observe_duration();
            metrics::GENERATION_TOTAL
                .with_label_values(&[provider, "error"])
                .inc();
            error!(provider, error = %err, "image generation failed");
            return Err(ApiError::Upstream(format!(
                "Image generation failed: {err}"
            )));
        }
    };

    let new_node = NewNode {
        is_root: action == ActionKind::Generate,
        parent_id: request.parent_id.map(|id| id.0),
        prompt: request.prompt.clone(),
        negative_prompt: Some(negative_prompt),
        spec: request.spec.clone(),
        request_params: Some(json!({
            "generation_prompt": generation_prompt,
            "seed": request.seed,
            "provider": provider,
        })),
        image_base64: Some(image_base64),
        image_path: None,
        action,
    };

    let row = state.storage.create_node(&new_node).await?;
    let node = ImageNode::try_from(row)?;
    info!(node_id = %node.id, action = %node.action, "created node");

    Ok((StatusCode::CREATED, Json(NodeResponse::from(node))))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_action_defaults() {
        assert_eq!(resolve_action(None, None).unwrap(), ActionKind::Generate);
        assert_eq!(
            resolve_action(None, Some(NodeId(1))).unwrap(),
            ActionKind::Edit
        );
    }

    #[test]
    fn test_resolve_action_rejects_inconsistent_requests() {
        assert!(resolve_action(Some(ActionKind::Edit), None).is_err());
        assert!(resolve_action(Some(ActionKind::Generate), Some(NodeId(1))).is_err());
    }

    #[test]
    fn test_pagination_offset() {
        assert_eq!(pagination_offset(1, 20).unwrap(), 0);
        assert_eq!(pagination_offset(3, 20).unwrap(), 40);
        assert!(pagination_offset(0, 20).is_err());
        assert!(pagination_offset(1, 0).is_err());
        assert!(pagination_offset(1, 101).is_err());
    }

    #[test]
    fn test_huge_page_is_rejected_not_overflowed() {
        let err = pagination_offset(i64::MAX, 100).unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_api_error_status_codes() {
        assert_eq!(
            ApiError::NotFound("x".into()).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::BadRequest("x".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Upstream("x".into()).status(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            ApiError::Internal("x".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_storage_errors_map_to_api_errors() {
        let err: ApiError = dazzign_storage::Error::NotFound("Node 9 not found".into()).into();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);

        let err: ApiError = dazzign_storage::Error::ValidationError("bad page".into()).into();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);

        let err: ApiError = dazzign_storage::Error::Internal("corrupt".into()).into();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
