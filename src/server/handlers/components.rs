//! Canvas editing handlers: the component tree, drops, patches and grid
//! structure.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::document::{Component, ComponentPatch, ComponentTypeMeta, component_types};
use crate::error::FolioError;
use crate::grid::{CellKey, MergeSpan};

use super::super::state::AppState;
use super::error_response;

type ApiResult<T> = Result<Json<T>, (StatusCode, String)>;

#[derive(Serialize)]
pub struct CanvasResponse {
    pub width: f64,
    pub height: f64,
    pub selected: Option<String>,
    pub active_table: Option<String>,
    pub components: Value,
    pub types: Vec<ComponentTypeMeta>,
}

/// Handle GET /api/components - the whole canvas.
pub async fn list(State(state): State<Arc<AppState>>) -> ApiResult<CanvasResponse> {
    let designer = state.designer.read().await;
    let components = serde_json::to_value(designer.tree())
        .map_err(|e| error_response(FolioError::from(e)))?;
    Ok(Json(CanvasResponse {
        width: designer.config().width,
        height: designer.config().height,
        selected: designer.selected().map(str::to_string),
        active_table: designer.active_table().map(str::to_string),
        components,
        types: component_types(),
    }))
}

/// Where a palette item was dropped.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum DropTarget {
    Cell { grid_id: String, cell: CellKey },
    Canvas { x: f64, y: f64 },
}

#[derive(Debug, Deserialize)]
pub struct DropRequest {
    /// The drag payload exactly as the palette set it
    pub payload: String,
    #[serde(flatten)]
    pub target: DropTarget,
}

/// Handle POST /api/drop - create a component from a drag payload.
pub async fn drop(
    State(state): State<Arc<AppState>>,
    Json(req): Json<DropRequest>,
) -> ApiResult<Value> {
    let mut designer = state.designer.write().await;
    let id = match req.target {
        DropTarget::Canvas { x, y } => designer.drop_on_canvas(&req.payload, x, y),
        DropTarget::Cell { grid_id, cell } => designer.drop_on_cell(&req.payload, &grid_id, cell),
    }
    .map_err(error_response)?;
    Ok(Json(json!({ "id": id })))
}

/// Handle POST /api/components/:id/patch - edit properties.
pub async fn patch(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(patch): Json<ComponentPatch>,
) -> ApiResult<Component> {
    let mut designer = state.designer.write().await;
    designer.update(&id, &patch).map_err(error_response)?;
    designer
        .tree()
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| error_response(FolioError::NotFound(format!("component {id}"))))
}

/// Handle DELETE /api/components/:id.
pub async fn remove(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, (StatusCode, String)> {
    let mut designer = state.designer.write().await;
    match designer.delete(&id) {
        Some(_) => Ok(StatusCode::NO_CONTENT),
        None => Err(error_response(FolioError::NotFound(format!("component {id}")))),
    }
}

#[derive(Debug, Deserialize)]
pub struct SelectRequest {
    pub id: Option<String>,
}

/// Handle POST /api/select - change or clear the selection.
pub async fn select(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SelectRequest>,
) -> Result<StatusCode, (StatusCode, String)> {
    let mut designer = state.designer.write().await;
    designer.select(req.id.as_deref()).map_err(error_response)?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
pub struct MergeRequest {
    pub start: CellKey,
    pub end: CellKey,
}

/// Handle POST /api/grid/:id/merge.
pub async fn merge(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<MergeRequest>,
) -> ApiResult<MergeSpan> {
    let mut designer = state.designer.write().await;
    designer
        .merge_cells(&id, req.start, req.end)
        .map(Json)
        .map_err(error_response)
}

#[derive(Debug, Deserialize)]
pub struct SplitRequest {
    pub row: usize,
    pub col: usize,
}

/// Handle POST /api/grid/:id/split.
pub async fn split(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<SplitRequest>,
) -> ApiResult<Value> {
    let mut designer = state.designer.write().await;
    let removed = designer
        .split_cell(&id, req.row, req.col)
        .map_err(error_response)?;
    Ok(Json(json!({ "removed": removed })))
}

#[derive(Debug, Deserialize)]
pub struct ResizeGridRequest {
    pub rows: Option<usize>,
    pub columns: Option<usize>,
}

/// Handle POST /api/grid/:id/size - change row and column counts.
///
/// Responds with the ids of components dropped with removed cells.
pub async fn resize_grid(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<ResizeGridRequest>,
) -> ApiResult<Value> {
    let mut designer = state.designer.write().await;
    let mut removed = Vec::new();
    if let Some(rows) = req.rows {
        removed.extend(designer.set_grid_rows(&id, rows).map_err(error_response)?);
    }
    if let Some(columns) = req.columns {
        removed.extend(designer.set_grid_columns(&id, columns).map_err(error_response)?);
    }
    let ids: Vec<String> = removed.into_iter().map(|c| c.id).collect();
    Ok(Json(json!({ "removed": ids })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drop_request_targets() {
        let req: DropRequest = serde_json::from_value(json!({
            "payload": r#"{"id":"text","name":"Text","type":"text"}"#,
            "x": 10.0, "y": 20.0
        }))
        .unwrap();
        assert!(matches!(req.target, DropTarget::Canvas { x, .. } if x == 10.0));

        let req: DropRequest = serde_json::from_value(json!({
            "payload": "{}", "grid_id": "g1", "cell": "1-2"
        }))
        .unwrap();
        assert!(matches!(req.target, DropTarget::Cell { cell, .. } if cell == CellKey::new(1, 2)));
    }
}
