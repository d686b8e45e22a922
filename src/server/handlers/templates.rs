//! Template handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

use crate::store::Template;

use super::super::state::AppState;
use super::error_response;

/// A template without its components.
#[derive(Debug, Serialize)]
pub struct TemplateSummary {
    pub id: String,
    pub name: String,
    pub table_id: String,
    pub created_at: i64,
    pub components: usize,
}

impl From<&Template> for TemplateSummary {
    fn from(t: &Template) -> Self {
        Self {
            id: t.id.clone(),
            name: t.name.clone(),
            table_id: t.table_id.clone(),
            created_at: t.created_at,
            components: t.components.len(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// List every template instead of those of the active table
    #[serde(default)]
    pub all: bool,
}

/// Handle GET /api/templates.
pub async fn list(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> Json<Vec<TemplateSummary>> {
    let designer = state.designer.read().await;
    let templates: Vec<TemplateSummary> = if query.all {
        designer.templates().iter().map(TemplateSummary::from).collect()
    } else {
        designer
            .templates_for_active_table()
            .into_iter()
            .map(TemplateSummary::from)
            .collect()
    };
    Json(templates)
}

#[derive(Debug, Deserialize)]
pub struct SaveRequest {
    pub name: String,
}

/// Handle POST /api/templates - save the canvas under the active table.
pub async fn save(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SaveRequest>,
) -> Result<(StatusCode, Json<TemplateSummary>), (StatusCode, String)> {
    let mut designer = state.designer.write().await;
    let template = designer.save_template(&req.name).map_err(error_response)?;
    Ok((StatusCode::CREATED, Json(TemplateSummary::from(template))))
}

/// Handle POST /api/templates/:id/load.
pub async fn load(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, (StatusCode, String)> {
    let mut designer = state.designer.write().await;
    designer.load_template(&id).map_err(error_response)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Handle DELETE /api/templates/:id.
pub async fn remove(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, (StatusCode, String)> {
    let mut designer = state.designer.write().await;
    designer.delete_template(&id).map_err(error_response)?;
    Ok(StatusCode::NO_CONTENT)
}
