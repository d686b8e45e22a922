//! Host data handlers: tables, the record browser, data table binding and
//! currency conversion.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

use crate::currency::{ConversionReport, convert_currency_field};
use crate::designer::PageItem;
use crate::host::{FieldMeta, Record, TableMeta};

use super::super::state::AppState;
use super::error_response;

/// Handle GET /api/tables - refresh and list the host's tables.
pub async fn tables(State(state): State<Arc<AppState>>) -> Json<Vec<TableMeta>> {
    let mut designer = state.designer.write().await;
    designer.load_tables(state.host.as_ref()).await;
    Json(designer.browser().tables.clone())
}

/// Handle POST /api/tables/:id/open - make a table active and load its
/// records into the browser.
pub async fn open_table(
    State(state): State<Arc<AppState>>,
    Path(table_id): Path<String>,
) -> StatusCode {
    let mut designer = state.designer.write().await;
    designer.open_table(state.host.as_ref(), &table_id).await;
    StatusCode::NO_CONTENT
}

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct RecordPage {
    pub fields: Vec<FieldMeta>,
    pub records: Vec<Record>,
    pub page: usize,
    pub pages: Vec<PageItem>,
    pub selected: Option<String>,
}

/// Handle GET /api/records - one page of the record browser.
pub async fn records(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PageQuery>,
) -> Json<RecordPage> {
    let mut designer = state.designer.write().await;
    let browser = designer.browser_mut();
    if let Some(page) = query.page {
        browser.set_page(page);
    }
    Json(RecordPage {
        fields: browser.fields.clone(),
        records: browser.page_records().to_vec(),
        page: browser.page(),
        pages: browser.page_numbers(),
        selected: browser.selected().map(|r| r.id.clone()),
    })
}

#[derive(Debug, Deserialize)]
pub struct SelectRecordRequest {
    pub record_id: Option<String>,
}

/// Handle POST /api/records/select - choose the record field components show.
pub async fn select_record(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SelectRecordRequest>,
) -> Json<Option<Record>> {
    let mut designer = state.designer.write().await;
    Json(designer.select_record(req.record_id.as_deref()).cloned())
}

#[derive(Debug, Deserialize)]
pub struct BindRequest {
    /// Host table to bind; empty unbinds
    pub table_id: String,
}

/// Handle POST /api/components/:id/bind - bind a data table to a host table.
pub async fn bind(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<BindRequest>,
) -> Result<StatusCode, (StatusCode, String)> {
    let mut designer = state.designer.write().await;
    designer
        .bind_table(state.host.as_ref(), &id, &req.table_id)
        .await
        .map_err(error_response)?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum FieldsRequest {
    Toggle { field_id: String },
    SelectAll,
    Clear,
}

/// Handle POST /api/components/:id/fields - edit a data table's field
/// selection.
pub async fn fields(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<FieldsRequest>,
) -> Result<StatusCode, (StatusCode, String)> {
    let mut designer = state.designer.write().await;
    match req {
        FieldsRequest::Toggle { field_id } => designer.toggle_table_field(&id, &field_id),
        FieldsRequest::SelectAll => designer.select_all_table_fields(&id),
        FieldsRequest::Clear => designer.clear_table_fields(&id),
    }
    .map_err(error_response)?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
pub struct ConvertRequest {
    pub table_id: String,
    pub field_id: String,
    pub target: String,
}

/// Handle POST /api/currency/convert.
pub async fn convert_currency(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ConvertRequest>,
) -> Result<Json<ConversionReport>, (StatusCode, String)> {
    convert_currency_field(
        state.host.as_ref(),
        state.rates.as_ref(),
        &req.table_id,
        &req.field_id,
        &req.target,
    )
    .await
    .map(Json)
    .map_err(error_response)
}
