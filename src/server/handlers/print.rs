//! Print handler.

use std::sync::Arc;

use axum::{Json, extract::State, response::Html};
use serde::Deserialize;

use crate::print::{PrintDocument, gather};
use crate::value::RecordView;

use super::super::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct PrintRequest {
    /// Records to print one page each, from the active table. When none
    /// match, one page is printed with the selected record, if any.
    #[serde(default)]
    pub record_ids: Vec<String>,
}

/// Handle POST /api/print - compile the canvas to HTML.
pub async fn print(
    State(state): State<Arc<AppState>>,
    Json(req): Json<PrintRequest>,
) -> Html<String> {
    let doc = render(&state, &req).await;
    Html(doc.to_html())
}

async fn render(state: &AppState, req: &PrintRequest) -> PrintDocument {
    let designer = state.designer.read().await;
    let data = gather(designer.tree(), state.host.as_ref(), &state.print).await;

    let browser = designer.browser();
    let mut views: Vec<RecordView<'_>> = req
        .record_ids
        .iter()
        .filter_map(|id| browser.records.iter().find(|r| &r.id == id))
        .map(|r| RecordView::new(&browser.fields, Some(r)))
        .collect();
    if views.is_empty() {
        views.push(designer.record_view());
    }

    crate::print::compile(designer.tree(), &data, &views, designer.config(), &state.print)
}
