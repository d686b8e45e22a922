//! Component display values and text auto-fit.

use crate::document::{Component, ComponentKind};
use crate::host::{FieldMeta, Record};

use super::format_field_value;

/// Placeholder for a text component with no content.
pub const EMPTY_TEXT_LABEL: &str = "Set text content";

/// Placeholder for a data table without a bound table.
pub const UNBOUND_TABLE_LABEL: &str = "Select a data table";

/// Default font size used for text measurement and print boxes.
pub const DEFAULT_FONT_SIZE: f64 = 18.0;

/// Default line height multiplier for text components.
pub const DEFAULT_LINE_HEIGHT: f64 = 1.5;

/// What a component shows on the canvas.
///
/// Data tables and grids render structurally, so they resolve to markers
/// rather than text. Inside grid cells the markers collapse to a label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayValue {
    Text(String),
    TableMarker,
    GridMarker,
}

impl DisplayValue {
    /// Human-readable form used inside grid cells and print boxes.
    pub fn label(&self) -> &str {
        match self {
            DisplayValue::Text(s) => s,
            DisplayValue::TableMarker => "Data table",
            DisplayValue::GridMarker => "Grid",
        }
    }

    pub fn into_label(self) -> String {
        match self {
            DisplayValue::Text(s) => s,
            marker => marker.label().to_string(),
        }
    }
}

/// The active table's field list and the record chosen in the record
/// browser, if any.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecordView<'a> {
    pub fields: &'a [FieldMeta],
    pub record: Option<&'a Record>,
}

impl<'a> RecordView<'a> {
    pub fn new(fields: &'a [FieldMeta], record: Option<&'a Record>) -> Self {
        Self { fields, record }
    }
}

/// Resolve the display value of a component.
///
/// Field components show the selected record's value, or their own name
/// when no record is selected or the field is not part of the active table.
pub fn component_display(component: &Component, view: RecordView<'_>) -> DisplayValue {
    match &component.kind {
        ComponentKind::Text(t) if t.content.is_empty() => {
            DisplayValue::Text(EMPTY_TEXT_LABEL.to_string())
        }
        ComponentKind::Text(t) => DisplayValue::Text(t.content.clone()),
        ComponentKind::Table(t) if t.fields.is_empty() => {
            DisplayValue::Text(UNBOUND_TABLE_LABEL.to_string())
        }
        ComponentKind::Table(_) => DisplayValue::TableMarker,
        ComponentKind::Grid(_) => DisplayValue::GridMarker,
        ComponentKind::Image(img) => DisplayValue::Text(
            img.url
                .clone()
                .filter(|u| !u.is_empty())
                .unwrap_or_else(|| component.name.clone()),
        ),
        ComponentKind::Field(field) => {
            let Some(record) = view.record else {
                return DisplayValue::Text(component.name.clone());
            };
            let Some(meta) = view.fields.iter().find(|f| f.id == field.field_id) else {
                return DisplayValue::Text(component.name.clone());
            };
            let raw = record
                .fields
                .get(&meta.id)
                .unwrap_or(&serde_json::Value::Null);
            DisplayValue::Text(format_field_value(raw, Some(meta.field_type)))
        }
    }
}

/// Height a text box needs to show `text` at the given size without
/// clipping.
///
/// Width is estimated at 0.6 × font size per character with 10 px padding
/// on each side; the result is never below 30 px.
pub fn auto_fit_height(text: &str, font_size: f64, width: f64, line_height: f64) -> f64 {
    let text_width = text.chars().count() as f64 * font_size * 0.6;
    let usable = (width - 20.0).max(1.0);
    let lines = (text_width / usable).ceil();
    (lines * font_size * line_height + 20.0).max(30.0)
}
