//! Partial property updates.

use serde::{Deserialize, Serialize};

use super::{Component, ComponentKind, FontWeight, RecordScope, TextAlign};
use crate::host::FieldMeta;

/// A set of property changes applied to one component.
///
/// Absent fields are left alone. Kind-specific fields are ignored when the
/// target component is of another kind.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComponentPatch {
    pub name: Option<String>,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,

    pub font_size: Option<f64>,
    pub color: Option<String>,
    pub font_weight: Option<FontWeight>,
    pub text_align: Option<TextAlign>,
    pub line_height: Option<f64>,

    /// text
    pub content: Option<String>,
    /// image
    pub url: Option<String>,

    // table
    pub table_id: Option<String>,
    pub fields: Option<Vec<FieldMeta>>,
    pub selected_fields: Option<Vec<String>>,
    pub header_background: Option<String>,
    pub header_font_weight: Option<FontWeight>,
    pub scope: Option<RecordScope>,
    pub show_row_number: Option<bool>,
}

impl ComponentPatch {
    pub fn content(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Default::default()
        }
    }

    /// Whether applying this patch can change a text box's required height.
    pub fn affects_text_height(&self) -> bool {
        self.content.is_some()
            || self.font_size.is_some()
            || self.line_height.is_some()
            || self.width.is_some()
    }

    pub fn apply(&self, c: &mut Component) {
        if let Some(v) = &self.name {
            c.name = v.clone();
        }
        if let Some(v) = self.x {
            c.x = v;
        }
        if let Some(v) = self.y {
            c.y = v;
        }
        if let Some(v) = self.width {
            c.width = v;
        }
        if let Some(v) = self.height {
            c.height = v;
        }

        if self.font_size.is_some() {
            c.style.font_size = self.font_size;
        }
        if let Some(v) = &self.color {
            c.style.color = Some(v.clone());
        }
        if self.font_weight.is_some() {
            c.style.font_weight = self.font_weight;
        }
        if self.text_align.is_some() {
            c.style.text_align = self.text_align;
        }
        if self.line_height.is_some() {
            c.style.line_height = self.line_height;
        }

        match &mut c.kind {
            ComponentKind::Text(t) => {
                if let Some(v) = &self.content {
                    t.content = v.clone();
                }
            }
            ComponentKind::Image(img) => {
                if let Some(v) = &self.url {
                    img.url = Some(v.clone()).filter(|u| !u.is_empty());
                }
            }
            ComponentKind::Table(t) => {
                if let Some(v) = &self.table_id {
                    t.table_id = Some(v.clone()).filter(|id| !id.is_empty());
                }
                if let Some(v) = &self.fields {
                    t.fields = v.clone();
                }
                if let Some(v) = &self.selected_fields {
                    t.selected_fields = v.clone();
                }
                if let Some(v) = &self.header_background {
                    t.header.background = Some(v.clone());
                }
                if self.header_font_weight.is_some() {
                    t.header.font_weight = self.header_font_weight;
                }
                if let Some(v) = self.scope {
                    t.scope = v;
                }
                if let Some(v) = self.show_row_number {
                    t.show_row_number = v;
                }
            }
            ComponentKind::Grid(_) | ComponentKind::Field(_) => {}
        }
    }
}
