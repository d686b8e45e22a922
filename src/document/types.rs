//! Component payload types.
//!
//! All types derive `Serialize + Deserialize`; the same structs are used by
//! the Rust API, the HTTP API and persisted templates.
//!
//! Each payload implements [`ComponentMeta`] to declare its palette label and
//! the starter value used when it is dropped on the canvas.

use serde::{Deserialize, Serialize};

use crate::grid::GridLayout;
use crate::host::FieldMeta;

/// Metadata that every component payload must provide.
pub trait ComponentMeta: Sized {
    /// Palette label (e.g. "Text", "Data table").
    fn label() -> &'static str;

    /// Starter value for a freshly dropped component.
    ///
    /// Distinct from `Default`: editor defaults carry example content so a
    /// new component is visible on the canvas.
    fn editor_default() -> Self;

    /// Initial width and height in canvas pixels.
    fn default_size() -> (f64, f64) {
        (100.0, 45.0)
    }

    /// Whether a new component spans the full canvas width.
    fn full_width() -> bool {
        false
    }
}

// ============================================================================
// STYLE
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontWeight {
    #[default]
    Normal,
    Bold,
}

impl FontWeight {
    pub fn as_css(self) -> &'static str {
        match self {
            FontWeight::Normal => "normal",
            FontWeight::Bold => "bold",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

impl TextAlign {
    pub fn as_css(self) -> &'static str {
        match self {
            TextAlign::Left => "left",
            TextAlign::Center => "center",
            TextAlign::Right => "right",
        }
    }
}

/// Style shared by every component kind.
///
/// All fields are optional; each kind applies its own defaults when it is
/// rendered (text boxes 18 px left-aligned, grids 14 px centred).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Style {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<FontWeight>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_align: Option<TextAlign>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_height: Option<f64>,
}

impl Style {
    pub fn font_size_or(&self, default: f64) -> f64 {
        self.font_size.unwrap_or(default)
    }

    pub fn line_height_or(&self, default: f64) -> f64 {
        self.line_height.unwrap_or(default)
    }

    pub fn color_or<'a>(&'a self, default: &'a str) -> &'a str {
        self.color.as_deref().unwrap_or(default)
    }
}

// ============================================================================
// TEXT / IMAGE
// ============================================================================

/// Free text typed by the user.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TextBlock {
    #[serde(default)]
    pub content: String,
}

impl TextBlock {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }
}

impl ComponentMeta for TextBlock {
    fn label() -> &'static str {
        "Text"
    }
    fn editor_default() -> Self {
        Self::new("Double-click to edit")
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ImageBlock {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl ComponentMeta for ImageBlock {
    fn label() -> &'static str {
        "Image"
    }
    fn editor_default() -> Self {
        Self::default()
    }
}

// ============================================================================
// DATA TABLE
// ============================================================================

/// Which records a data table prints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordScope {
    /// Every record in the table
    All,
    /// Only records visible in the host's active view
    #[default]
    CurrentView,
}

/// Header row styling of a data table.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct HeaderStyle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<FontWeight>,
}

fn default_true() -> bool {
    true
}

/// A table of host records, one row per record.
///
/// `fields` holds every field of the bound table; `selected_fields` is the
/// ordered subset to print. An empty selection prints all fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataTable {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_id: Option<String>,
    #[serde(default)]
    pub fields: Vec<FieldMeta>,
    #[serde(default)]
    pub selected_fields: Vec<String>,
    #[serde(default)]
    pub header: HeaderStyle,
    #[serde(default)]
    pub scope: RecordScope,
    #[serde(default = "default_true")]
    pub show_row_number: bool,
}

impl Default for DataTable {
    fn default() -> Self {
        Self {
            table_id: None,
            fields: Vec::new(),
            selected_fields: Vec::new(),
            header: HeaderStyle::default(),
            scope: RecordScope::CurrentView,
            show_row_number: true,
        }
    }
}

impl DataTable {
    /// Fields to print, in order.
    ///
    /// Selected ids that no longer exist in `fields` are skipped.
    pub fn fields_to_show(&self) -> Vec<&FieldMeta> {
        if self.selected_fields.is_empty() {
            return self.fields.iter().collect();
        }
        self.selected_fields
            .iter()
            .filter_map(|id| self.fields.iter().find(|f| &f.id == id))
            .collect()
    }

    /// Add the field to the selection, or remove it if already selected.
    pub fn toggle_field(&mut self, field_id: &str) {
        if let Some(pos) = self.selected_fields.iter().position(|f| f == field_id) {
            self.selected_fields.remove(pos);
        } else {
            self.selected_fields.push(field_id.to_string());
        }
    }

    pub fn select_all_fields(&mut self) {
        self.selected_fields = self.fields.iter().map(|f| f.id.clone()).collect();
    }
}

impl ComponentMeta for DataTable {
    fn label() -> &'static str {
        "Data table"
    }
    fn editor_default() -> Self {
        Self::default()
    }
    fn full_width() -> bool {
        true
    }
}

// ============================================================================
// GRID / FIELD
// ============================================================================

impl ComponentMeta for GridLayout {
    fn label() -> &'static str {
        "Grid"
    }
    fn editor_default() -> Self {
        GridLayout::default()
    }
    fn default_size() -> (f64, f64) {
        (180.0, 90.0)
    }
}

/// A component bound to one field of the active table.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FieldBlock {
    pub field_id: String,
    /// Host field type code
    #[serde(default)]
    pub field_type: i64,
}

impl FieldBlock {
    pub fn new(field_id: impl Into<String>, field_type: i64) -> Self {
        Self {
            field_id: field_id.into(),
            field_type,
        }
    }
}

impl ComponentMeta for FieldBlock {
    fn label() -> &'static str {
        "Field"
    }
    fn editor_default() -> Self {
        Self::default()
    }
}
