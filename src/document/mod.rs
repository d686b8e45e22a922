//! # Component Model
//!
//! The canvas content: positioned, styled components of a closed set of
//! kinds, stored in a flat arena ([`ComponentTree`]).
//!
//! A component serializes as one flat JSON object; the `type` tag selects
//! the kind and the kind's own fields sit next to the shared ones:
//!
//! ```
//! use folio::document::{Component, ComponentKind};
//!
//! let json = r#"{"id":"t1","name":"Text","type":"text","x":10,"y":20,
//!               "width":100,"height":45,"content":"Hello","font_size":20}"#;
//! let c: Component = serde_json::from_str(json).unwrap();
//! assert!(matches!(c.kind, ComponentKind::Text(ref t) if t.content == "Hello"));
//! assert_eq!(c.style.font_size, Some(20.0));
//! ```
//!
//! ## Kinds
//!
//! | Tag | Payload | Default size |
//! |-----|---------|--------------|
//! | `text` | [`TextBlock`] | 100 × 45 |
//! | `image` | [`ImageBlock`] | 100 × 45 |
//! | `table` | [`DataTable`] | canvas width × 45 |
//! | `grid` | [`GridLayout`] | 180 × 90 |
//! | `field` | [`FieldBlock`] | 100 × 45 |

pub mod types;

mod patch;
mod tree;

pub use patch::ComponentPatch;
pub use tree::{CellRef, ComponentTree};
pub use types::*;

use serde::{Deserialize, Serialize};

use crate::config::CanvasConfig;
use crate::error::FolioError;
use crate::geometry::Rect;
use crate::grid::GridLayout;

// ============================================================================
// COMPONENT KIND ENUM (generated)
// ============================================================================

/// Generates the `ComponentKind` enum and its per-kind dispatch from a single
/// list, so adding a kind is one line here plus a [`ComponentMeta`] impl.
macro_rules! define_components {
    ($($variant:ident($inner:ty) = $tag:literal),+ $(,)?) => {
        /// The kind of a component and its kind-specific data.
        ///
        /// `#[serde(tag = "type")]` gives JSON like
        /// `{"type": "text", "content": "Hello"}`.
        #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
        #[serde(tag = "type", rename_all = "snake_case")]
        pub enum ComponentKind {
            $($variant($inner),)+
        }

        impl ComponentKind {
            /// The serde tag of this kind.
            pub fn type_name(&self) -> &'static str {
                match self { $(ComponentKind::$variant(_) => $tag,)+ }
            }

            /// Palette label (from [`ComponentMeta::label`]).
            pub fn label(&self) -> &'static str {
                match self { $(ComponentKind::$variant(_) => <$inner>::label(),)+ }
            }

            /// Initial size (from [`ComponentMeta::default_size`]).
            pub fn default_size(&self) -> (f64, f64) {
                match self { $(ComponentKind::$variant(_) => <$inner>::default_size(),)+ }
            }

            /// Whether a new component of this kind spans the canvas width.
            pub fn full_width(&self) -> bool {
                match self { $(ComponentKind::$variant(_) => <$inner>::full_width(),)+ }
            }

            /// Editor default for the kind with the given tag.
            pub fn editor_default(type_name: &str) -> Option<Self> {
                match type_name {
                    $($tag => Some(ComponentKind::$variant(<$inner>::editor_default())),)+
                    _ => None,
                }
            }

            /// Editor defaults for every kind, in palette order.
            pub fn all_editor_defaults() -> Vec<Self> {
                vec![$(ComponentKind::$variant(<$inner>::editor_default()),)+]
            }
        }
    };
}

define_components! {
    Text(TextBlock) = "text",
    Image(ImageBlock) = "image",
    Table(DataTable) = "table",
    Grid(GridLayout) = "grid",
    Field(FieldBlock) = "field",
}

// ============================================================================
// COMPONENT
// ============================================================================

/// A placed component.
///
/// Coordinates are canvas pixels. Nested components (inside grid cells)
/// keep the rectangle they were created with; only their style and
/// payload matter when they render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default)]
    pub width: f64,
    #[serde(default)]
    pub height: f64,
    #[serde(flatten)]
    pub style: Style,
    #[serde(flatten)]
    pub kind: ComponentKind,
}

impl Component {
    /// A component of the given kind at the origin with the kind's default
    /// size.
    pub fn new(id: impl Into<String>, name: impl Into<String>, kind: ComponentKind) -> Self {
        let (width, height) = kind.default_size();
        Self {
            id: id.into(),
            name: name.into(),
            x: 0.0,
            y: 0.0,
            width,
            height,
            style: Style::default(),
            kind,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    pub fn set_rect(&mut self, rect: Rect) {
        self.x = rect.x;
        self.y = rect.y;
        self.width = rect.width;
        self.height = rect.height;
    }

    pub fn as_grid(&self) -> Option<&GridLayout> {
        match &self.kind {
            ComponentKind::Grid(g) => Some(g),
            _ => None,
        }
    }

    pub fn as_grid_mut(&mut self) -> Option<&mut GridLayout> {
        match &mut self.kind {
            ComponentKind::Grid(g) => Some(g),
            _ => None,
        }
    }

    pub fn as_table(&self) -> Option<&DataTable> {
        match &self.kind {
            ComponentKind::Table(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_table_mut(&mut self) -> Option<&mut DataTable> {
        match &mut self.kind {
            ComponentKind::Table(t) => Some(t),
            _ => None,
        }
    }

    /// Whether the component's height follows its text content.
    pub fn auto_fits(&self) -> bool {
        matches!(self.kind, ComponentKind::Text(_) | ComponentKind::Field(_))
    }
}

// ============================================================================
// DRAG PAYLOAD
// ============================================================================

/// The `type` of a drag payload: a palette kind name, or a host field type
/// code when a field is dragged from the field list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PayloadType {
    FieldType(i64),
    Named(String),
}

/// JSON carried from the palette to the canvas by a drag gesture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DragPayload {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: PayloadType,
}

impl DragPayload {
    pub fn parse(data: &str) -> Result<Self, FolioError> {
        serde_json::from_str(data).map_err(|e| FolioError::Payload(e.to_string()))
    }

    /// Build the component this payload creates, with id `id`.
    ///
    /// The component is placed at the origin; callers position it.
    pub fn to_component(&self, id: impl Into<String>) -> Result<Component, FolioError> {
        let kind = match &self.kind {
            PayloadType::FieldType(code) => {
                ComponentKind::Field(FieldBlock::new(self.id.clone(), *code))
            }
            PayloadType::Named(name) => ComponentKind::editor_default(name)
                .ok_or_else(|| FolioError::Payload(format!("unknown component type '{name}'")))?,
        };
        Ok(Component::new(id, self.name.clone(), kind))
    }
}

/// Create a component from a drag payload dropped at canvas point
/// `(drop_x, drop_y)`.
///
/// The component's top-left sits at the drop point minus the configured
/// offset, clamped inside the canvas. Full-width kinds are pinned to
/// `x = 0` and take the canvas width.
pub fn default_component(
    payload: &DragPayload,
    id: impl Into<String>,
    drop_x: f64,
    drop_y: f64,
    canvas: &CanvasConfig,
) -> Result<Component, FolioError> {
    let mut component = payload.to_component(id)?;
    if component.kind.full_width() {
        component.x = 0.0;
        component.width = canvas.width;
    } else {
        component.x = drop_x - canvas.drop_offset_x;
    }
    component.y = drop_y - canvas.drop_offset_y;
    component.set_rect(component.rect().clamp_position(canvas));
    Ok(component)
}

/// Palette entry for the frontend.
#[derive(Debug, Clone, Serialize)]
pub struct ComponentTypeMeta {
    #[serde(rename = "type")]
    pub type_name: &'static str,
    pub label: &'static str,
}

/// Palette entries for every component kind.
pub fn component_types() -> Vec<ComponentTypeMeta> {
    ComponentKind::all_editor_defaults()
        .iter()
        .map(|k| ComponentTypeMeta {
            type_name: k.type_name(),
            label: k.label(),
        })
        .collect()
}
