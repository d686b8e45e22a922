//! # Folio - Print Layout Designer
//!
//! Folio is the core of a drag-and-drop print layout designer for data held
//! in a table platform (a "base"). It provides:
//!
//! - **Canvas model**: placed components, including grids whose cells nest
//!   other components
//! - **Interaction**: drag, resize, alignment guides and grid snapping
//! - **Grid cells**: merge, split and track resizing
//! - **Data binding**: field values of a selected record, data tables of
//!   whole views
//! - **Printing**: measured, paged HTML output
//!
//! ## Quick Start
//!
//! ```
//! use std::sync::Arc;
//!
//! use folio::{
//!     config::CanvasConfig,
//!     designer::Designer,
//!     document::ComponentPatch,
//!     store::MemoryStore,
//! };
//!
//! let mut designer = Designer::new(CanvasConfig::DEFAULT, Arc::new(MemoryStore::new()));
//!
//! // Drop a text component from the palette
//! let id = designer.drop_on_canvas(r#"{"id":"text","name":"Text","type":"text"}"#, 100.0, 100.0)?;
//!
//! // Edit it
//! designer.update(&id, &ComponentPatch::content("Hello"))?;
//! assert_eq!(designer.display_value(&id).unwrap().label(), "Hello");
//!
//! // Delete it with the keyboard
//! designer.select(Some(&id))?;
//! assert!(designer.key_down("Delete"));
//! assert!(designer.tree().is_empty());
//!
//! # Ok::<(), folio::error::FolioError>(())
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`designer`] | The editing session and its gestures |
//! | [`document`] | Components and the component tree |
//! | [`geometry`] | Alignment guides and snapping |
//! | [`grid`] | Grid cells, merges and track sizes |
//! | [`value`] | Field value formatting and display values |
//! | [`print`] | Print compilation and HTML output |
//! | [`host`] | The table platform's data API |
//! | [`store`] | Template persistence |
//! | [`currency`] | Currency field conversion |
//! | [`server`] | HTTP API |
//! | [`config`] | Canvas and print configuration |
//! | [`error`] | Error types |

pub mod config;
pub mod currency;
pub mod designer;
pub mod document;
pub mod error;
pub mod geometry;
pub mod grid;
pub mod host;
pub mod print;
pub mod server;
pub mod store;
pub mod value;

// Re-exports for convenience
pub use config::{CanvasConfig, PrintConfig};
pub use error::FolioError;
