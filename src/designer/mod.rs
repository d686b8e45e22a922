//! # Designer Session
//!
//! [`Designer`] owns everything a layout editing session changes: the
//! component tree, the selection, the gesture in progress, the alignment
//! guides of the current drag, the active host table, saved templates and
//! the record browser. Every change goes through a named method.
//!
//! ## Pointer flow
//!
//! ```text
//! begin_move / begin_resize / begin_track_drag
//!        │
//!        ▼
//! pointer_move ─► clamp ─► guides ─► snap ─► tree mutation   (repeats)
//!        │
//!        ▼
//! pointer_up ─► Idle, guides cleared
//! ```

mod browser;
mod gesture;

pub use browser::{BROWSER_FETCH_SIZE, PageItem, RECORDS_PER_PAGE, RecordBrowser, page_numbers};
pub use gesture::{Axis, Gesture};

use std::sync::Arc;

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::CanvasConfig;
use crate::document::{
    Component, ComponentKind, ComponentPatch, ComponentTree, DragPayload, default_component,
};
use crate::error::FolioError;
use crate::geometry::{
    AlignmentGuide, Point, Rect, detect_alignment_guides, snap_resize, snap_to_alignment,
};
use crate::grid::{CellKey, MergeSpan};
use crate::host::{self, FieldMeta, HostApi, Record};
use crate::store::{self, TEMPLATE_KEY, Template, TemplateStore};
use crate::value::{
    DEFAULT_FONT_SIZE, DEFAULT_LINE_HEIGHT, DisplayValue, RecordView, auto_fit_height,
    component_display,
};

/// The state of one layout editing session.
pub struct Designer {
    config: CanvasConfig,
    tree: ComponentTree,
    selected: Option<String>,
    gesture: Gesture,
    guides: Vec<AlignmentGuide>,
    active_table: Option<String>,
    templates: Vec<Template>,
    store: Arc<dyn TemplateStore>,
    browser: RecordBrowser,
}

impl Designer {
    /// Start a session, loading saved templates from `store`.
    pub fn new(config: CanvasConfig, store: Arc<dyn TemplateStore>) -> Self {
        let templates = store::load_or_empty(store.as_ref());
        Self {
            config,
            tree: ComponentTree::new(),
            selected: None,
            gesture: Gesture::Idle,
            guides: Vec::new(),
            active_table: None,
            templates,
            store,
            browser: RecordBrowser::default(),
        }
    }

    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    pub fn tree(&self) -> &ComponentTree {
        &self.tree
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn gesture(&self) -> &Gesture {
        &self.gesture
    }

    /// Guides of the drag in progress; empty when not dragging.
    pub fn guides(&self) -> &[AlignmentGuide] {
        &self.guides
    }

    pub fn active_table(&self) -> Option<&str> {
        self.active_table.as_deref()
    }

    pub fn browser(&self) -> &RecordBrowser {
        &self.browser
    }

    pub fn browser_mut(&mut self) -> &mut RecordBrowser {
        &mut self.browser
    }

    pub fn record_view(&self) -> RecordView<'_> {
        RecordView::new(&self.browser.fields, self.browser.selected())
    }

    // ========================================================================
    // DROP
    // ========================================================================

    /// Create a component from a palette drag payload dropped at canvas
    /// point `(x, y)`. Returns the new component's id.
    ///
    /// A malformed payload aborts the drop and is only logged.
    pub fn drop_on_canvas(&mut self, payload: &str, x: f64, y: f64) -> Result<String, FolioError> {
        let payload = parse_payload(payload)?;
        let id = new_component_id(&payload);
        let component = default_component(&payload, id.clone(), x, y, &self.config)?;
        debug!(id = %id, kind = component.kind.type_name(), x = component.x, y = component.y, "dropped on canvas");
        self.tree.add(component)?;
        self.auto_fit(&id);
        Ok(id)
    }

    /// Create a component from a drag payload dropped on a grid cell.
    ///
    /// Replaces the cell's first component if it has one. Text dropped into
    /// a cell starts out showing the palette item's name.
    pub fn drop_on_cell(
        &mut self,
        payload: &str,
        grid_id: &str,
        cell: CellKey,
    ) -> Result<String, FolioError> {
        let payload = parse_payload(payload)?;
        let id = new_component_id(&payload);
        let mut component = payload.to_component(id.clone())?;
        if let ComponentKind::Text(text) = &mut component.kind {
            text.content = payload.name.clone();
        }
        if let Some(replaced) = self.tree.add_to_cell(grid_id, cell, component)? {
            debug!(grid_id, cell = %cell, replaced = %replaced.id, "replaced cell content");
            self.forget_if_gone();
        }
        debug!(id = %id, grid_id, cell = %cell, "dropped on cell");
        Ok(id)
    }

    // ========================================================================
    // SELECTION & POINTER
    // ========================================================================

    /// Select a component, or clear the selection with `None`.
    pub fn select(&mut self, id: Option<&str>) -> Result<(), FolioError> {
        match id {
            Some(id) if !self.tree.contains(id) => {
                Err(FolioError::NotFound(format!("component {id}")))
            }
            _ => {
                self.selected = id.map(str::to_string);
                Ok(())
            }
        }
    }

    /// Pointer down on a top-level component: select it and start dragging.
    pub fn begin_move(&mut self, id: &str, pointer: Point) -> Result<(), FolioError> {
        let component = self.top_level(id)?;
        let offset = Point::new(pointer.x - component.x, pointer.y - component.y);
        self.selected = Some(id.to_string());
        self.gesture = Gesture::Moving {
            id: id.to_string(),
            offset,
        };
        Ok(())
    }

    /// Pointer down on a component's resize handle.
    pub fn begin_resize(&mut self, id: &str, pointer: Point) -> Result<(), FolioError> {
        let component = self.top_level(id)?;
        self.gesture = Gesture::Resizing {
            id: id.to_string(),
            start_pointer: pointer,
            start_width: component.width,
            start_height: component.height,
        };
        Ok(())
    }

    /// Pointer down on the boundary after row or column `index` of a grid.
    pub fn begin_track_drag(
        &mut self,
        grid_id: &str,
        axis: Axis,
        index: usize,
        pointer: Point,
    ) -> Result<(), FolioError> {
        let component = self
            .tree
            .get(grid_id)
            .ok_or_else(|| FolioError::NotFound(format!("component {grid_id}")))?;
        let grid = self.tree.grid(grid_id)?;
        let (start_tracks, extent) = match axis {
            Axis::Rows => (grid.aligned_row_heights(), component.height),
            Axis::Columns => (grid.aligned_column_widths(), component.width),
        };
        if index + 1 >= start_tracks.len() {
            return Err(FolioError::Validation(format!(
                "no boundary after track {index} of {grid_id}"
            )));
        }
        self.gesture = Gesture::Track {
            grid_id: grid_id.to_string(),
            axis,
            index,
            start_pointer: pointer,
            start_tracks,
            extent,
        };
        Ok(())
    }

    /// Pointer moved to canvas point `pointer` during a gesture.
    pub fn pointer_move(&mut self, pointer: Point) -> Result<(), FolioError> {
        match self.gesture.clone() {
            Gesture::Idle => Ok(()),
            Gesture::Moving { id, offset } => self.drag_to(&id, pointer, offset),
            Gesture::Resizing {
                id,
                start_pointer,
                start_width,
                start_height,
            } => {
                let (width, height) = snap_resize(
                    start_width + (pointer.x - start_pointer.x),
                    start_height + (pointer.y - start_pointer.y),
                    &self.config,
                );
                let current = self.top_level(&id)?.rect();
                let rect = Rect {
                    width,
                    height,
                    ..current
                }
                .clamp_size(&self.config);
                self.tree.resize_to(&id, rect.width, rect.height)
            }
            Gesture::Track {
                grid_id,
                axis,
                index,
                start_pointer,
                start_tracks,
                extent,
            } => {
                let grid = self.tree.grid_mut(&grid_id)?;
                match axis {
                    Axis::Rows => grid.drag_row_boundary_from(
                        &start_tracks,
                        index,
                        pointer.y - start_pointer.y,
                        extent,
                    ),
                    Axis::Columns => grid.drag_column_boundary_from(
                        &start_tracks,
                        index,
                        pointer.x - start_pointer.x,
                        extent,
                    ),
                };
                Ok(())
            }
        }
    }

    /// End the gesture in progress.
    pub fn pointer_up(&mut self) {
        if let Some(target) = self.gesture.target() {
            debug!(target, "gesture ended");
        }
        self.gesture = Gesture::Idle;
        self.guides.clear();
    }

    /// Handle a key press. Returns whether it changed anything.
    ///
    /// `Delete` removes the selected component.
    pub fn key_down(&mut self, key: &str) -> bool {
        match (key, self.selected.clone()) {
            ("Delete", Some(id)) => self.delete(&id).is_some(),
            _ => false,
        }
    }

    fn drag_to(&mut self, id: &str, pointer: Point, offset: Point) -> Result<(), FolioError> {
        let current = self.top_level(id)?.rect();
        let candidate = Rect {
            x: pointer.x - offset.x,
            y: pointer.y - offset.y,
            ..current
        }
        .clamp_position(&self.config);

        let siblings = self.tree.sibling_rects(id);
        self.guides = detect_alignment_guides(candidate, &siblings, self.config.guide_threshold);
        let snapped = snap_to_alignment(candidate, &self.guides, &self.config);
        let rect = Rect {
            x: snapped.x,
            y: snapped.y,
            ..candidate
        }
        .clamp_position(&self.config);

        self.tree.move_to(id, rect.x, rect.y)
    }

    // ========================================================================
    // EDIT
    // ========================================================================

    /// Apply a property patch to any component, top-level or nested.
    pub fn update(&mut self, id: &str, patch: &ComponentPatch) -> Result<(), FolioError> {
        self.tree.patch(id, patch)?;
        if self.tree.is_top_level(id) {
            let config = self.config;
            self.tree.update(id, |c| {
                let rect = c.rect().clamp_position(&config).clamp_size(&config);
                c.set_rect(rect);
            })?;
        }
        if patch.affects_text_height() {
            self.auto_fit(id);
        }
        Ok(())
    }

    /// Remove a component from wherever it lives.
    ///
    /// Clears the selection if the selected component is gone afterwards
    /// (the component itself or something nested in it).
    pub fn delete(&mut self, id: &str) -> Option<Component> {
        let removed = self.tree.remove(id)?;
        debug!(id, "deleted component");
        self.forget_if_gone();
        Some(removed)
    }

    /// Select or deselect a field of a data table.
    pub fn toggle_table_field(&mut self, table_id: &str, field_id: &str) -> Result<(), FolioError> {
        self.with_table(table_id, |t| t.toggle_field(field_id))
    }

    pub fn select_all_table_fields(&mut self, table_id: &str) -> Result<(), FolioError> {
        self.with_table(table_id, |t| t.select_all_fields())
    }

    pub fn clear_table_fields(&mut self, table_id: &str) -> Result<(), FolioError> {
        self.with_table(table_id, |t| t.selected_fields.clear())
    }

    /// Bind a data table component to a host table with the given fields.
    pub fn set_table_binding(
        &mut self,
        component_id: &str,
        table_id: Option<&str>,
        fields: Vec<FieldMeta>,
    ) -> Result<(), FolioError> {
        self.with_table(component_id, |t| {
            t.table_id = table_id.map(str::to_string);
            t.fields = fields;
        })
    }

    /// Fetch a host table's fields and bind a data table component to it.
    pub async fn bind_table(
        &mut self,
        host: &dyn HostApi,
        component_id: &str,
        table_id: &str,
    ) -> Result<(), FolioError> {
        let fields = if table_id.is_empty() {
            Vec::new()
        } else {
            host::fields_or_empty(host, table_id).await
        };
        let table_id = Some(table_id).filter(|t| !t.is_empty());
        self.set_table_binding(component_id, table_id, fields)
    }

    fn with_table(
        &mut self,
        id: &str,
        f: impl FnOnce(&mut crate::document::DataTable),
    ) -> Result<(), FolioError> {
        let mut result = Ok(());
        self.tree.update(id, |c| match c.as_table_mut() {
            Some(t) => f(t),
            None => result = Err(FolioError::Validation(format!("{id} is not a data table"))),
        })?;
        result
    }

    // ========================================================================
    // GRID
    // ========================================================================

    pub fn merge_cells(
        &mut self,
        grid_id: &str,
        start: CellKey,
        end: CellKey,
    ) -> Result<MergeSpan, FolioError> {
        let span = self.tree.grid_mut(grid_id)?.merge(start, end)?;
        debug!(grid_id, start = %start, end = %end, "merged cells");
        Ok(span)
    }

    /// Remove the merge anchored at `(row, col)`, if any.
    pub fn split_cell(
        &mut self,
        grid_id: &str,
        row: usize,
        col: usize,
    ) -> Result<Option<MergeSpan>, FolioError> {
        Ok(self.tree.grid_mut(grid_id)?.split(row, col))
    }

    /// Change a grid's row count. Returns the components removed with the
    /// cells that fell off.
    pub fn set_grid_rows(&mut self, grid_id: &str, rows: usize) -> Result<Vec<Component>, FolioError> {
        let removed = self.tree.set_grid_rows(grid_id, rows)?;
        self.forget_if_gone();
        Ok(removed)
    }

    pub fn set_grid_columns(
        &mut self,
        grid_id: &str,
        columns: usize,
    ) -> Result<Vec<Component>, FolioError> {
        let removed = self.tree.set_grid_columns(grid_id, columns)?;
        self.forget_if_gone();
        Ok(removed)
    }

    // ========================================================================
    // TEMPLATES
    // ========================================================================

    pub fn templates(&self) -> &[Template] {
        &self.templates
    }

    /// Templates saved against the active table.
    pub fn templates_for_active_table(&self) -> Vec<&Template> {
        self.templates
            .iter()
            .filter(|t| Some(t.table_id.as_str()) == self.active_table.as_deref())
            .collect()
    }

    /// Save the canvas as a new template bound to the active table.
    pub fn save_template(&mut self, name: &str) -> Result<&Template, FolioError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(FolioError::Validation("template name is required".to_string()));
        }
        let Some(table_id) = self.active_table.clone() else {
            return Err(FolioError::Validation("select a data table first".to_string()));
        };

        let template = Template::new(name, table_id, &self.tree);
        info!(id = %template.id, name, components = self.tree.len(), "saved template");
        self.templates.push(template);
        self.persist_templates();
        self.templates
            .last()
            .ok_or_else(|| FolioError::Store("template list is empty".to_string()))
    }

    /// Replace the canvas and active table with a template's.
    pub fn load_template(&mut self, id: &str) -> Result<(), FolioError> {
        let template = self
            .templates
            .iter()
            .find(|t| t.id == id)
            .ok_or_else(|| FolioError::NotFound(format!("template {id}")))?;
        self.tree = template.components.clone();
        self.active_table = Some(template.table_id.clone());
        info!(id, name = %template.name, table_id = %template.table_id, "loaded template");
        self.selected = None;
        self.gesture = Gesture::Idle;
        self.guides.clear();
        Ok(())
    }

    pub fn delete_template(&mut self, id: &str) -> Result<Template, FolioError> {
        let pos = self
            .templates
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| FolioError::NotFound(format!("template {id}")))?;
        let removed = self.templates.remove(pos);
        info!(id, "deleted template");
        self.persist_templates();
        Ok(removed)
    }

    fn persist_templates(&self) {
        if let Err(e) = self.store.save(TEMPLATE_KEY, &self.templates) {
            warn!(error = %e, "failed to persist templates");
        }
    }

    // ========================================================================
    // RECORDS
    // ========================================================================

    pub fn set_active_table(&mut self, table_id: Option<&str>) {
        self.active_table = table_id.map(str::to_string);
    }

    /// Replace the record browser contents.
    pub fn set_records(&mut self, fields: Vec<FieldMeta>, records: Vec<Record>) {
        self.browser.set_records(fields, records);
        self.auto_fit_all();
    }

    /// Choose the record field components display.
    pub fn select_record(&mut self, record_id: Option<&str>) -> Option<&Record> {
        self.browser.select(record_id);
        self.auto_fit_all();
        self.browser.selected()
    }

    /// Refresh the table list from the host.
    pub async fn load_tables(&mut self, host: &dyn HostApi) {
        self.browser.tables = host::tables_or_empty(host).await;
    }

    /// Make `table_id` the active table and load its fields and first
    /// records into the browser.
    pub async fn open_table(&mut self, host: &dyn HostApi, table_id: &str) {
        let fields = host::fields_or_empty(host, table_id).await;
        let records = host::records_or_empty(host, table_id, BROWSER_FETCH_SIZE).await;
        self.active_table = Some(table_id.to_string());
        self.set_records(fields, records);
    }

    /// Display value of a component given the selected record.
    pub fn display_value(&self, id: &str) -> Option<DisplayValue> {
        let component = self.tree.get(id)?;
        Some(component_display(component, self.record_view()))
    }

    // ========================================================================
    // INTERNAL
    // ========================================================================

    fn top_level(&self, id: &str) -> Result<&Component, FolioError> {
        let component = self
            .tree
            .get(id)
            .ok_or_else(|| FolioError::NotFound(format!("component {id}")))?;
        if !self.tree.is_top_level(id) {
            return Err(FolioError::Validation(format!(
                "{id} is inside a grid cell and moves with its grid"
            )));
        }
        Ok(component)
    }

    /// Drop selection and gesture state that refers to removed components.
    fn forget_if_gone(&mut self) {
        if self.selected.as_deref().is_some_and(|id| !self.tree.contains(id)) {
            self.selected = None;
        }
        if self.gesture.target().is_some_and(|id| !self.tree.contains(id)) {
            self.gesture = Gesture::Idle;
            self.guides.clear();
        }
    }

    /// Recompute the height of a text or field component from its content.
    fn auto_fit(&mut self, id: &str) {
        let Some(component) = self.tree.get(id).filter(|c| c.auto_fits()) else {
            return;
        };
        let text = component_display(component, self.record_view()).into_label();
        let height = auto_fit_height(
            &text,
            component.style.font_size_or(DEFAULT_FONT_SIZE),
            component.width,
            component.style.line_height_or(DEFAULT_LINE_HEIGHT),
        );
        let top_level = self.tree.is_top_level(id);
        let config = self.config;
        if let Err(e) = self.tree.update(id, |c| {
            c.height = height;
            if top_level {
                c.set_rect(c.rect().clamp_size(&config));
            }
        }) {
            warn!(id, error = %e, "auto-fit skipped");
        }
    }

    fn auto_fit_all(&mut self) {
        let ids: Vec<String> = self.tree.top_level_ids().to_vec();
        for id in ids {
            self.auto_fit(&id);
        }
    }
}

fn parse_payload(data: &str) -> Result<DragPayload, FolioError> {
    DragPayload::parse(data).inspect_err(|e| warn!(error = %e, "ignoring drop with malformed payload"))
}

fn new_component_id(payload: &DragPayload) -> String {
    format!("{}_{}", payload.id, Uuid::new_v4().simple())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    const TEXT: &str = r#"{"id":"text","name":"Text","type":"text"}"#;
    const GRID: &str = r#"{"id":"grid","name":"Grid","type":"grid"}"#;

    fn designer() -> Designer {
        Designer::new(CanvasConfig::DEFAULT, Arc::new(MemoryStore::new()))
    }

    #[test]
    fn test_drop_malformed_payload_aborts() {
        let mut d = designer();
        assert!(matches!(
            d.drop_on_canvas("{nope", 10.0, 10.0),
            Err(FolioError::Payload(_))
        ));
        assert!(d.tree().is_empty());
    }

    #[test]
    fn test_drop_autofits_text() {
        let mut d = designer();
        let id = d.drop_on_canvas(TEXT, 100.0, 100.0).unwrap();
        let c = d.tree().get(&id).unwrap();
        // "Double-click to edit" is 20 chars: 216px over 80px usable → 3 lines
        assert_eq!(c.height, 3.0 * 18.0 * 1.5 + 20.0);
    }

    #[test]
    fn test_move_snaps_and_clamps() {
        let mut d = designer();
        let id = d.drop_on_canvas(GRID, 200.0, 200.0).unwrap();
        let c = d.tree().get(&id).unwrap().clone();

        d.begin_move(&id, Point::new(c.x + 10.0, c.y + 10.0)).unwrap();
        assert_eq!(d.selected(), Some(id.as_str()));

        // Candidate top-left (98, 127) → grid (90, 135)
        d.pointer_move(Point::new(108.0, 137.0)).unwrap();
        let c = d.tree().get(&id).unwrap();
        assert_eq!((c.x, c.y), (90.0, 135.0));

        // Way off the canvas → clamped into the far corner
        d.pointer_move(Point::new(5000.0, 5000.0)).unwrap();
        let c = d.tree().get(&id).unwrap();
        assert_eq!((c.x, c.y), (900.0 - 180.0, 1285.0 - 90.0));

        d.pointer_up();
        assert!(d.gesture().is_idle());
        assert!(d.guides().is_empty());
    }

    #[test]
    fn test_move_produces_guides() {
        let mut d = designer();
        let a = d.drop_on_canvas(GRID, 400.0, 400.0).unwrap();
        let b = d.drop_on_canvas(GRID, 700.0, 700.0).unwrap();
        let a_rect = d.tree().get(&a).unwrap().rect();
        let b_rect = d.tree().get(&b).unwrap().rect();

        d.begin_move(&b, Point::new(b_rect.x, b_rect.y)).unwrap();
        // left edges 2px apart
        d.pointer_move(Point::new(a_rect.x + 2.0, 1000.0)).unwrap();
        assert!(!d.guides().is_empty());
        assert_eq!(d.tree().get(&b).unwrap().x, a_rect.x);
    }

    #[test]
    fn test_resize_snaps_with_minimum() {
        let mut d = designer();
        let id = d.drop_on_canvas(GRID, 200.0, 200.0).unwrap();
        d.begin_resize(&id, Point::new(0.0, 0.0)).unwrap();
        d.pointer_move(Point::new(-1000.0, -1000.0)).unwrap();
        let c = d.tree().get(&id).unwrap();
        assert_eq!((c.width, c.height), (50.0, 30.0));

        d.pointer_move(Point::new(-43.0, 3.0)).unwrap();
        let c = d.tree().get(&id).unwrap();
        assert_eq!((c.width, c.height), (135.0, 90.0));
    }

    #[test]
    fn test_track_drag() {
        let mut d = designer();
        let id = d.drop_on_canvas(GRID, 200.0, 200.0).unwrap();
        // 180px wide: 18px is 10%
        d.begin_track_drag(&id, Axis::Columns, 0, Point::new(0.0, 0.0)).unwrap();
        d.pointer_move(Point::new(18.0, 0.0)).unwrap();
        d.pointer_move(Point::new(9.0, 0.0)).unwrap();
        let widths = &d.tree().grid(&id).unwrap().column_widths;
        assert_eq!(widths, &vec![30.0, 20.0, 25.0, 25.0]);
        assert!(d.begin_track_drag(&id, Axis::Rows, 1, Point::new(0.0, 0.0)).is_err());
    }

    #[test]
    fn test_nested_cannot_be_dragged() {
        let mut d = designer();
        let grid = d.drop_on_canvas(GRID, 200.0, 200.0).unwrap();
        let inner = d.drop_on_cell(TEXT, &grid, CellKey::new(0, 0)).unwrap();
        assert!(d.begin_move(&inner, Point::new(0.0, 0.0)).is_err());
    }

    #[test]
    fn test_cell_drop_text_shows_payload_name() {
        let mut d = designer();
        let grid = d.drop_on_canvas(GRID, 200.0, 200.0).unwrap();
        let inner = d
            .drop_on_cell(r#"{"id":"text","name":"Heading","type":"text"}"#, &grid, CellKey::new(0, 1))
            .unwrap();
        assert_eq!(d.display_value(&inner).unwrap().label(), "Heading");

        // Canvas drops keep the editor default
        let top = d.drop_on_canvas(TEXT, 500.0, 500.0).unwrap();
        assert_eq!(d.display_value(&top).unwrap().label(), "Double-click to edit");
    }

    #[test]
    fn test_delete_grid_clears_nested_selection() {
        let mut d = designer();
        let grid = d.drop_on_canvas(GRID, 200.0, 200.0).unwrap();
        let inner = d.drop_on_cell(TEXT, &grid, CellKey::new(1, 1)).unwrap();
        d.select(Some(&inner)).unwrap();
        d.delete(&grid);
        assert_eq!(d.selected(), None);
        assert!(d.tree().is_empty());
    }

    #[test]
    fn test_key_down_without_selection() {
        let mut d = designer();
        d.drop_on_canvas(TEXT, 100.0, 100.0).unwrap();
        assert!(!d.key_down("Delete"));
        assert_eq!(d.tree().len(), 1);
    }

    #[test]
    fn test_table_field_toggle() {
        let mut d = designer();
        let id = d
            .drop_on_canvas(r#"{"id":"table","name":"Table","type":"table"}"#, 0.0, 0.0)
            .unwrap();
        d.set_table_binding(
            &id,
            Some("tbl"),
            vec![FieldMeta::new("a", "A", 1), FieldMeta::new("b", "B", 1)],
        )
        .unwrap();
        d.toggle_table_field(&id, "b").unwrap();
        let t = d.tree().get(&id).unwrap().as_table().unwrap();
        assert_eq!(t.selected_fields, vec!["b".to_string()]);

        let text = d.drop_on_canvas(TEXT, 0.0, 0.0).unwrap();
        assert!(d.toggle_table_field(&text, "b").is_err());
    }

    #[test]
    fn test_save_template_validation() {
        let mut d = designer();
        assert!(matches!(d.save_template("  "), Err(FolioError::Validation(_))));
        assert!(matches!(d.save_template("Invoice"), Err(FolioError::Validation(_))));
        d.set_active_table(Some("tbl"));
        let t = d.save_template(" Invoice ").unwrap();
        assert_eq!(t.name, "Invoice");
        assert_eq!(d.templates_for_active_table().len(), 1);
        d.set_active_table(Some("other"));
        assert!(d.templates_for_active_table().is_empty());
    }

    #[test]
    fn test_field_component_follows_record() {
        let mut d = designer();
        let id = d
            .drop_on_canvas(r#"{"id":"fld","name":"Customer","type":1}"#, 100.0, 100.0)
            .unwrap();
        assert!(matches!(d.tree().get(&id).unwrap().kind, ComponentKind::Field(_)));
        assert_eq!(d.display_value(&id).unwrap().label(), "Customer");

        d.set_records(
            vec![FieldMeta::new("fld", "Customer", 1)],
            vec![Record {
                id: "r1".into(),
                fields: [("fld".to_string(), serde_json::json!("Ada Lovelace"))].into(),
            }],
        );
        d.select_record(Some("r1"));
        assert_eq!(d.display_value(&id).unwrap().label(), "Ada Lovelace");
    }
}
