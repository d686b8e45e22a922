//! # Designer Scenarios
//!
//! End-to-end editing sessions driven through the public `Designer` API,
//! plus print runs against an in-memory host.

use std::sync::Arc;

use pretty_assertions::assert_eq;
use serde_json::json;

use folio::config::{CanvasConfig, PrintConfig};
use folio::designer::Designer;
use folio::document::{ComponentKind, ComponentPatch, RecordScope};
use folio::geometry::Point;
use folio::grid::{CellKey, covered_cells};
use folio::host::{FieldMeta, MemoryHost, Record};
use folio::print::{self, Node};
use folio::store::{MemoryStore, TEMPLATE_KEY, TemplateStore};
use folio::value::RecordView;

const TEXT: &str = r#"{"id":"text","name":"Text","type":"text"}"#;
const GRID: &str = r#"{"id":"grid","name":"Grid","type":"grid"}"#;
const TABLE: &str = r#"{"id":"table","name":"Data table","type":"table"}"#;

fn designer() -> Designer {
    Designer::new(CanvasConfig::DEFAULT, Arc::new(MemoryStore::new()))
}

fn orders_host() -> MemoryHost {
    let host = MemoryHost::new();
    host.add_table(
        "tbl",
        "Orders",
        vec![
            FieldMeta::new("customer", "Customer", 1),
            FieldMeta::new("placed", "Placed", 5),
        ],
    );
    for (id, customer) in [("r1", "Ada"), ("r2", "Grace"), ("r3", "Edsger")] {
        host.add_record(
            "tbl",
            Record {
                id: id.into(),
                fields: [
                    ("customer".to_string(), json!(customer)),
                    ("placed".to_string(), json!(1_700_000_000_000_i64)),
                ]
                .into(),
            },
        );
    }
    host
}

// ============================================================================
// EDITING
// ============================================================================

#[test]
fn test_text_drop_edit_delete() {
    let mut d = designer();
    let id = d.drop_on_canvas(TEXT, 100.0, 100.0).unwrap();

    let c = d.tree().get(&id).unwrap();
    assert_eq!((c.x, c.y), (50.0, 75.0));
    assert!(c.x + c.width <= 900.0 && c.y + c.height <= 1285.0);

    d.update(&id, &ComponentPatch::content("Hello")).unwrap();
    assert_eq!(d.display_value(&id).unwrap().label(), "Hello");

    d.select(Some(&id)).unwrap();
    assert!(d.key_down("Delete"));
    assert!(!d.tree().contains(&id));
    assert_eq!(d.selected(), None);
}

#[test]
fn test_drop_near_edge_is_clamped() {
    let mut d = designer();
    let id = d.drop_on_canvas(TEXT, 5.0, 5.0).unwrap();
    let c = d.tree().get(&id).unwrap();
    assert_eq!((c.x, c.y), (0.0, 0.0));

    let id = d.drop_on_canvas(TEXT, 2000.0, 5000.0).unwrap();
    let c = d.tree().get(&id).unwrap();
    assert!(c.x > 0.0 && c.x + c.width <= 900.0);
    assert!(c.y > 0.0 && c.y + c.height <= 1285.0);
}

#[test]
fn test_table_drop_spans_canvas() {
    let mut d = designer();
    let id = d.drop_on_canvas(TABLE, 400.0, 300.0).unwrap();
    let c = d.tree().get(&id).unwrap();
    assert_eq!((c.x, c.width), (0.0, 900.0));
}

#[test]
fn test_grid_merge_and_split() {
    let mut d = designer();
    let id = d.drop_on_canvas(GRID, 300.0, 300.0).unwrap();

    let grid = d.tree().grid(&id).unwrap();
    assert_eq!(grid.row_heights, vec![50.0, 50.0]);
    assert_eq!(grid.column_widths, vec![25.0, 25.0, 25.0, 25.0]);
    let before = covered_cells(&grid.merges);

    d.merge_cells(&id, CellKey::new(0, 0), CellKey::new(0, 1)).unwrap();
    let grid = d.tree().grid(&id).unwrap();
    assert!(grid.is_covered(0, 1));
    assert!(!grid.is_covered(0, 0));

    d.split_cell(&id, 0, 0).unwrap();
    let grid = d.tree().grid(&id).unwrap();
    assert!(!grid.is_covered(0, 1));
    assert_eq!(covered_cells(&grid.merges), before);
}

#[test]
fn test_grid_tracks_always_sum_to_100() {
    let mut d = designer();
    let id = d.drop_on_canvas(GRID, 300.0, 300.0).unwrap();

    let sum = |v: &[f64]| v.iter().sum::<f64>();
    let check = |d: &Designer| {
        let grid = d.tree().grid(&id).unwrap();
        assert!((sum(&grid.row_heights) - 100.0).abs() < 1e-6);
        assert!((sum(&grid.column_widths) - 100.0).abs() < 1e-6);
    };

    d.set_grid_columns(&id, 5).unwrap();
    check(&d);
    d.begin_track_drag(&id, folio::designer::Axis::Columns, 1, Point::new(0.0, 0.0))
        .unwrap();
    d.pointer_move(Point::new(27.0, 0.0)).unwrap();
    d.pointer_up();
    check(&d);
    d.set_grid_rows(&id, 7).unwrap();
    check(&d);
    d.merge_cells(&id, CellKey::new(1, 1), CellKey::new(3, 2)).unwrap();
    d.set_grid_columns(&id, 3).unwrap();
    check(&d);
    d.set_grid_rows(&id, 1).unwrap();
    check(&d);
}

#[test]
fn test_nested_component_edit_and_delete() {
    let mut d = designer();
    let grid = d.drop_on_canvas(GRID, 300.0, 300.0).unwrap();
    let top = d.drop_on_canvas(TEXT, 600.0, 600.0).unwrap();
    let nested = d.drop_on_cell(TEXT, &grid, CellKey::new(1, 2)).unwrap();

    d.update(&nested, &ComponentPatch::content("inside")).unwrap();
    assert_eq!(d.display_value(&nested).unwrap().label(), "inside");
    assert!(matches!(d.tree().get(&top).unwrap().kind, ComponentKind::Text(_)));

    d.select(Some(&nested)).unwrap();
    assert!(d.delete(&nested).is_some());
    assert_eq!(d.selected(), None);
    assert!(d.tree().grid(&grid).unwrap().cell(CellKey::new(1, 2)).is_empty());
    assert!(d.tree().contains(&top));
    assert_eq!(d.tree().len(), 2);
}

#[test]
fn test_drop_on_cell_replaces_first() {
    let mut d = designer();
    let grid = d.drop_on_canvas(GRID, 300.0, 300.0).unwrap();
    let first = d.drop_on_cell(TEXT, &grid, CellKey::new(0, 0)).unwrap();
    let second = d.drop_on_cell(TEXT, &grid, CellKey::new(0, 0)).unwrap();

    assert!(!d.tree().contains(&first));
    assert_eq!(d.tree().grid(&grid).unwrap().cell(CellKey::new(0, 0)), [second]);
}

#[test]
fn test_drop_on_covered_cell_is_rejected() {
    let mut d = designer();
    let grid = d.drop_on_canvas(GRID, 300.0, 300.0).unwrap();
    d.merge_cells(&grid, CellKey::new(0, 0), CellKey::new(1, 1)).unwrap();
    assert!(d.drop_on_cell(TEXT, &grid, CellKey::new(1, 1)).is_err());
}

// ============================================================================
// TEMPLATES
// ============================================================================

#[test]
fn test_load_template_replaces_canvas() {
    let store = Arc::new(MemoryStore::new());
    let mut d = Designer::new(CanvasConfig::DEFAULT, store.clone());

    d.set_active_table(Some("T1"));
    d.drop_on_canvas(TEXT, 100.0, 100.0).unwrap();
    d.drop_on_canvas(GRID, 300.0, 300.0).unwrap();
    let t1 = d.save_template("First").unwrap().id.clone();

    let id = d.drop_on_canvas(TEXT, 500.0, 500.0).unwrap();
    let first = d.tree().top_level_ids()[0].clone();
    d.delete(&first);
    d.update(&id, &ComponentPatch::content("second layout")).unwrap();
    d.set_active_table(Some("T2"));
    let t2 = d.save_template("Second").unwrap().id.clone();
    let t2_components = d.templates().iter().find(|t| t.id == t2).unwrap().components.clone();

    d.load_template(&t1).unwrap();
    assert_eq!(d.active_table(), Some("T1"));
    assert_eq!(d.tree().len(), 2);

    d.load_template(&t2).unwrap();
    assert_eq!(d.active_table(), Some("T2"));
    assert_eq!(d.tree(), &t2_components);
    assert_eq!(d.templates_for_active_table().len(), 1);

    // Both templates were persisted
    assert_eq!(store.load(TEMPLATE_KEY).unwrap().len(), 2);

    // A new session sees them
    let reopened = Designer::new(CanvasConfig::DEFAULT, store);
    assert_eq!(reopened.templates().len(), 2);
}

#[test]
fn test_edits_after_load_do_not_touch_template() {
    let mut d = designer();
    d.set_active_table(Some("T1"));
    let id = d.drop_on_canvas(TEXT, 100.0, 100.0).unwrap();
    let template = d.save_template("Snap").unwrap().id.clone();

    d.load_template(&template).unwrap();
    d.update(&id, &ComponentPatch::content("changed")).unwrap();

    let saved = &d.templates()[0].components;
    assert_ne!(saved.get(&id), d.tree().get(&id));
}

#[test]
fn test_delete_template() {
    let mut d = designer();
    d.set_active_table(Some("T1"));
    let id = d.save_template("Empty").unwrap().id.clone();
    d.delete_template(&id).unwrap();
    assert!(d.templates().is_empty());
    assert!(d.load_template(&id).is_err());
}

// ============================================================================
// RECORDS & PRINT
// ============================================================================

#[tokio::test]
async fn test_field_components_follow_selected_record() {
    let host = orders_host();
    let mut d = designer();
    d.open_table(&host, "tbl").await;
    assert_eq!(d.active_table(), Some("tbl"));
    assert_eq!(d.browser().records.len(), 3);

    let id = d
        .drop_on_canvas(r#"{"id":"customer","name":"Customer","type":1}"#, 200.0, 200.0)
        .unwrap();
    assert_eq!(d.display_value(&id).unwrap().label(), "Customer");

    d.select_record(Some("r2"));
    assert_eq!(d.display_value(&id).unwrap().label(), "Grace");
}

#[tokio::test]
async fn test_print_bound_table_and_pages() {
    let host = orders_host();
    host.set_visible("tbl", &["r3", "r1"]);

    let mut d = designer();
    d.open_table(&host, "tbl").await;
    let table = d.drop_on_canvas(TABLE, 0.0, 100.0).unwrap();
    d.bind_table(&host, &table, "tbl").await.unwrap();
    d.toggle_table_field(&table, "customer").unwrap();
    let field = d
        .drop_on_canvas(r#"{"id":"customer","name":"Customer","type":1}"#, 200.0, 800.0)
        .unwrap();

    let config = PrintConfig::DEFAULT;
    let data = print::gather(d.tree(), &host, &config).await;
    assert_eq!(data.records(&table).len(), 2);

    let browser = d.browser();
    let views: Vec<RecordView<'_>> = browser
        .records
        .iter()
        .map(|r| RecordView::new(&browser.fields, Some(r)))
        .collect();
    let doc = print::compile(d.tree(), &data, &views, d.config(), &config);
    assert_eq!(doc.pages.len(), 3);

    let page = &doc.pages[0];
    let Node::Table(t) = &page.nodes[0] else {
        panic!("expected a table node");
    };
    let headers: Vec<&str> = t.header.cells.iter().map(|c| c.text.as_str()).collect();
    assert_eq!(headers, vec!["No.", "Customer"]);
    let customers: Vec<&str> = t.rows.iter().map(|r| r.cells[1].text.as_str()).collect();
    assert_eq!(customers, vec!["Edsger", "Ada"]);

    let texts: Vec<String> = doc
        .pages
        .iter()
        .map(|p| match p.nodes.iter().find(|n| n.frame().y >= 700.0) {
            Some(Node::Text(n)) => n.text.clone(),
            _ => String::new(),
        })
        .collect();
    assert_eq!(texts, vec!["Ada", "Grace", "Edsger"]);
    assert!(d.tree().contains(&field));

    let html = doc.to_html();
    assert_eq!(html.matches("class=\"print-canvas\"").count(), 3);
}

#[tokio::test]
async fn test_print_current_view_falls_back_to_whole_table() {
    let host = orders_host();
    host.set_visible("tbl", &["r1"]);
    host.fail_visible_ids(true);

    let mut d = designer();
    let table = d.drop_on_canvas(TABLE, 0.0, 0.0).unwrap();
    d.bind_table(&host, &table, "tbl").await.unwrap();
    assert_eq!(
        d.tree().get(&table).unwrap().as_table().unwrap().scope,
        RecordScope::CurrentView
    );

    let data = print::gather(d.tree(), &host, &PrintConfig::DEFAULT).await;
    assert_eq!(data.records(&table).len(), 3);
}

#[tokio::test]
async fn test_unknown_table_prints_empty() {
    let host = orders_host();
    let mut d = designer();
    let table = d.drop_on_canvas(TABLE, 0.0, 0.0).unwrap();
    d.set_table_binding(&table, Some("missing"), vec![FieldMeta::new("f", "F", 1)])
        .unwrap();

    let data = print::gather(d.tree(), &host, &PrintConfig::DEFAULT).await;
    assert!(data.records(&table).is_empty());

    let doc = print::compile(
        d.tree(),
        &data,
        &[RecordView::default()],
        d.config(),
        &PrintConfig::DEFAULT,
    );
    let Node::Table(t) = &doc.pages[0].nodes[0] else {
        panic!("expected a table node");
    };
    assert!(t.rows.is_empty());
    assert!(t.frame.height >= 40.0);
}
