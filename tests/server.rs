//! # HTTP API Tests
//!
//! Drive the router in-process with `oneshot` requests against an
//! in-memory host and template store.

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use tower::ServiceExt;

use folio::FolioError;
use folio::currency::RateSource;
use folio::host::{FieldMeta, MemoryHost, Record};
use folio::server::{AppState, ServerConfig, router};
use folio::store::MemoryStore;

struct FixedRate(f64);

#[async_trait]
impl RateSource for FixedRate {
    async fn rate(&self, _base: &str, _target: &str) -> Result<f64, FolioError> {
        Ok(self.0)
    }
}

fn app() -> Router {
    let host = MemoryHost::new();
    host.add_table("tbl", "Orders", vec![FieldMeta::new("customer", "Customer", 1)]);
    for (id, customer) in [("r1", "Ada"), ("r2", "Grace")] {
        host.add_record(
            "tbl",
            Record {
                id: id.into(),
                fields: [("customer".to_string(), json!(customer))].into(),
            },
        );
    }

    let config = ServerConfig {
        listen_addr: "127.0.0.1:0".to_string(),
        data_path: None,
        templates_dir: "templates".into(),
    };
    let state = AppState::new(
        config,
        Arc::new(host),
        Arc::new(MemoryStore::new()),
        Arc::new(FixedRate(2.0)),
    );
    router(Arc::new(state))
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Vec<u8>) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, bytes.to_vec())
}

async fn send_json(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let (status, bytes) = send(app, method, uri, body).await;
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

#[tokio::test]
async fn test_drop_select_delete() {
    let app = app();

    let (status, body) = send_json(
        &app,
        "POST",
        "/api/drop",
        Some(json!({
            "payload": r#"{"id":"text","name":"Text","type":"text"}"#,
            "x": 100.0,
            "y": 100.0,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let id = body["id"].as_str().unwrap().to_string();
    assert!(id.starts_with("text_"));

    let (status, _) = send_json(&app, "POST", "/api/select", Some(json!({ "id": id }))).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, canvas) = send_json(&app, "GET", "/api/components", None).await;
    assert_eq!(canvas["selected"], json!(id));
    assert_eq!(canvas["width"], json!(900.0));
    assert_eq!(canvas["components"]["components"].as_array().unwrap().len(), 1);

    let (status, _) = send(&app, "DELETE", &format!("/api/components/{id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, canvas) = send_json(&app, "GET", "/api/components", None).await;
    assert_eq!(canvas["selected"], Value::Null);
    assert!(canvas["components"]["components"].as_array().unwrap().is_empty());

    let (status, _) = send(&app, "DELETE", &format!("/api/components/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_malformed_payload_is_bad_request() {
    let app = app();
    let (status, _) = send(
        &app,
        "POST",
        "/api/drop",
        Some(json!({ "payload": "not json", "x": 0.0, "y": 0.0 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, canvas) = send_json(&app, "GET", "/api/components", None).await;
    assert!(canvas["components"]["components"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_grid_merge_rejects_bad_range() {
    let app = app();
    let (_, body) = send_json(
        &app,
        "POST",
        "/api/drop",
        Some(json!({
            "payload": r#"{"id":"grid","name":"Grid","type":"grid"}"#,
            "x": 300.0,
            "y": 300.0,
        })),
    )
    .await;
    let grid = body["id"].as_str().unwrap().to_string();

    let (status, _) = send(
        &app,
        "POST",
        &format!("/api/grid/{grid}/merge"),
        Some(json!({ "start": "0-0", "end": "5-0" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, span) = send_json(
        &app,
        "POST",
        &format!("/api/grid/{grid}/merge"),
        Some(json!({ "start": "0-0", "end": "1-1" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(span.is_object());

    let (status, _) = send(
        &app,
        "POST",
        "/api/drop",
        Some(json!({
            "payload": r#"{"id":"text","name":"Text","type":"text"}"#,
            "grid_id": grid,
            "cell": "1-1",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_templates_need_active_table() {
    let app = app();

    let (status, _) = send(&app, "POST", "/api/templates", Some(json!({ "name": "Invoice" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, "POST", "/api/tables/tbl/open", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, saved) =
        send_json(&app, "POST", "/api/templates", Some(json!({ "name": " Invoice " }))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(saved["name"], json!("Invoice"));
    assert_eq!(saved["table_id"], json!("tbl"));

    let (_, list) = send_json(&app, "GET", "/api/templates", None).await;
    assert_eq!(list.as_array().unwrap().len(), 1);

    let id = saved["id"].as_str().unwrap();
    let (status, _) = send(&app, "POST", &format!("/api/templates/{id}/load"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, "DELETE", &format!("/api/templates/{id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, "POST", &format!("/api/templates/{id}/load"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_records_and_print() {
    let app = app();

    let (_, tables) = send_json(&app, "GET", "/api/tables", None).await;
    assert_eq!(tables, json!([{ "id": "tbl", "name": "Orders" }]));

    send(&app, "POST", "/api/tables/tbl/open", None).await;
    let (_, page) = send_json(&app, "GET", "/api/records", None).await;
    assert_eq!(page["records"].as_array().unwrap().len(), 2);
    assert_eq!(page["selected"], Value::Null);

    let (_, body) = send_json(
        &app,
        "POST",
        "/api/drop",
        Some(json!({
            "payload": r#"{"id":"customer","name":"Customer","type":1}"#,
            "x": 200.0,
            "y": 200.0,
        })),
    )
    .await;
    assert!(body["id"].as_str().is_some());

    let (_, selected) =
        send_json(&app, "POST", "/api/records/select", Some(json!({ "record_id": "r2" }))).await;
    assert_eq!(selected["id"], json!("r2"));

    let (status, html) = send(&app, "POST", "/api/print", Some(json!({}))).await;
    assert_eq!(status, StatusCode::OK);
    let html = String::from_utf8(html).unwrap();
    assert_eq!(html.matches("class=\"print-canvas\"").count(), 1);
    assert!(html.contains("Grace"));

    let (_, html) = send(
        &app,
        "POST",
        "/api/print",
        Some(json!({ "record_ids": ["r1", "r2", "missing"] })),
    )
    .await;
    let html = String::from_utf8(html).unwrap();
    assert_eq!(html.matches("class=\"print-canvas\"").count(), 2);
    assert!(html.contains("Ada"));
}
