//! # HTTP Server for the Layout Designer
//!
//! Exposes one designer session over a JSON API, for a browser frontend
//! or for scripting.
//!
//! ## Usage
//!
//! ```bash
//! folio serve --listen 0.0.0.0:8080 --data fixture.json --templates ./templates
//! ```
//!
//! ## Routes
//!
//! | Method | Path | Purpose |
//! |--------|------|---------|
//! | GET | `/api/components` | canvas, selection, palette |
//! | POST | `/api/drop` | drop a palette item on the canvas or a grid cell |
//! | POST | `/api/select` | change the selection |
//! | POST | `/api/components/:id/patch` | edit properties |
//! | DELETE | `/api/components/:id` | delete |
//! | POST | `/api/components/:id/bind` | bind a data table to a host table |
//! | POST | `/api/components/:id/fields` | edit a data table's fields |
//! | POST | `/api/grid/:id/merge` | merge a cell rectangle |
//! | POST | `/api/grid/:id/split` | split a merged cell |
//! | POST | `/api/grid/:id/size` | change row/column counts |
//! | GET, POST | `/api/templates` | list / save templates |
//! | POST | `/api/templates/:id/load` | load a template |
//! | DELETE | `/api/templates/:id` | delete a template |
//! | GET | `/api/tables` | host tables |
//! | POST | `/api/tables/:id/open` | make a table active |
//! | GET | `/api/records` | record browser page |
//! | POST | `/api/records/select` | select a record |
//! | POST | `/api/currency/convert` | convert a currency field |
//! | POST | `/api/print` | printable HTML |

mod handlers;
mod state;

pub use state::{AppState, ServerConfig};

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::currency::ExchangeRateApi;
use crate::error::FolioError;
use crate::host::MemoryHost;
use crate::store::JsonFileStore;

/// Build the API router over shared state.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        // Canvas
        .route("/api/components", get(handlers::components::list))
        .route("/api/drop", post(handlers::components::drop))
        .route("/api/select", post(handlers::components::select))
        .route(
            "/api/components/:id",
            axum::routing::delete(handlers::components::remove),
        )
        .route("/api/components/:id/patch", post(handlers::components::patch))
        .route("/api/components/:id/bind", post(handlers::records::bind))
        .route("/api/components/:id/fields", post(handlers::records::fields))
        // Grid
        .route("/api/grid/:id/merge", post(handlers::components::merge))
        .route("/api/grid/:id/split", post(handlers::components::split))
        .route("/api/grid/:id/size", post(handlers::components::resize_grid))
        // Templates
        .route(
            "/api/templates",
            get(handlers::templates::list).post(handlers::templates::save),
        )
        .route("/api/templates/:id/load", post(handlers::templates::load))
        .route(
            "/api/templates/:id",
            axum::routing::delete(handlers::templates::remove),
        )
        // Host data
        .route("/api/tables", get(handlers::records::tables))
        .route("/api/tables/:id/open", post(handlers::records::open_table))
        .route("/api/records", get(handlers::records::records))
        .route("/api/records/select", post(handlers::records::select_record))
        .route(
            "/api/currency/convert",
            post(handlers::records::convert_currency),
        )
        // Print
        .route("/api/print", post(handlers::print::print))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the HTTP server.
///
/// ## Example
///
/// ```no_run
/// use folio::server::{serve, ServerConfig};
///
/// # async fn example() -> Result<(), folio::error::FolioError> {
/// let config = ServerConfig {
///     listen_addr: "0.0.0.0:8080".to_string(),
///     data_path: None,
///     templates_dir: "templates".into(),
/// };
///
/// serve(config).await?;
/// # Ok(())
/// # }
/// ```
pub async fn serve(config: ServerConfig) -> Result<(), FolioError> {
    let host = match &config.data_path {
        Some(path) => MemoryHost::load(path)?,
        None => MemoryHost::new(),
    };
    let store = JsonFileStore::new(&config.templates_dir);
    let rates = ExchangeRateApi::new()?;
    let state = Arc::new(AppState::new(
        config.clone(),
        Arc::new(host),
        Arc::new(store),
        Arc::new(rates),
    ));

    let app = router(state);

    info!(
        listen = %config.listen_addr,
        data = ?config.data_path,
        templates = %config.templates_dir.display(),
        "folio HTTP server starting"
    );

    let listener = tokio::net::TcpListener::bind(&config.listen_addr)
        .await
        .map_err(|e| {
            FolioError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to bind to {}: {}", config.listen_addr, e),
            ))
        })?;

    axum::serve(listener, app).await?;

    Ok(())
}
