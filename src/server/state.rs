//! Server state and configuration.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::config::{CanvasConfig, PrintConfig};
use crate::currency::RateSource;
use crate::designer::Designer;
use crate::host::MemoryHost;
use crate::store::TemplateStore;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to listen on (e.g., "0.0.0.0:8080")
    pub listen_addr: String,
    /// Host fixture file; an empty host is used when absent
    pub data_path: Option<PathBuf>,
    /// Directory templates are saved in
    pub templates_dir: PathBuf,
}

/// Application state shared across handlers.
pub struct AppState {
    pub config: ServerConfig,
    /// The one editing session; a single writer at a time.
    pub designer: RwLock<Designer>,
    pub host: Arc<MemoryHost>,
    pub rates: Arc<dyn RateSource>,
    pub print: PrintConfig,
}

impl AppState {
    pub fn new(
        config: ServerConfig,
        host: Arc<MemoryHost>,
        store: Arc<dyn TemplateStore>,
        rates: Arc<dyn RateSource>,
    ) -> Self {
        Self {
            config,
            designer: RwLock::new(Designer::new(CanvasConfig::DEFAULT, store)),
            host,
            rates,
            print: PrintConfig::DEFAULT,
        }
    }
}
