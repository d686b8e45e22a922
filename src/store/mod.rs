//! # Template Store
//!
//! Saved canvas layouts. The whole collection lives under one key of a flat
//! key-value store and is read and written as a single JSON array; there are
//! no partial updates.
//!
//! | Implementation | Backing |
//! |----------------|---------|
//! | [`JsonFileStore`] | one `<key>.json` file per key in a directory |
//! | [`MemoryStore`] | a map, for tests and ephemeral sessions |

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::document::ComponentTree;
use crate::error::FolioError;

/// Key the template collection is stored under.
pub const TEMPLATE_KEY: &str = "canvas_templates";

/// A named snapshot of the canvas bound to one host table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    pub id: String,
    pub name: String,
    pub table_id: String,
    pub components: ComponentTree,
    /// Creation time, milliseconds since the Unix epoch
    pub created_at: i64,
}

impl Template {
    /// A new template holding a copy of `components`.
    pub fn new(name: impl Into<String>, table_id: impl Into<String>, components: &ComponentTree) -> Self {
        Self {
            id: format!("template_{}", Uuid::new_v4().simple()),
            name: name.into(),
            table_id: table_id.into(),
            components: components.clone(),
            created_at: Utc::now().timestamp_millis(),
        }
    }
}

/// Flat key-value persistence for template collections.
pub trait TemplateStore: Send + Sync {
    /// Every template stored under `key`; an absent key is an empty list.
    fn load(&self, key: &str) -> Result<Vec<Template>, FolioError>;

    /// Replace everything stored under `key`.
    fn save(&self, key: &str, templates: &[Template]) -> Result<(), FolioError>;
}

/// Load templates, logging and returning an empty list on failure.
pub fn load_or_empty(store: &dyn TemplateStore) -> Vec<Template> {
    store.load(TEMPLATE_KEY).unwrap_or_else(|e| {
        warn!(error = %e, "failed to load templates");
        Vec::new()
    })
}

/// Stores each key as `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl TemplateStore for JsonFileStore {
    fn load(&self, key: &str) -> Result<Vec<Template>, FolioError> {
        let path = self.path(key);
        if !path.exists() {
            debug!(path = %path.display(), "no template file yet");
            return Ok(Vec::new());
        }
        let data = std::fs::read_to_string(&path)?;
        serde_json::from_str(&data)
            .map_err(|e| FolioError::Store(format!("{}: {e}", path.display())))
    }

    fn save(&self, key: &str, templates: &[Template]) -> Result<(), FolioError> {
        std::fs::create_dir_all(&self.dir)?;
        let data = serde_json::to_string_pretty(templates)?;
        // Write then rename so readers never see a half-written file.
        let path = self.path(key);
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, data)?;
        std::fs::rename(&tmp, &path)?;
        Ok(())
    }
}

/// Keeps collections in memory as serialized JSON.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TemplateStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Vec<Template>, FolioError> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        match entries.get(key) {
            Some(data) => Ok(serde_json::from_str(data)?),
            None => Ok(Vec::new()),
        }
    }

    fn save(&self, key: &str, templates: &[Template]) -> Result<(), FolioError> {
        let data = serde_json::to_string(templates)?;
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), data);
        Ok(())
    }
}
