//! In-memory host backed by a JSON fixture.
//!
//! Used by the CLI and server when no real table platform is attached, and
//! by tests.
//!
//! ## Fixture format
//!
//! ```json
//! {
//!   "tables": [
//!     {
//!       "id": "tbl1", "name": "Orders",
//!       "fields": [{"id": "fld1", "name": "Customer", "type": 1}],
//!       "records": [{"id": "rec1", "fields": {"fld1": "Ada"}}],
//!       "visible": ["rec1"],
//!       "currencies": {"fld2": "USD"}
//!     }
//!   ]
//! }
//! ```

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{FieldMeta, HostApi, Record, TableMeta};
use crate::error::FolioError;

/// One table of a fixture file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TableFixture {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub fields: Vec<FieldMeta>,
    #[serde(default)]
    pub records: Vec<Record>,
    /// Ids visible in the active view; `None` means every record.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible: Option<Vec<String>>,
    /// Currency code per currency field id.
    #[serde(default)]
    pub currencies: HashMap<String, String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HostFixture {
    #[serde(default)]
    pub tables: Vec<TableFixture>,
}

#[derive(Debug, Default)]
struct State {
    tables: Vec<TableFixture>,
    fail_visible_ids: bool,
}

/// A [`HostApi`] over tables held in memory.
#[derive(Debug, Default)]
pub struct MemoryHost {
    state: Mutex<State>,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_fixture(fixture: HostFixture) -> Self {
        Self {
            state: Mutex::new(State {
                tables: fixture.tables,
                fail_visible_ids: false,
            }),
        }
    }

    /// Load a fixture file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, FolioError> {
        let data = std::fs::read_to_string(path)?;
        let fixture: HostFixture = serde_json::from_str(&data)?;
        Ok(Self::from_fixture(fixture))
    }

    /// A copy of the current contents as a fixture.
    pub fn snapshot(&self) -> HostFixture {
        HostFixture {
            tables: self.lock().tables.clone(),
        }
    }

    pub fn add_table(&self, id: &str, name: &str, fields: Vec<FieldMeta>) {
        self.lock().tables.push(TableFixture {
            id: id.to_string(),
            name: name.to_string(),
            fields,
            ..Default::default()
        });
    }

    pub fn add_record(&self, table_id: &str, record: Record) {
        if let Some(table) = self.lock().tables.iter_mut().find(|t| t.id == table_id) {
            table.records.push(record);
        }
    }

    pub fn set_visible(&self, table_id: &str, ids: &[&str]) {
        if let Some(table) = self.lock().tables.iter_mut().find(|t| t.id == table_id) {
            table.visible = Some(ids.iter().map(|s| s.to_string()).collect());
        }
    }

    /// Make `visible_record_ids` fail, to exercise the full-fetch fallback.
    pub fn fail_visible_ids(&self, fail: bool) {
        self.lock().fail_visible_ids = fail;
    }

    /// Run `f` against one table.
    pub(crate) fn with_table<T>(
        &self,
        table_id: &str,
        f: impl FnOnce(&mut TableFixture) -> T,
    ) -> Result<T, FolioError> {
        let mut state = self.lock();
        let table = state
            .tables
            .iter_mut()
            .find(|t| t.id == table_id)
            .ok_or_else(|| FolioError::Host(format!("no table {table_id}")))?;
        Ok(f(table))
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl HostApi for MemoryHost {
    async fn list_tables(&self) -> Result<Vec<TableMeta>, FolioError> {
        Ok(self
            .lock()
            .tables
            .iter()
            .map(|t| TableMeta {
                id: t.id.clone(),
                name: t.name.clone(),
            })
            .collect())
    }

    async fn list_fields(&self, table_id: &str) -> Result<Vec<FieldMeta>, FolioError> {
        self.with_table(table_id, |t| t.fields.clone())
    }

    async fn list_records(
        &self,
        table_id: &str,
        page_size: usize,
    ) -> Result<Vec<Record>, FolioError> {
        self.with_table(table_id, |t| {
            t.records.iter().take(page_size).cloned().collect()
        })
    }

    async fn visible_record_ids(&self, table_id: &str) -> Result<Vec<String>, FolioError> {
        if self.lock().fail_visible_ids {
            return Err(FolioError::Host("active view unavailable".to_string()));
        }
        self.with_table(table_id, |t| match &t.visible {
            Some(ids) => ids.clone(),
            None => t.records.iter().map(|r| r.id.clone()).collect(),
        })
    }

    async fn record_by_id(&self, table_id: &str, record_id: &str) -> Result<Record, FolioError> {
        self.with_table(table_id, |t| {
            t.records.iter().find(|r| r.id == record_id).cloned()
        })?
        .ok_or_else(|| FolioError::Host(format!("no record {record_id} in {table_id}")))
    }
}
