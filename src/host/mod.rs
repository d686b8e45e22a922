//! # Host Data API
//!
//! The table platform the designer reads data from: tables, their fields and
//! their records.
//!
//! [`HostApi`] is the raw surface; every call may fail. The free functions
//! here are what the rest of the crate calls. They never fail: a failed
//! fetch is logged and degrades to an empty list, and the current-view fetch
//! falls back to a full-table fetch.
//!
//! ```text
//! fetch_records(scope = CurrentView)
//!   ├─ visible_record_ids ──ok──► record_by_id × N (joined, failures dropped)
//!   └─ visible_record_ids ──err─► list_records(page_size)
//! ```

mod memory;

pub use memory::{HostFixture, MemoryHost, TableFixture};

use std::collections::HashMap;

use async_trait::async_trait;
use futures_util::future::join_all;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::document::RecordScope;
use crate::error::FolioError;

/// A table of the host base.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableMeta {
    pub id: String,
    pub name: String,
}

/// A field (column) of a host table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldMeta {
    pub id: String,
    pub name: String,
    /// Host field type code (5 = date-time, 2 = number, ...)
    #[serde(rename = "type", default)]
    pub field_type: i64,
}

impl FieldMeta {
    pub fn new(id: impl Into<String>, name: impl Into<String>, field_type: i64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            field_type,
        }
    }
}

/// A host record: raw field values keyed by field id.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Record {
    pub id: String,
    #[serde(default)]
    pub fields: HashMap<String, serde_json::Value>,
}

impl Record {
    pub fn value(&self, field_id: &str) -> &serde_json::Value {
        self.fields
            .get(field_id)
            .unwrap_or(&serde_json::Value::Null)
    }
}

/// Access to the host table platform.
#[async_trait]
pub trait HostApi: Send + Sync {
    async fn list_tables(&self) -> Result<Vec<TableMeta>, FolioError>;

    async fn list_fields(&self, table_id: &str) -> Result<Vec<FieldMeta>, FolioError>;

    /// Up to `page_size` records of the table.
    async fn list_records(
        &self,
        table_id: &str,
        page_size: usize,
    ) -> Result<Vec<Record>, FolioError>;

    /// Ids of the records visible in the table's active view, in view order.
    async fn visible_record_ids(&self, table_id: &str) -> Result<Vec<String>, FolioError>;

    async fn record_by_id(&self, table_id: &str, record_id: &str) -> Result<Record, FolioError>;
}

/// Every table of the base, or none if the host call fails.
pub async fn tables_or_empty(host: &dyn HostApi) -> Vec<TableMeta> {
    host.list_tables().await.unwrap_or_else(|e| {
        warn!(error = %e, "failed to list tables");
        Vec::new()
    })
}

/// Fields of a table, or none if the host call fails.
pub async fn fields_or_empty(host: &dyn HostApi, table_id: &str) -> Vec<FieldMeta> {
    host.list_fields(table_id).await.unwrap_or_else(|e| {
        warn!(table_id, error = %e, "failed to list fields");
        Vec::new()
    })
}

/// Up to `page_size` records of a table, or none if the host call fails.
pub async fn records_or_empty(host: &dyn HostApi, table_id: &str, page_size: usize) -> Vec<Record> {
    host.list_records(table_id, page_size)
        .await
        .unwrap_or_else(|e| {
            warn!(table_id, error = %e, "failed to list records");
            Vec::new()
        })
}

/// Records visible in the table's active view.
///
/// Each visible id is fetched individually and concurrently; ids that fail
/// are left out. If the visible ids cannot be listed at all, falls back to
/// the full-table fetch.
pub async fn current_view_records(
    host: &dyn HostApi,
    table_id: &str,
    page_size: usize,
) -> Vec<Record> {
    let ids = match host.visible_record_ids(table_id).await {
        Ok(ids) => ids,
        Err(e) => {
            warn!(table_id, error = %e, "failed to list visible records, fetching whole table");
            return records_or_empty(host, table_id, page_size).await;
        }
    };

    let fetches = ids
        .iter()
        .filter(|id| !id.is_empty())
        .map(|id| host.record_by_id(table_id, id));

    join_all(fetches)
        .await
        .into_iter()
        .filter_map(|result| match result {
            Ok(record) => Some(record),
            Err(e) => {
                warn!(table_id, error = %e, "failed to fetch record");
                None
            }
        })
        .collect()
}

/// Records of a table according to a data table's scope.
pub async fn fetch_records(
    host: &dyn HostApi,
    table_id: &str,
    scope: RecordScope,
    page_size: usize,
) -> Vec<Record> {
    match scope {
        RecordScope::All => records_or_empty(host, table_id, page_size).await,
        RecordScope::CurrentView => current_view_records(host, table_id, page_size).await,
    }
}
