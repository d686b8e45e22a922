//! # Currency Conversion
//!
//! Rewrites every value of a currency field into another currency at the
//! current exchange rate, then switches the field's currency code.
//!
//! ```text
//! currency_code(field) == target ──► nothing to do
//!          │
//!          ▼
//! RateSource::rate(from, to)
//!          │
//!          ▼
//! for each record: value × rate, rounded to cents   (failures skipped)
//!          │
//!          ▼
//! set_currency_code(field, target)
//! ```

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::error::FolioError;
use crate::host::{FieldMeta, HostApi, MemoryHost};

/// Host field type code of currency fields.
pub const CURRENCY_FIELD_TYPE: i64 = 99;

/// Public exchange rate endpoint; the base currency is appended.
pub const EXCHANGE_RATE_URL: &str = "https://api.exchangerate-api.com/v4/latest";

/// Exchange rates between currency codes.
#[async_trait]
pub trait RateSource: Send + Sync {
    /// Units of `target` per unit of `base`.
    async fn rate(&self, base: &str, target: &str) -> Result<f64, FolioError>;
}

#[derive(Debug, Deserialize)]
struct RatesResponse {
    rates: HashMap<String, f64>,
}

/// [`RateSource`] backed by exchangerate-api.com.
#[derive(Debug, Clone)]
pub struct ExchangeRateApi {
    client: reqwest::Client,
    base_url: String,
}

impl ExchangeRateApi {
    pub fn new() -> Result<Self, FolioError> {
        Self::with_base_url(EXCHANGE_RATE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, FolioError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("folio/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| FolioError::Currency(format!("HTTP client error: {e}")))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl RateSource for ExchangeRateApi {
    async fn rate(&self, base: &str, target: &str) -> Result<f64, FolioError> {
        let url = format!("{}/{base}", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| FolioError::Currency(format!("Failed to fetch {url}: {e}")))?;
        if !response.status().is_success() {
            return Err(FolioError::Currency(format!(
                "Failed to fetch {url}: HTTP {}",
                response.status()
            )));
        }
        let body: RatesResponse = response
            .json()
            .await
            .map_err(|e| FolioError::Currency(format!("Invalid rate response: {e}")))?;
        body.rates
            .get(target)
            .copied()
            .ok_or_else(|| FolioError::Currency(format!("no rate from {base} to {target}")))
    }
}

/// A host whose tables have currency fields that can be rewritten.
#[async_trait]
pub trait CurrencyHost: HostApi {
    /// Currency fields of a table.
    async fn currency_fields(&self, table_id: &str) -> Result<Vec<FieldMeta>, FolioError>;

    async fn currency_code(&self, table_id: &str, field_id: &str) -> Result<String, FolioError>;

    async fn set_currency_code(
        &self,
        table_id: &str,
        field_id: &str,
        code: &str,
    ) -> Result<(), FolioError>;

    /// Ids of every record of the table.
    async fn record_ids(&self, table_id: &str) -> Result<Vec<String>, FolioError>;

    async fn cell_value(
        &self,
        table_id: &str,
        field_id: &str,
        record_id: &str,
    ) -> Result<Value, FolioError>;

    async fn set_cell_value(
        &self,
        table_id: &str,
        field_id: &str,
        record_id: &str,
        value: f64,
    ) -> Result<(), FolioError>;
}

/// Outcome of a conversion.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversionReport {
    /// Records whose value was rewritten
    pub converted: usize,
    pub rate: f64,
    pub from: String,
    pub to: String,
}

/// Round to two decimal places.
fn to_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Convert every value of a currency field into `target`.
///
/// Records without a non-zero numeric value, and records whose update
/// fails, are left as they are.
pub async fn convert_currency_field(
    host: &dyn CurrencyHost,
    rates: &dyn RateSource,
    table_id: &str,
    field_id: &str,
    target: &str,
) -> Result<ConversionReport, FolioError> {
    let from = host.currency_code(table_id, field_id).await?;
    if from == target {
        info!(table_id, field_id, currency = target, "field already in target currency");
        return Ok(ConversionReport {
            converted: 0,
            rate: 1.0,
            from,
            to: target.to_string(),
        });
    }

    let rate = rates.rate(&from, target).await?;

    let mut converted = 0;
    for record_id in host.record_ids(table_id).await? {
        let value = match host.cell_value(table_id, field_id, &record_id).await {
            Ok(value) => value,
            Err(e) => {
                warn!(record_id = %record_id, error = %e, "failed to read value, skipping");
                continue;
            }
        };
        let Some(amount) = value.as_f64().filter(|v| *v != 0.0) else {
            continue;
        };
        match host
            .set_cell_value(table_id, field_id, &record_id, to_cents(amount * rate))
            .await
        {
            Ok(()) => converted += 1,
            Err(e) => warn!(record_id = %record_id, error = %e, "failed to convert record, skipping"),
        }
    }

    host.set_currency_code(table_id, field_id, target).await?;
    info!(table_id, field_id, %from, to = target, rate, converted, "converted currency field");

    Ok(ConversionReport {
        converted,
        rate,
        from,
        to: target.to_string(),
    })
}

#[async_trait]
impl CurrencyHost for MemoryHost {
    async fn currency_fields(&self, table_id: &str) -> Result<Vec<FieldMeta>, FolioError> {
        self.with_table(table_id, |t| {
            t.fields
                .iter()
                .filter(|f| f.field_type == CURRENCY_FIELD_TYPE || t.currencies.contains_key(&f.id))
                .cloned()
                .collect()
        })
    }

    async fn currency_code(&self, table_id: &str, field_id: &str) -> Result<String, FolioError> {
        self.with_table(table_id, |t| t.currencies.get(field_id).cloned())?
            .ok_or_else(|| FolioError::Currency(format!("{field_id} is not a currency field")))
    }

    async fn set_currency_code(
        &self,
        table_id: &str,
        field_id: &str,
        code: &str,
    ) -> Result<(), FolioError> {
        self.with_table(table_id, |t| {
            t.currencies.insert(field_id.to_string(), code.to_string());
        })
    }

    async fn record_ids(&self, table_id: &str) -> Result<Vec<String>, FolioError> {
        self.with_table(table_id, |t| t.records.iter().map(|r| r.id.clone()).collect())
    }

    async fn cell_value(
        &self,
        table_id: &str,
        field_id: &str,
        record_id: &str,
    ) -> Result<Value, FolioError> {
        self.with_table(table_id, |t| {
            t.records
                .iter()
                .find(|r| r.id == record_id)
                .map(|r| r.value(field_id).clone())
        })?
        .ok_or_else(|| FolioError::Host(format!("no record {record_id} in {table_id}")))
    }

    async fn set_cell_value(
        &self,
        table_id: &str,
        field_id: &str,
        record_id: &str,
        value: f64,
    ) -> Result<(), FolioError> {
        self.with_table(table_id, |t| {
            t.records
                .iter_mut()
                .find(|r| r.id == record_id)
                .map(|r| {
                    r.fields.insert(field_id.to_string(), Value::from(value));
                })
        })?
        .ok_or_else(|| FolioError::Host(format!("no record {record_id} in {table_id}")))
    }
}
