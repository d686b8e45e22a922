//! # Error Types
//!
//! This module defines error types used throughout the folio library.
//!
//! Most failures in the designer are recovered locally (empty lists, fallback
//! fetches, aborted drops). The variants here exist so that the recovery sites
//! can log something meaningful and so that callers who do care (the HTTP
//! layer, the CLI) can report it.

use thiserror::Error;

use crate::grid::GridError;

/// Main error type for folio operations
#[derive(Debug, Error)]
pub enum FolioError {
    /// The host data API failed (table, field or record retrieval)
    #[error("Host error: {0}")]
    Host(String),

    /// A drag payload could not be parsed
    #[error("Invalid drag payload: {0}")]
    Payload(String),

    /// User input was rejected (missing template name, no active table)
    #[error("{0}")]
    Validation(String),

    /// A grid structural edit was rejected
    #[error("Grid error: {0}")]
    Grid(#[from] GridError),

    /// Template storage failed
    #[error("Store error: {0}")]
    Store(String),

    /// No component, template or record with the given id
    #[error("Not found: {0}")]
    NotFound(String),

    /// Exchange-rate lookup or currency conversion failed
    #[error("Currency error: {0}")]
    Currency(String),

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error wrapper
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
