//! HTTP handlers for the server.

pub mod components;
pub mod print;
pub mod records;
pub mod templates;

use axum::http::StatusCode;
use tracing::warn;

use crate::error::FolioError;

/// Map a domain error to a status and message.
pub(crate) fn error_response(e: FolioError) -> (StatusCode, String) {
    let status = match &e {
        FolioError::NotFound(_) => StatusCode::NOT_FOUND,
        FolioError::Payload(_) | FolioError::Validation(_) | FolioError::Grid(_) => {
            StatusCode::BAD_REQUEST
        }
        FolioError::Currency(_) | FolioError::Host(_) => StatusCode::BAD_GATEWAY,
        FolioError::Store(_) | FolioError::Io(_) | FolioError::Json(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    if status.is_server_error() {
        warn!(error = %e, "request failed");
    }
    (status, e.to_string())
}
