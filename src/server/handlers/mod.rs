//! HTTP handlers for the server.

pub mod badges;
pub mod fields;
pub mod layout;
pub mod records;

use axum::http::StatusCode;

use crate::error::LanyardError;
use crate::print::RecordKind;

pub type ApiError = (StatusCode, String);

/// Map a library error onto its HTTP status.
pub fn api_error(e: LanyardError) -> ApiError {
    if e.status_code().is_server_error() {
        tracing::error!(error = %e, "request failed");
    }
    (e.status_code(), e.to_string())
}

pub fn parse_kind(kind: &str) -> Result<RecordKind, ApiError> {
    kind.parse().map_err(|e| (StatusCode::BAD_REQUEST, e))
}
