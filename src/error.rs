//! # Error Types
//!
//! This module defines error types used throughout the lanyard library.
//!
//! Per-field validation problems (`RequiredFieldMissing`, `InvalidFieldValue`)
//! are not errors in this sense: they are collected as data in a
//! [`ValidationReport`](crate::fields::ValidationReport) and never raised.

use axum::http::StatusCode;
use thiserror::Error;

/// Main error type for lanyard operations
#[derive(Debug, Error)]
pub enum LanyardError {
    /// Two fields in one schema share a name
    #[error("Duplicate field name: {0}")]
    DuplicateFieldName(String),

    /// Field name is empty or contains characters outside `[a-zA-Z0-9_]`
    #[error("Invalid field name: {0:?}")]
    InvalidFieldName(String),

    /// Schema edit targets a field that does not exist
    #[error("Unknown field: {0}")]
    UnknownField(String),

    /// `options` attached to a non-select field, or a select field without options
    #[error("Invalid options on field {field}: {reason}")]
    InvalidFieldOptionsUsage { field: String, reason: String },

    /// Badge request is missing its id, name, or barcode
    #[error("Invalid badge request: {0}")]
    InvalidBadgeRequest(String),

    /// Data cannot be encoded in the barcode symbology
    #[error("Barcode encoding error: {0}")]
    BarcodeEncoding(String),

    /// Record lookup failed
    #[error("{kind} record not found: {id}")]
    RecordNotFound { kind: String, id: String },

    /// Storage or transport failure
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// Document rendering failure
    #[error("Render error: {0}")]
    Render(String),

    /// JSON (de)serialization error wrapper
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl LanyardError {
    /// HTTP status used when this error reaches the API surface.
    pub fn status_code(&self) -> StatusCode {
        match self {
            LanyardError::DuplicateFieldName(_)
            | LanyardError::InvalidFieldName(_)
            | LanyardError::UnknownField(_)
            | LanyardError::InvalidFieldOptionsUsage { .. }
            | LanyardError::BarcodeEncoding(_) => StatusCode::UNPROCESSABLE_ENTITY,
            LanyardError::InvalidBadgeRequest(_) | LanyardError::Json(_) => StatusCode::BAD_REQUEST,
            LanyardError::RecordNotFound { .. } => StatusCode::NOT_FOUND,
            LanyardError::Persistence(_) | LanyardError::Render(_) | LanyardError::Io(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<lopdf::Error> for LanyardError {
    fn from(e: lopdf::Error) -> Self {
        LanyardError::Render(e.to_string())
    }
}
