//! Custom field schema handlers.

use axum::Json;
use serde::{Deserialize, Serialize};

use crate::fields::{
    FieldDefinition, FieldSchema, ValidationReport, ValueMap, export_row, header_row,
    validate_record,
};

use super::{ApiError, api_error};

/// POST /api/fields/schema - check a schema and echo it back.
pub async fn schema(
    Json(fields): Json<Vec<FieldDefinition>>,
) -> Result<Json<FieldSchema>, ApiError> {
    let schema = FieldSchema::new(fields).map_err(api_error)?;
    Ok(Json(schema))
}

#[derive(Debug, Deserialize)]
pub struct ValidateRequest {
    pub schema: Vec<FieldDefinition>,
    #[serde(default)]
    pub values: ValueMap,
}

/// POST /api/fields/validate - validate one record's values.
pub async fn validate(
    Json(req): Json<ValidateRequest>,
) -> Result<Json<ValidationReport>, ApiError> {
    let schema = FieldSchema::new(req.schema).map_err(api_error)?;
    Ok(Json(validate_record(&schema, &req.values)))
}

#[derive(Debug, Deserialize)]
pub struct ExportRequest {
    pub schema: Vec<FieldDefinition>,
    #[serde(default)]
    pub records: Vec<ValueMap>,
}

#[derive(Debug, Serialize)]
pub struct ExportTable {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// POST /api/fields/export - tabulate records for export.
pub async fn export(Json(req): Json<ExportRequest>) -> Result<Json<ExportTable>, ApiError> {
    let schema = FieldSchema::new(req.schema).map_err(api_error)?;
    let rows = req
        .records
        .iter()
        .map(|values| export_row(&schema, values))
        .collect();
    Ok(Json(ExportTable {
        header: header_row(&schema),
        rows,
    }))
}
