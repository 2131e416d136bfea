//! Generic validation and display of record values against a schema.
//!
//! Validation is advisory: the report feeds form feedback, it never blocks
//! a write. Display helpers back list tables and exports.

use serde::Serialize;
use std::collections::BTreeMap;

use super::value::{FieldValue, ValueMap};
use super::{FieldDefinition, FieldSchema, FieldType};

/// Placeholder shown in tables and exports when a record has no value.
pub const MISSING_DISPLAY: &str = "-";

/// Kind of per-field problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldErrorKind {
    RequiredFieldMissing,
    InvalidFieldValue,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    pub kind: FieldErrorKind,
    pub message: String,
}

impl FieldError {
    fn missing(field: &FieldDefinition) -> Self {
        Self {
            kind: FieldErrorKind::RequiredFieldMissing,
            message: format!("{} is required", field.label),
        }
    }

    fn invalid(message: String) -> Self {
        Self {
            kind: FieldErrorKind::InvalidFieldValue,
            message,
        }
    }
}

/// Outcome of [`validate_record`].
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ValidationReport {
    /// Current value of every schema field, defaults filled in.
    pub values: ValueMap,
    /// Problems keyed by field name. At most one per field.
    pub errors: BTreeMap<String, FieldError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Validate `values` against `schema`, field by field in schema order.
///
/// Missing fields take their type's default. A required field that is
/// absent, null, or blank yields `RequiredFieldMissing` (an unchecked
/// checkbox counts as answered); a present value of the wrong shape yields
/// `InvalidFieldValue`. Keys outside the schema are ignored.
pub fn validate_record(schema: &FieldSchema, values: &ValueMap) -> ValidationReport {
    let mut report = ValidationReport::default();

    for field in schema {
        let stored = values.get(&field.name);
        let value = stored
            .cloned()
            .unwrap_or_else(|| field.field_type.default_value());

        if stored.is_none_or(FieldValue::is_empty) {
            if field.required {
                report
                    .errors
                    .insert(field.name.clone(), FieldError::missing(field));
            }
        } else if let Some(message) = check_value(field, &value) {
            report
                .errors
                .insert(field.name.clone(), FieldError::invalid(message));
        }

        report.values.insert(field.name.clone(), value);
    }

    report
}

/// Type-specific check for a non-empty value.
fn check_value(field: &FieldDefinition, value: &FieldValue) -> Option<String> {
    match field.field_type {
        FieldType::Email => {
            let ok = matches!(value, FieldValue::Text(s) if is_email(s.trim()));
            (!ok).then(|| format!("{} must be a valid email address", field.label))
        }
        FieldType::Number => value
            .as_number()
            .is_none()
            .then(|| format!("{} must be a number", field.label)),
        FieldType::Date => value
            .as_date()
            .is_none()
            .then(|| format!("{} must be a date (YYYY-MM-DD)", field.label)),
        FieldType::Select => {
            let choice = value.to_text();
            let options = field.options.as_deref().unwrap_or_default();
            (!options.iter().any(|o| *o == choice))
                .then(|| format!("{} must be one of: {}", field.label, options.join(", ")))
        }
        FieldType::Text | FieldType::Phone | FieldType::Checkbox => None,
    }
}

/// `local@domain.tld`: one `@`, no whitespace, a dot inside the domain.
fn is_email(s: &str) -> bool {
    if s.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = s.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty() && !host.ends_with('.'),
        None => false,
    }
}

/// Table/export cell for one field: the value's text, or `"-"` when the
/// record has no entry for it.
pub fn display_value(values: &ValueMap, field: &FieldDefinition) -> String {
    match values.get(&field.name) {
        None | Some(FieldValue::Null) => MISSING_DISPLAY.to_string(),
        Some(value) => value.to_text(),
    }
}

/// Column headers (field labels) in schema order.
pub fn header_row(schema: &FieldSchema) -> Vec<String> {
    schema.iter().map(|f| f.label.clone()).collect()
}

/// One export row: display cells in schema order.
pub fn export_row(schema: &FieldSchema, values: &ValueMap) -> Vec<String> {
    schema.iter().map(|f| display_value(values, f)).collect()
}
