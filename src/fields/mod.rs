//! # Custom Field Schemas
//!
//! Events define their own data fields for participants, staff, courses,
//! and halls. A [`FieldSchema`] is the ordered list of those definitions;
//! records carry a [`ValueMap`] keyed by field name.
//!
//! ```
//! use lanyard::fields::{FieldDefinition, FieldSchema, FieldType};
//!
//! let mut schema = FieldSchema::default();
//! schema.push(FieldDefinition::new("firstName", FieldType::Text, "First name").required())?;
//! schema.push(FieldDefinition::select("tshirt", "T-shirt", ["S", "M", "L"]))?;
//!
//! // Duplicate names are rejected and leave the schema untouched
//! assert!(schema.push(FieldDefinition::new("tshirt", FieldType::Text, "Size")).is_err());
//! assert_eq!(schema.len(), 2);
//! # Ok::<(), lanyard::LanyardError>(())
//! ```

mod validate;
pub mod value;

pub use validate::{
    FieldError, FieldErrorKind, MISSING_DISPLAY, ValidationReport, display_value, export_row,
    header_row, validate_record,
};
pub use value::{FieldValue, ValueMap};

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::LanyardError;

/// Input type of a custom field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Email,
    Phone,
    Number,
    Date,
    Select,
    Checkbox,
}

impl FieldType {
    /// Value a field takes when the record has no entry for it.
    pub fn default_value(self) -> FieldValue {
        match self {
            FieldType::Checkbox => FieldValue::Bool(false),
            FieldType::Number => FieldValue::Null,
            FieldType::Text
            | FieldType::Email
            | FieldType::Phone
            | FieldType::Date
            | FieldType::Select => FieldValue::Text(String::new()),
        }
    }
}

/// One custom field, as stored in an event's configuration.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FieldDefinition {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub label: String,
    #[serde(default)]
    pub required: bool,
    /// Choices for `select` fields, in display order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
}

impl FieldDefinition {
    pub fn new(name: impl Into<String>, field_type: FieldType, label: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            field_type,
            label: label.into(),
            required: false,
            options: None,
        }
    }

    pub fn select<I, S>(name: impl Into<String>, label: impl Into<String>, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            options: Some(options.into_iter().map(Into::into).collect()),
            ..Self::new(name, FieldType::Select, label)
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Check this definition in isolation (name charset, options usage).
    pub fn check(&self) -> Result<(), LanyardError> {
        if !is_valid_field_name(&self.name) {
            return Err(LanyardError::InvalidFieldName(self.name.clone()));
        }
        match (self.field_type, &self.options) {
            (FieldType::Select, Some(options)) if !options.is_empty() => Ok(()),
            (FieldType::Select, _) => Err(LanyardError::InvalidFieldOptionsUsage {
                field: self.name.clone(),
                reason: "select fields need at least one option".into(),
            }),
            (_, Some(_)) => Err(LanyardError::InvalidFieldOptionsUsage {
                field: self.name.clone(),
                reason: "options are only allowed on select fields".into(),
            }),
            (_, None) => Ok(()),
        }
    }
}

/// `[a-zA-Z0-9_]+`
pub fn is_valid_field_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Ordered list of field definitions with unique names.
///
/// Order controls form and table rendering. Every mutation is checked
/// before it is applied, so a rejected edit leaves the schema as it was.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<FieldDefinition>", into = "Vec<FieldDefinition>")]
pub struct FieldSchema {
    fields: Vec<FieldDefinition>,
}

impl FieldSchema {
    pub fn new(fields: Vec<FieldDefinition>) -> Result<Self, LanyardError> {
        check_fields(&fields)?;
        Ok(Self { fields })
    }

    pub fn fields(&self) -> &[FieldDefinition] {
        &self.fields
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FieldDefinition> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&FieldDefinition> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Append a field at the end.
    pub fn push(&mut self, field: FieldDefinition) -> Result<(), LanyardError> {
        let mut next = self.fields.clone();
        next.push(field);
        self.commit(next)
    }

    /// Replace the field currently named `name`. The replacement may rename it.
    pub fn replace(&mut self, name: &str, field: FieldDefinition) -> Result<(), LanyardError> {
        let index = self.position(name)?;
        let mut next = self.fields.clone();
        next[index] = field;
        self.commit(next)
    }

    /// Remove a field. Values already stored under its name are left alone.
    pub fn remove(&mut self, name: &str) -> Option<FieldDefinition> {
        let index = self.fields.iter().position(|f| f.name == name)?;
        Some(self.fields.remove(index))
    }

    /// Move the field at `from` to index `to`, shifting the others.
    ///
    /// Returns false (and does nothing) when either index is out of range.
    pub fn move_field(&mut self, from: usize, to: usize) -> bool {
        if from >= self.fields.len() || to >= self.fields.len() {
            return false;
        }
        let field = self.fields.remove(from);
        self.fields.insert(to, field);
        true
    }

    fn position(&self, name: &str) -> Result<usize, LanyardError> {
        self.fields
            .iter()
            .position(|f| f.name == name)
            .ok_or_else(|| LanyardError::UnknownField(name.to_string()))
    }

    fn commit(&mut self, next: Vec<FieldDefinition>) -> Result<(), LanyardError> {
        check_fields(&next)?;
        self.fields = next;
        Ok(())
    }
}

fn check_fields(fields: &[FieldDefinition]) -> Result<(), LanyardError> {
    let mut seen = HashSet::new();
    for field in fields {
        field.check()?;
        if !seen.insert(field.name.as_str()) {
            return Err(LanyardError::DuplicateFieldName(field.name.clone()));
        }
    }
    Ok(())
}

impl TryFrom<Vec<FieldDefinition>> for FieldSchema {
    type Error = LanyardError;

    fn try_from(fields: Vec<FieldDefinition>) -> Result<Self, Self::Error> {
        Self::new(fields)
    }
}

impl From<FieldSchema> for Vec<FieldDefinition> {
    fn from(schema: FieldSchema) -> Self {
        schema.fields
    }
}

impl<'a> IntoIterator for &'a FieldSchema {
    type Item = &'a FieldDefinition;
    type IntoIter = std::slice::Iter<'a, FieldDefinition>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}
