//! Dynamic record values.
//!
//! Records store their custom field data as an open JSON object. On the Rust
//! side each value is a [`FieldValue`], so the renderer's type switch stays
//! exhaustive while unknown or missing keys still resolve to a default.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Date format used on the wire and for display.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A single stored field value.
///
/// Deserialization is untagged: `null`, booleans, numbers, `YYYY-MM-DD`
/// strings, and any other string map onto the variants in that order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum FieldValue {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    Date(NaiveDate),
    Text(String),
}

impl FieldValue {
    pub fn text(s: impl Into<String>) -> Self {
        FieldValue::Text(s.into())
    }

    /// True for null and for whitespace-only text.
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Null => true,
            FieldValue::Text(s) => s.trim().is_empty(),
            FieldValue::Bool(_) | FieldValue::Number(_) | FieldValue::Date(_) => false,
        }
    }

    /// Plain text form, as substituted into badge text runs.
    ///
    /// Null renders as the empty string.
    pub fn to_text(&self) -> String {
        match self {
            FieldValue::Null => String::new(),
            FieldValue::Bool(true) => "Yes".to_string(),
            FieldValue::Bool(false) => "No".to_string(),
            FieldValue::Number(n) => format_number(*n),
            FieldValue::Date(d) => d.format(DATE_FORMAT).to_string(),
            FieldValue::Text(s) => s.clone(),
        }
    }

    /// Numeric interpretation: numbers, or text that parses as one.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            FieldValue::Text(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
            _ => None,
        }
    }

    /// Date interpretation: dates, or text in `YYYY-MM-DD` form.
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            FieldValue::Date(d) => Some(*d),
            FieldValue::Text(s) => NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).ok(),
            _ => None,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<f64> for FieldValue {
    fn from(n: f64) -> Self {
        FieldValue::Number(n)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Bool(b)
    }
}

impl From<NaiveDate> for FieldValue {
    fn from(d: NaiveDate) -> Self {
        FieldValue::Date(d)
    }
}

/// Integers print without a fractional part (`42`, not `42.0`).
fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

/// Field name → value for one record.
///
/// Keys need not correspond to the current schema: orphaned keys from
/// removed or renamed fields are kept but never rendered.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValueMap(BTreeMap<String, FieldValue>);

impl ValueMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.0.get(name)
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn remove(&mut self, name: &str) -> Option<FieldValue> {
        self.0.remove(name)
    }

    /// Text form of a value, empty when absent.
    pub fn text(&self, name: &str) -> String {
        self.0.get(name).map(FieldValue::to_text).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FieldValue)> {
        self.0.iter()
    }

    /// Builder-style insert, handy for fixtures.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.insert(name, value);
        self
    }
}

impl<K: Into<String>, V: Into<FieldValue>> FromIterator<(K, V)> for ValueMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}
