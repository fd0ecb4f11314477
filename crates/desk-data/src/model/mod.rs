//! Row and Snapshot Model
//!
//! Typed row model for grid-backed feeds. A `Row` maps field names to
//! scalar [`CellValue`]s and is identified by one designated identity
//! field (by default `"id"`, but callers may name any field, e.g. a
//! ticker symbol).
//!
//! # Design
//!
//! Identity comparison is always stringwise: the identity cell is
//! rendered to its text form and compared against the query. That keeps
//! numeric ids, tickers, and synthetic string keys interchangeable at
//! the lookup sites.
//!
//! Rows are never patched in place. [`Row::merged`] produces a new row,
//! and whole snapshots are replaced wholesale by the session layer so
//! that observers always see a consistent point-in-time view.

use std::collections::BTreeMap;
use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// =============================================================================
// Types
// =============================================================================

/// Default name of the row identity field.
pub const DEFAULT_ID_FIELD: &str = "id";

/// A scalar cell value: text, number, or flag.
///
/// Serializes untagged, so rows round-trip as plain JSON objects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    /// Boolean flag.
    Flag(bool),
    /// Numeric value with financial precision.
    Number(Decimal),
    /// Free-form text.
    Text(String),
}

impl CellValue {
    /// Render the value to its canonical text form.
    ///
    /// Used for stringwise identity comparison; numbers keep their
    /// stored scale (`105.00` stays `"105.00"`).
    #[must_use]
    pub fn render(&self) -> String {
        match self {
            Self::Flag(b) => b.to_string(),
            Self::Number(n) => n.to_string(),
            Self::Text(s) => s.clone(),
        }
    }

    /// Get the numeric value, if this cell holds one.
    #[must_use]
    pub const fn as_number(&self) -> Option<Decimal> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Get the text value, if this cell holds one.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Get the flag value, if this cell holds one.
    #[must_use]
    pub const fn as_flag(&self) -> Option<bool> {
        match self {
            Self::Flag(b) => Some(*b),
            _ => None,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        Self::Flag(value)
    }
}

impl From<Decimal> for CellValue {
    fn from(value: Decimal) -> Self {
        Self::Number(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        Self::Number(Decimal::from(value))
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl CellValue {
    /// Convert a JSON scalar into a cell value.
    ///
    /// Returns `None` for null, arrays, and objects: grid cells hold
    /// scalars only. Numbers are parsed through their decimal text form
    /// so no binary-float precision is introduced.
    #[must_use]
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        use std::str::FromStr;

        match value {
            serde_json::Value::Bool(b) => Some(Self::Flag(*b)),
            serde_json::Value::Number(n) => Decimal::from_str(&n.to_string()).ok().map(Self::Number),
            serde_json::Value::String(s) => Some(Self::Text(s.clone())),
            _ => None,
        }
    }

    /// Convert the cell value to its JSON representation.
    ///
    /// Numbers render as strings to preserve scale, matching the serde
    /// behavior of [`Decimal`].
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Flag(b) => serde_json::Value::Bool(*b),
            Self::Number(n) => serde_json::Value::String(n.to_string()),
            Self::Text(s) => serde_json::Value::String(s.clone()),
        }
    }
}

// =============================================================================
// Row
// =============================================================================

/// A single grid row: field name to scalar value.
///
/// # Example
///
/// ```rust
/// use desk_data::Row;
/// use rust_decimal::Decimal;
///
/// let row = Row::new()
///     .with("ticker", "AAPL")
///     .with("bid", Decimal::new(18245, 2))
///     .with("active", true);
///
/// assert_eq!(row.id_value("ticker").as_deref(), Some("AAPL"));
/// assert_eq!(row.number("bid"), Some(Decimal::new(18245, 2)));
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row(BTreeMap<String, CellValue>);

impl Row {
    /// Create an empty row.
    #[must_use]
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Builder-style field assignment.
    #[must_use]
    pub fn with(mut self, field: impl Into<String>, value: impl Into<CellValue>) -> Self {
        self.0.insert(field.into(), value.into());
        self
    }

    /// Set a field value.
    pub fn set(&mut self, field: impl Into<String>, value: impl Into<CellValue>) {
        self.0.insert(field.into(), value.into());
    }

    /// Get a field value.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&CellValue> {
        self.0.get(field)
    }

    /// Get a text field.
    #[must_use]
    pub fn text(&self, field: &str) -> Option<&str> {
        self.get(field).and_then(CellValue::as_text)
    }

    /// Get a numeric field.
    #[must_use]
    pub fn number(&self, field: &str) -> Option<Decimal> {
        self.get(field).and_then(CellValue::as_number)
    }

    /// Get a flag field.
    #[must_use]
    pub fn flag(&self, field: &str) -> Option<bool> {
        self.get(field).and_then(CellValue::as_flag)
    }

    /// Render the identity field to its text form.
    ///
    /// Returns `None` if the row has no such field.
    #[must_use]
    pub fn id_value(&self, id_field: &str) -> Option<String> {
        self.get(id_field).map(CellValue::render)
    }

    /// Check whether the identity field stringwise-equals `row_id`.
    #[must_use]
    pub fn id_matches(&self, row_id: &str, id_field: &str) -> bool {
        self.id_value(id_field).as_deref() == Some(row_id)
    }

    /// Produce a new row with `updates` shallow-merged over this one.
    ///
    /// Fields present in `updates` win; all other fields are kept. The
    /// receiver is left untouched.
    #[must_use]
    pub fn merged(&self, updates: &Self) -> Self {
        let mut merged = self.clone();
        for (field, value) in &updates.0 {
            merged.0.insert(field.clone(), value.clone());
        }
        merged
    }

    /// Number of fields in the row.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check whether the row has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over `(field, value)` pairs in field order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &CellValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl FromIterator<(String, CellValue)> for Row {
    fn from_iter<T: IntoIterator<Item = (String, CellValue)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

// =============================================================================
// Identity Lookups
// =============================================================================

/// Find the first row whose identity field stringwise-equals `row_id`.
///
/// Identity values are assumed unique within a snapshot; under
/// duplicates the first match wins.
#[must_use]
pub fn find_row_by_id<'a>(rows: &'a [Row], row_id: &str, id_field: &str) -> Option<&'a Row> {
    rows.iter().find(|row| row.id_matches(row_id, id_field))
}

/// Position of the first row whose identity field matches `row_id`.
#[must_use]
pub fn position_by_id(rows: &[Row], row_id: &str, id_field: &str) -> Option<usize> {
    rows.iter().position(|row| row.id_matches(row_id, id_field))
}

// =============================================================================
// Tests
// =============================================================================
