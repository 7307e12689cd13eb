//! Typed scalar values and row records.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use std::collections::BTreeMap;
use std::fmt;

/// A typed scalar value.
///
/// One variant per logical type the translation layer round-trips.
/// `Decimal` keeps the literal text verbatim so the column's scale is
/// never reformatted; `Blob` vs `Text` is what distinguishes binary from
/// character data on the wire.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Boolean value.
    Boolean(bool),
    /// 8-bit signed integer.
    TinyInt(i8),
    /// 16-bit signed integer.
    SmallInt(i16),
    /// 32-bit signed integer.
    Int(i32),
    /// 64-bit signed integer.
    BigInt(i64),
    /// 32-bit floating point.
    Float(f32),
    /// 64-bit floating point.
    Double(f64),
    /// Decimal, carried as its native string representation.
    Decimal(String),
    /// Text value.
    Text(String),
    /// Binary blob.
    Blob(Vec<u8>),
    /// Calendar date.
    Date(NaiveDate),
    /// Time of day.
    Time(NaiveTime),
    /// Point in time. Calendar fields are interpreted as UTC.
    Timestamp(NaiveDateTime),
}

impl Value {
    /// Returns the value widened to `i64` when it is integer-like.
    ///
    /// Booleans widen to 0/1.
    #[must_use]
    pub const fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Boolean(b) => Some(*b as i64),
            Self::TinyInt(v) => Some(*v as i64),
            Self::SmallInt(v) => Some(*v as i64),
            Self::Int(v) => Some(*v as i64),
            Self::BigInt(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the value widened to `f64` when it is numeric.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(v) => Some(f64::from(*v)),
            Self::Double(v) => Some(*v),
            other => other.as_i64().map(|v| v as f64),
        }
    }

    /// Returns the unquoted, unescaped textual form of the value.
    ///
    /// This is the text-path rendering used both for `Text` columns and as
    /// the lenient fallback for value/type combinations with no dedicated
    /// codec.
    #[must_use]
    pub fn as_plain_text(&self) -> String {
        match self {
            Self::Boolean(b) => b.to_string(),
            Self::TinyInt(v) => v.to_string(),
            Self::SmallInt(v) => v.to_string(),
            Self::Int(v) => v.to_string(),
            Self::BigInt(v) => v.to_string(),
            Self::Float(v) => v.to_string(),
            Self::Double(v) => v.to_string(),
            Self::Decimal(s) | Self::Text(s) => s.clone(),
            Self::Blob(b) => format!("0x{}", hex::encode(b)),
            Self::Date(d) => d.format("%Y-%m-%d").to_string(),
            Self::Time(t) => t.format("%H:%M:%S").to_string(),
            Self::Timestamp(ts) => ts.and_utc().timestamp_millis().to_string(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_plain_text())
    }
}

/// A row record: column name → optional typed scalar.
///
/// Absence, explicit null, and a value are three distinct states. Both
/// absent and explicitly-null columns render as the literal `NULL` on the
/// write path; the distinction matters to callers inspecting a
/// materialized row. Created transiently per operation; the translation
/// layer never retains one beyond a call.
#[derive(Debug, Clone, Default)]
pub struct Row {
    // Keyed by lowercase name so lookups match the schema's
    // case-insensitive comparison rule.
    values: BTreeMap<String, Option<Value>>,
}

impl Row {
    /// Creates an empty row.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a column to a value.
    pub fn set(&mut self, column: &str, value: Value) {
        self.values.insert(column.to_ascii_lowercase(), Some(value));
    }

    /// Sets a column to explicit null.
    pub fn set_null(&mut self, column: &str) {
        self.values.insert(column.to_ascii_lowercase(), None);
    }

    /// Returns the value of a column, if present and non-null.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.values
            .get(&column.to_ascii_lowercase())
            .and_then(Option::as_ref)
    }

    /// Returns `true` if the column is present but explicitly null.
    #[must_use]
    pub fn is_null(&self, column: &str) -> bool {
        matches!(self.values.get(&column.to_ascii_lowercase()), Some(None))
    }

    /// Returns `true` if the column is absent from the row entirely.
    #[must_use]
    pub fn is_absent(&self, column: &str) -> bool {
        !self.values.contains_key(&column.to_ascii_lowercase())
    }

    /// Number of columns present (including explicit nulls).
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if no columns are present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_vs_null_vs_value() {
        let mut row = Row::new();
        row.set("a", Value::Int(1));
        row.set_null("b");

        assert_eq!(row.get("a"), Some(&Value::Int(1)));
        assert!(!row.is_null("a"));
        assert!(!row.is_absent("a"));

        assert_eq!(row.get("b"), None);
        assert!(row.is_null("b"));
        assert!(!row.is_absent("b"));

        assert_eq!(row.get("c"), None);
        assert!(!row.is_null("c"));
        assert!(row.is_absent("c"));

        assert_eq!(row.len(), 2);
    }

    #[test]
    fn test_case_insensitive_access() {
        let mut row = Row::new();
        row.set("Name", Value::Text("x".to_string()));
        assert_eq!(row.get("NAME"), Some(&Value::Text("x".to_string())));
        assert_eq!(row.get("name"), Some(&Value::Text("x".to_string())));
    }

    #[test]
    fn test_as_i64_widening() {
        assert_eq!(Value::TinyInt(-5).as_i64(), Some(-5));
        assert_eq!(Value::Boolean(true).as_i64(), Some(1));
        assert_eq!(Value::BigInt(i64::MAX).as_i64(), Some(i64::MAX));
        assert_eq!(Value::Text("7".to_string()).as_i64(), None);
    }

    #[test]
    fn test_plain_text_forms() {
        assert_eq!(Value::Boolean(false).as_plain_text(), "false");
        assert_eq!(Value::Blob(vec![0xde, 0xad]).as_plain_text(), "0xdead");
        assert_eq!(
            Value::Decimal("12.340".to_string()).as_plain_text(),
            "12.340"
        );
        let d = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        assert_eq!(Value::Date(d).as_plain_text(), "2024-03-07");
    }
}
