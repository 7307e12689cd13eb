//! Bidirectional conversion between typed scalars and CQL literals.
//!
//! Every logical type has a bijective encode/decode rule:
//!
//! - integers render as decimal ASCII; parse failures distinguish
//!   out-of-range from malformed input instead of clamping
//! - floats render via Rust's shortest round-trip formatting, so
//!   `decode(encode(v)) == v` bit-for-bit
//! - decimals pass through as their native string representation
//! - text is single-quoted with embedded quotes doubled
//! - blobs render as `0x`-prefixed lowercase hex
//! - dates/times render as quoted `YYYY-MM-DD` / `HH:MM:SS`; timestamps
//!   as unquoted milliseconds since the Unix epoch (UTC both directions)
//!
//! A value that has no dedicated codec for its column's logical type
//! falls back to the quoted-text path rather than failing, which keeps
//! the statement builder total.

use crate::models::{CqlType, Value};
use crate::{Error, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Utc};
use std::num::IntErrorKind;

/// The literal emitted for an absent or explicitly null scalar.
pub const NULL_LITERAL: &str = "NULL";

/// Returns the CQL type name for a logical type.
#[must_use]
pub const fn cql_type_name(ty: CqlType) -> &'static str {
    match ty {
        CqlType::TinyInt => "tinyint",
        CqlType::SmallInt => "smallint",
        CqlType::Int => "int",
        CqlType::BigInt => "bigint",
        CqlType::Float => "float",
        CqlType::Double => "double",
        CqlType::Decimal => "decimal",
        CqlType::Text => "text",
        CqlType::Blob => "blob",
        CqlType::Date => "date",
        CqlType::Time => "time",
        CqlType::Timestamp => "timestamp",
        CqlType::Boolean => "boolean",
    }
}

/// Escapes a string for embedding in a single-quoted CQL literal.
///
/// Every embedded single quote is doubled (`'` → `''`). This is the
/// injection barrier for all text-path literals: statements carry no
/// placeholders, so every value is inlined through here.
///
/// # Examples
///
/// ```
/// use cqlbridge::translate::types::escape_cql_string;
///
/// assert_eq!(escape_cql_string("O'Brien"), "O''Brien");
/// assert_eq!(escape_cql_string("no quotes"), "no quotes");
/// ```
#[must_use]
pub fn escape_cql_string(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        if c == '\'' {
            result.push('\'');
        }
        result.push(c);
    }
    result
}

/// Wraps a string in single quotes after escaping it.
#[must_use]
pub fn quote_cql_string(s: &str) -> String {
    format!("'{}'", escape_cql_string(s))
}

// Quoted-text rendering: the lenient path for Text columns and for any
// value/type combination without a dedicated codec.
fn encode_as_text(value: &Value) -> String {
    quote_cql_string(&value.as_plain_text())
}

fn encode_integer(value: &Value, min: i64, max: i64, cql_type: &'static str) -> Result<String> {
    let Some(v) = value.as_i64() else {
        tracing::debug!(cql_type, "non-integer value on integer column, using text path");
        return Ok(encode_as_text(value));
    };
    if v < min || v > max {
        return Err(Error::OutOfRange {
            text: v.to_string(),
            cql_type,
        });
    }
    Ok(v.to_string())
}

/// Encodes a scalar as a CQL literal for a column of the given type.
///
/// `None` (absent or explicitly null) always encodes as the unquoted
/// literal `NULL`.
///
/// # Errors
///
/// Returns [`Error::OutOfRange`] when an integer value does not fit the
/// column's width. All other mismatches degrade to the quoted-text path.
pub fn encode_value(value: Option<&Value>, ty: CqlType) -> Result<String> {
    let Some(value) = value else {
        return Ok(NULL_LITERAL.to_string());
    };

    let literal = match ty {
        CqlType::TinyInt => {
            return encode_integer(value, i64::from(i8::MIN), i64::from(i8::MAX), "tinyint");
        }
        CqlType::SmallInt => {
            return encode_integer(value, i64::from(i16::MIN), i64::from(i16::MAX), "smallint");
        }
        CqlType::Int => {
            return encode_integer(value, i64::from(i32::MIN), i64::from(i32::MAX), "int");
        }
        CqlType::BigInt => return encode_integer(value, i64::MIN, i64::MAX, "bigint"),

        CqlType::Float | CqlType::Double => match value.as_f64() {
            // Shortest round-trip formatting preserves full precision.
            Some(v) => v.to_string(),
            None => encode_as_text(value),
        },

        // Native string representation, never reformatted.
        CqlType::Decimal => match value {
            Value::Decimal(_)
            | Value::TinyInt(_)
            | Value::SmallInt(_)
            | Value::Int(_)
            | Value::BigInt(_)
            | Value::Float(_)
            | Value::Double(_) => value.as_plain_text(),
            other => encode_as_text(other),
        },

        CqlType::Text => encode_as_text(value),

        CqlType::Blob => match value {
            Value::Blob(bytes) => format!("0x{}", hex::encode(bytes)),
            // Character data on a blob column keeps the text encoding;
            // binary vs character is a property of the value.
            other => encode_as_text(other),
        },

        CqlType::Date => match value {
            Value::Date(d) => format!("'{}'", d.format("%Y-%m-%d")),
            Value::Timestamp(ts) => format!("'{}'", ts.date().format("%Y-%m-%d")),
            other => encode_as_text(other),
        },

        CqlType::Time => match value {
            Value::Time(t) => format!("'{:02}:{:02}:{:02}'", t.hour(), t.minute(), t.second()),
            other => encode_as_text(other),
        },

        CqlType::Timestamp => match value {
            Value::Timestamp(ts) => ts.and_utc().timestamp_millis().to_string(),
            // Already milliseconds since epoch.
            Value::BigInt(ms) => ms.to_string(),
            Value::Date(d) => d
                .and_time(NaiveTime::MIN)
                .and_utc()
                .timestamp_millis()
                .to_string(),
            other => encode_as_text(other),
        },

        CqlType::Boolean => match value.as_i64() {
            Some(v) => (v != 0).to_string(),
            None => encode_as_text(value),
        },
    };

    Ok(literal)
}

fn parse_i64(text: &str, cql_type: &'static str) -> Result<i64> {
    text.parse::<i64>().map_err(|e| {
        if matches!(e.kind(), IntErrorKind::PosOverflow | IntErrorKind::NegOverflow) {
            Error::OutOfRange {
                text: text.to_string(),
                cql_type,
            }
        } else {
            Error::Malformed {
                text: text.to_string(),
                cql_type,
            }
        }
    })
}

fn narrow<T>(v: i64, text: &str, cql_type: &'static str) -> Result<T>
where
    T: TryFrom<i64>,
{
    T::try_from(v).map_err(|_| Error::OutOfRange {
        text: text.to_string(),
        cql_type,
    })
}

// Tolerant numeric-component parser for date/time patterns: splits on the
// separator, parses each piece, and ignores a fractional tail on the last
// component (drivers may return HH:MM:SS.ffffff).
fn split_components(text: &str, sep: char, count: usize, cql_type: &'static str) -> Result<Vec<u32>> {
    let parts: Vec<&str> = text.splitn(count, sep).collect();
    if parts.len() != count {
        return Err(Error::Malformed {
            text: text.to_string(),
            cql_type,
        });
    }
    parts
        .iter()
        .map(|p| {
            let digits = p.split('.').next().unwrap_or(p);
            digits.parse::<u32>().map_err(|_| Error::Malformed {
                text: text.to_string(),
                cql_type,
            })
        })
        .collect()
}

fn decode_date(text: &str) -> Result<Value> {
    let parts = split_components(text, '-', 3, "date")?;
    let date = NaiveDate::from_ymd_opt(
        i32::try_from(parts[0]).map_err(|_| Error::OutOfRange {
            text: text.to_string(),
            cql_type: "date",
        })?,
        parts[1],
        parts[2],
    )
    .ok_or_else(|| Error::OutOfRange {
        text: text.to_string(),
        cql_type: "date",
    })?;
    Ok(Value::Date(date))
}

fn decode_time(text: &str) -> Result<Value> {
    let parts = split_components(text, ':', 3, "time")?;
    let time = NaiveTime::from_hms_opt(parts[0], parts[1], parts[2]).ok_or_else(|| {
        Error::OutOfRange {
            text: text.to_string(),
            cql_type: "time",
        }
    })?;
    Ok(Value::Time(time))
}

fn decode_timestamp(text: &str) -> Result<Value> {
    // Milliseconds since epoch, converted via UTC. If the driver ever
    // returns an ISO-8601 string instead, keep the raw text verbatim.
    let Ok(millis) = text.parse::<i64>() else {
        tracing::warn!(text, "non-numeric timestamp cell, keeping raw text");
        metrics::counter!("cqlbridge_timestamp_text_fallback_total").increment(1);
        return Ok(Value::Text(text.to_string()));
    };
    let ts: NaiveDateTime = DateTime::<Utc>::from_timestamp_millis(millis)
        .ok_or_else(|| Error::OutOfRange {
            text: text.to_string(),
            cql_type: "timestamp",
        })?
        .naive_utc();
    Ok(Value::Timestamp(ts))
}

fn decode_blob(text: &str) -> Result<Value> {
    let hex_digits = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .ok_or_else(|| Error::Malformed {
            text: text.to_string(),
            cql_type: "blob",
        })?;
    let bytes = hex::decode(hex_digits).map_err(|_| Error::Malformed {
        text: text.to_string(),
        cql_type: "blob",
    })?;
    Ok(Value::Blob(bytes))
}

/// Decodes a textual result cell into a typed scalar.
///
/// The literal `NULL` and the empty string both decode to `None`
/// ("field is null"). The cell is expected to be already unwrapped by the
/// driver; no quote stripping is applied.
///
/// # Errors
///
/// Returns [`Error::OutOfRange`] when a numeric cell exceeds the
/// destination type's range and [`Error::Malformed`] when the text cannot
/// be parsed as the destination type at all.
pub fn decode_value(text: &str, ty: CqlType) -> Result<Option<Value>> {
    if text.is_empty() || text == NULL_LITERAL {
        return Ok(None);
    }

    let value = match ty {
        CqlType::TinyInt => Value::TinyInt(narrow(parse_i64(text, "tinyint")?, text, "tinyint")?),
        CqlType::SmallInt => {
            Value::SmallInt(narrow(parse_i64(text, "smallint")?, text, "smallint")?)
        }
        CqlType::Int => Value::Int(narrow(parse_i64(text, "int")?, text, "int")?),
        CqlType::BigInt => Value::BigInt(parse_i64(text, "bigint")?),

        CqlType::Float => Value::Float(text.parse::<f32>().map_err(|_| Error::Malformed {
            text: text.to_string(),
            cql_type: "float",
        })?),
        CqlType::Double => Value::Double(text.parse::<f64>().map_err(|_| Error::Malformed {
            text: text.to_string(),
            cql_type: "double",
        })?),

        // Stored verbatim; the field keeps its native scale.
        CqlType::Decimal => Value::Decimal(text.to_string()),

        CqlType::Text => Value::Text(text.to_string()),
        CqlType::Blob => decode_blob(text)?,
        CqlType::Date => decode_date(text)?,
        CqlType::Time => decode_time(text)?,
        CqlType::Timestamp => decode_timestamp(text)?,

        CqlType::Boolean => Value::Boolean(text == "true" || text == "1"),
    };

    Ok(Some(value))
}
