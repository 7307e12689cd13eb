//! Decoding textual result rows into typed row records.
//!
//! The remote side's column order is not guaranteed to match schema order
//! or completeness, so mapping is by case-insensitive column name, never
//! by position.

use crate::models::{Row, TableSchema};
use crate::translate::types;
use crate::{Error, Result};
use std::collections::HashMap;

/// Policy for cells that fail type conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecodeMode {
    /// Null-fill the destination column and keep going. The whole row
    /// always materializes; each bad cell is logged and counted.
    #[default]
    NullFill,
    /// Surface the first per-cell conversion error to the caller.
    Strict,
}

/// Materializes one result row into a typed [`Row`].
///
/// Builds a case-insensitive name → position index over `column_names`,
/// then decodes the matching cell for every schema column. Columns the
/// remote side did not return are set to explicit null.
///
/// # Errors
///
/// In [`DecodeMode::Strict`], returns the first cell's conversion error.
/// [`DecodeMode::NullFill`] never fails.
pub fn materialize(
    column_names: &[String],
    cells: &[String],
    schema: &TableSchema,
    mode: DecodeMode,
) -> Result<Row> {
    let positions: HashMap<String, usize> = column_names
        .iter()
        .enumerate()
        .map(|(i, name)| (name.to_ascii_lowercase(), i))
        .collect();

    let mut row = Row::new();
    for column in schema.columns() {
        let cell = positions
            .get(&column.name.to_ascii_lowercase())
            .and_then(|&i| cells.get(i));

        let Some(cell) = cell else {
            row.set_null(&column.name);
            continue;
        };

        match types::decode_value(cell, column.cql_type) {
            Ok(Some(value)) => row.set(&column.name, value),
            Ok(None) => row.set_null(&column.name),
            Err(err) => match mode {
                DecodeMode::Strict => return Err(err),
                DecodeMode::NullFill => {
                    tracing::warn!(
                        column = %column.name,
                        %err,
                        "undecodable cell, storing null"
                    );
                    metrics::counter!("cqlbridge_null_filled_cells_total").increment(1);
                    row.set_null(&column.name);
                }
            },
        }
    }

    Ok(row)
}

/// Strict variant that checks the row is rectangular with its column list.
///
/// # Errors
///
/// Returns [`Error::Execution`] when the cell count does not match the
/// column-name count, plus any error [`materialize`] reports.
pub fn materialize_checked(
    column_names: &[String],
    cells: &[String],
    schema: &TableSchema,
    mode: DecodeMode,
) -> Result<Row> {
    if column_names.len() != cells.len() {
        return Err(Error::Execution {
            statement: String::new(),
            cause: format!(
                "result row has {} cells for {} columns",
                cells.len(),
                column_names.len()
            ),
        });
    }
    materialize(column_names, cells, schema, mode)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ColumnDescriptor, ColumnRole, CqlType, Value};

    fn schema() -> TableSchema {
        TableSchema::new("ks", "t")
            .with_column(
                ColumnDescriptor::new("ID", CqlType::BigInt).with_role(ColumnRole::PartitionKey),
            )
            .with_column(ColumnDescriptor::new("Name", CqlType::Text))
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_assigns_by_name_despite_order_and_case() {
        // Remote returns mixed case and reversed order.
        let columns = strings(&["name", "id"]);
        let cells = strings(&["alice", "42"]);

        let row = materialize(&columns, &cells, &schema(), DecodeMode::NullFill).unwrap();
        assert_eq!(row.get("id"), Some(&Value::BigInt(42)));
        assert_eq!(row.get("name"), Some(&Value::Text("alice".to_string())));
    }

    #[test]
    fn test_missing_column_nulls_destination() {
        let columns = strings(&["id"]);
        let cells = strings(&["7"]);

        let row = materialize(&columns, &cells, &schema(), DecodeMode::NullFill).unwrap();
        assert_eq!(row.get("id"), Some(&Value::BigInt(7)));
        assert!(row.is_null("name"));
    }

    #[test]
    fn test_null_literal_and_empty_cells() {
        let columns = strings(&["id", "name"]);

        let row = materialize(
            &columns,
            &strings(&["NULL", ""]),
            &schema(),
            DecodeMode::NullFill,
        )
        .unwrap();
        assert!(row.is_null("id"));
        assert!(row.is_null("name"));
    }

    #[test]
    fn test_null_fill_keeps_row_on_bad_cell() {
        let columns = strings(&["id", "name"]);
        let cells = strings(&["not-a-number", "bob"]);

        let row = materialize(&columns, &cells, &schema(), DecodeMode::NullFill).unwrap();
        assert!(row.is_null("id"));
        assert_eq!(row.get("name"), Some(&Value::Text("bob".to_string())));
    }

    #[test]
    fn test_strict_surfaces_bad_cell() {
        let columns = strings(&["id", "name"]);
        let cells = strings(&["not-a-number", "bob"]);

        let err = materialize(&columns, &cells, &schema(), DecodeMode::Strict).unwrap_err();
        assert!(err.is_conversion());
    }

    #[test]
    fn test_checked_rejects_ragged_row() {
        let columns = strings(&["id", "name"]);
        let cells = strings(&["7"]);

        let err =
            materialize_checked(&columns, &cells, &schema(), DecodeMode::Strict).unwrap_err();
        assert!(matches!(err, Error::Execution { .. }));
    }
}
