//! CQL statement assembly.
//!
//! Pure functions from (schema, row/key) to statement text. Every scalar
//! literal goes through [`crate::translate::types`], so the quoting and
//! escaping rules live in exactly one place. Identifiers are emitted
//! unquoted and verbatim; the backing store's default casing rule applies.

use crate::models::{Row, TableSchema, Value};
use crate::Result;
use crate::translate::types;

/// An equality conjunction over primary-key columns.
///
/// Built either from a full row (extracting the primary-key columns) or
/// from an ordered prefix of key parts supplied by an index lookup. Parts
/// keep schema key order.
#[derive(Debug, Clone, Default)]
pub struct KeyPredicate {
    parts: Vec<(String, Value)>,
}

impl KeyPredicate {
    /// Creates an empty predicate.
    #[must_use]
    pub const fn new() -> Self {
        Self { parts: Vec::new() }
    }

    /// Extracts the key predicate from a full row.
    ///
    /// Walks the schema's primary-key columns in order and stops at the
    /// first column the row has no value for, so a partially-populated
    /// row yields a prefix predicate rather than an invalid one.
    #[must_use]
    pub fn from_row(schema: &TableSchema, row: &Row) -> Self {
        let mut parts = Vec::new();
        for column in schema.primary_key_columns() {
            let Some(value) = row.get(&column.name) else {
                break;
            };
            parts.push((column.name.clone(), value.clone()));
        }
        Self { parts }
    }

    /// Builds a prefix predicate from ordered key parts.
    ///
    /// `key_parts` aligns positionally with the schema's primary-key
    /// columns; a `None` part ends the prefix. A partial-key scan may
    /// supply fewer parts than the full key.
    #[must_use]
    pub fn from_key_parts(schema: &TableSchema, key_parts: &[Option<Value>]) -> Self {
        let mut parts = Vec::new();
        for (column, part) in schema.primary_key_columns().iter().zip(key_parts) {
            let Some(value) = part else {
                break;
            };
            parts.push((column.name.clone(), value.clone()));
        }
        Self { parts }
    }

    /// Returns the (column, value) pairs in key order.
    #[must_use]
    pub fn parts(&self) -> &[(String, Value)] {
        &self.parts
    }

    /// Returns `true` when no key part is present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }
}

/// Returns `true` when the clause contains something other than whitespace.
///
/// WHERE emission is skipped entirely for empty or whitespace-only
/// clauses, so a keyless scan degrades to a full-table SELECT instead of
/// invalid CQL.
#[must_use]
pub fn has_where_clause(clause: &str) -> bool {
    !clause.trim().is_empty()
}

// Canonical projection: every column, schema order.
fn column_list(schema: &TableSchema) -> String {
    schema
        .columns()
        .iter()
        .map(|c| c.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

fn encode_column(schema: &TableSchema, row: &Row, name: &str) -> Result<String> {
    // Unknown column: the text path keeps the builder total.
    let ty = schema
        .column(name)
        .map_or(crate::models::CqlType::Text, |c| c.cql_type);
    types::encode_value(row.get(name), ty)
}

/// Builds a `CREATE TABLE IF NOT EXISTS` statement.
///
/// Columns appear in schema order; the PRIMARY KEY list is the ordered
/// set of key-role columns, falling back to the first column when none
/// are marked.
#[must_use]
pub fn build_create_table(schema: &TableSchema) -> String {
    let mut columns: Vec<String> = schema
        .columns()
        .iter()
        .map(|c| format!("{} {}", c.name, types::cql_type_name(c.cql_type)))
        .collect();

    let pk: Vec<&str> = schema
        .primary_key_columns()
        .iter()
        .map(|c| c.name.as_str())
        .collect();
    if !pk.is_empty() {
        columns.push(format!("PRIMARY KEY ({})", pk.join(", ")));
    }

    format!(
        "CREATE TABLE IF NOT EXISTS {} ({})",
        schema.qualified_name(),
        columns.join(", ")
    )
}

/// Builds a `CREATE KEYSPACE IF NOT EXISTS` statement with simple
/// single-replica placement.
#[must_use]
pub fn build_create_keyspace(keyspace: &str) -> String {
    format!(
        "CREATE KEYSPACE IF NOT EXISTS {keyspace} WITH replication = \
         {{'class': 'SimpleStrategy', 'replication_factor': 1}}"
    )
}

/// Builds a `DROP TABLE IF EXISTS` statement.
#[must_use]
pub fn build_drop_table(schema: &TableSchema) -> String {
    format!("DROP TABLE IF EXISTS {}", schema.qualified_name())
}

/// Builds a `TRUNCATE` statement.
#[must_use]
pub fn build_truncate(schema: &TableSchema) -> String {
    format!("TRUNCATE {}", schema.qualified_name())
}

/// Builds an `INSERT` covering every schema column.
///
/// Column list and value list both iterate schema order, so they stay
/// positionally aligned; absent columns insert `NULL` rather than being
/// omitted.
///
/// # Errors
///
/// Returns a conversion error if any scalar cannot be encoded.
pub fn build_insert(schema: &TableSchema, row: &Row) -> Result<String> {
    let values: Vec<String> = schema
        .columns()
        .iter()
        .map(|c| encode_column(schema, row, &c.name))
        .collect::<Result<_>>()?;

    Ok(format!(
        "INSERT INTO {} ({}) VALUES ({})",
        schema.qualified_name(),
        column_list(schema),
        values.join(", ")
    ))
}

/// Builds an `UPDATE` statement.
///
/// The SET clause enumerates every non-primary-key column from `new_row`;
/// the WHERE clause is the key predicate extracted from `old_row`, the
/// pre-update identity. A key value cannot appear in the SET list, so
/// identity columns are always excluded there.
///
/// # Errors
///
/// Returns a conversion error if any scalar cannot be encoded.
pub fn build_update(schema: &TableSchema, old_row: &Row, new_row: &Row) -> Result<String> {
    let assignments: Vec<String> = schema
        .columns()
        .iter()
        .filter(|c| !schema.is_primary_key_column(&c.name))
        .map(|c| Ok(format!("{} = {}", c.name, encode_column(schema, new_row, &c.name)?)))
        .collect::<Result<_>>()?;

    let predicate = KeyPredicate::from_row(schema, old_row);

    Ok(format!(
        "UPDATE {} SET {} WHERE {}",
        schema.qualified_name(),
        assignments.join(", "),
        build_where(schema, &predicate)?
    ))
}

/// Builds a `DELETE` keyed by the row's primary key.
///
/// # Errors
///
/// Returns a conversion error if a key scalar cannot be encoded.
pub fn build_delete(schema: &TableSchema, row: &Row) -> Result<String> {
    let predicate = KeyPredicate::from_row(schema, row);
    Ok(format!(
        "DELETE FROM {} WHERE {}",
        schema.qualified_name(),
        build_where(schema, &predicate)?
    ))
}

/// Builds a `SELECT` over the canonical column list.
///
/// The WHERE keyword is omitted entirely when `where_clause` is absent,
/// empty, or whitespace-only. `ALLOW FILTERING` is appended when
/// requested; whether to request it is the caller's policy.
#[must_use]
pub fn build_select(
    schema: &TableSchema,
    where_clause: Option<&str>,
    allow_filtering: bool,
) -> String {
    let mut cql = format!(
        "SELECT {} FROM {}",
        column_list(schema),
        schema.qualified_name()
    );

    if let Some(clause) = where_clause {
        if has_where_clause(clause) {
            cql.push_str(" WHERE ");
            cql.push_str(clause.trim());
        }
    }

    if allow_filtering {
        cql.push_str(" ALLOW FILTERING");
    }

    cql
}

/// Renders a key predicate as an `AND`-joined equality conjunction.
///
/// An empty predicate renders as an empty string, which [`build_select`]
/// then drops.
///
/// # Errors
///
/// Returns a conversion error if a key scalar cannot be encoded.
pub fn build_where(schema: &TableSchema, predicate: &KeyPredicate) -> Result<String> {
    let clauses: Vec<String> = predicate
        .parts()
        .iter()
        .map(|(name, value)| {
            let ty = schema
                .column(name)
                .map_or(crate::models::CqlType::Text, |c| c.cql_type);
            Ok(format!("{} = {}", name, types::encode_value(Some(value), ty)?))
        })
        .collect::<Result<_>>()?;
    Ok(clauses.join(" AND "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ColumnDescriptor, ColumnRole, CqlType};

    fn schema() -> TableSchema {
        TableSchema::new("ks", "t")
            .with_column(
                ColumnDescriptor::new("id", CqlType::BigInt).with_role(ColumnRole::PartitionKey),
            )
            .with_column(ColumnDescriptor::new("name", CqlType::Text))
    }

    fn composite_schema() -> TableSchema {
        TableSchema::new("ks", "events")
            .with_column(
                ColumnDescriptor::new("tenant", CqlType::Int).with_role(ColumnRole::PartitionKey),
            )
            .with_column(
                ColumnDescriptor::new("seq", CqlType::BigInt).with_role(ColumnRole::ClusteringKey),
            )
            .with_column(ColumnDescriptor::new("payload", CqlType::Text))
    }

    #[test]
    fn test_create_table_shape() {
        assert_eq!(
            build_create_table(&schema()),
            "CREATE TABLE IF NOT EXISTS ks.t (id bigint, name text, PRIMARY KEY (id))"
        );
    }

    #[test]
    fn test_create_table_composite_key() {
        assert_eq!(
            build_create_table(&composite_schema()),
            "CREATE TABLE IF NOT EXISTS ks.events \
             (tenant int, seq bigint, payload text, PRIMARY KEY (tenant, seq))"
        );
    }

    #[test]
    fn test_create_table_first_column_fallback() {
        let schema = TableSchema::new("ks", "t")
            .with_column(ColumnDescriptor::new("a", CqlType::Int))
            .with_column(ColumnDescriptor::new("b", CqlType::Text));
        assert_eq!(
            build_create_table(&schema),
            "CREATE TABLE IF NOT EXISTS ks.t (a int, b text, PRIMARY KEY (a))"
        );
    }

    #[test]
    fn test_create_keyspace() {
        assert_eq!(
            build_create_keyspace("ks"),
            "CREATE KEYSPACE IF NOT EXISTS ks WITH replication = \
             {'class': 'SimpleStrategy', 'replication_factor': 1}"
        );
    }

    #[test]
    fn test_insert_with_embedded_quote() {
        let mut row = Row::new();
        row.set("id", Value::BigInt(7));
        row.set("name", Value::Text("O'Brien".to_string()));
        assert_eq!(
            build_insert(&schema(), &row).unwrap(),
            "INSERT INTO ks.t (id, name) VALUES (7, 'O''Brien')"
        );
    }

    #[test]
    fn test_insert_absent_column_is_null() {
        let mut row = Row::new();
        row.set("id", Value::BigInt(1));
        assert_eq!(
            build_insert(&schema(), &row).unwrap(),
            "INSERT INTO ks.t (id, name) VALUES (1, NULL)"
        );
    }

    #[test]
    fn test_update_excludes_key_from_set() {
        let mut old_row = Row::new();
        old_row.set("id", Value::BigInt(7));
        old_row.set("name", Value::Text("A".to_string()));
        let mut new_row = Row::new();
        new_row.set("id", Value::BigInt(7));
        new_row.set("name", Value::Text("B".to_string()));

        assert_eq!(
            build_update(&schema(), &old_row, &new_row).unwrap(),
            "UPDATE ks.t SET name = 'B' WHERE id = 7"
        );
    }

    #[test]
    fn test_update_where_uses_pre_update_identity() {
        let s = composite_schema();
        let mut old_row = Row::new();
        old_row.set("tenant", Value::Int(3));
        old_row.set("seq", Value::BigInt(11));
        old_row.set("payload", Value::Text("before".to_string()));
        let mut new_row = Row::new();
        new_row.set("tenant", Value::Int(3));
        new_row.set("seq", Value::BigInt(11));
        new_row.set("payload", Value::Text("after".to_string()));

        assert_eq!(
            build_update(&s, &old_row, &new_row).unwrap(),
            "UPDATE ks.events SET payload = 'after' WHERE tenant = 3 AND seq = 11"
        );
    }

    #[test]
    fn test_delete_keyed_by_row() {
        let mut row = Row::new();
        row.set("id", Value::BigInt(9));
        row.set("name", Value::Text("x".to_string()));
        assert_eq!(
            build_delete(&schema(), &row).unwrap(),
            "DELETE FROM ks.t WHERE id = 9"
        );
    }

    #[test]
    fn test_select_omits_empty_where() {
        assert_eq!(
            build_select(&schema(), None, true),
            "SELECT id, name FROM ks.t ALLOW FILTERING"
        );
        assert_eq!(
            build_select(&schema(), Some("   "), false),
            "SELECT id, name FROM ks.t"
        );
    }

    #[test]
    fn test_select_with_where_and_filtering() {
        assert_eq!(
            build_select(&schema(), Some("id = 7"), true),
            "SELECT id, name FROM ks.t WHERE id = 7 ALLOW FILTERING"
        );
    }

    #[test]
    fn test_where_from_partial_key_prefix() {
        let s = composite_schema();
        let predicate =
            KeyPredicate::from_key_parts(&s, &[Some(Value::Int(3)), None]);
        assert_eq!(build_where(&s, &predicate).unwrap(), "tenant = 3");
    }

    #[test]
    fn test_where_from_full_key() {
        let s = composite_schema();
        let predicate =
            KeyPredicate::from_key_parts(&s, &[Some(Value::Int(3)), Some(Value::BigInt(8))]);
        assert_eq!(
            build_where(&s, &predicate).unwrap(),
            "tenant = 3 AND seq = 8"
        );
    }

    #[test]
    fn test_key_prefix_stops_at_gap() {
        // A gap in the key parts ends the prefix even when later parts
        // are present.
        let s = composite_schema();
        let mut row = Row::new();
        row.set("seq", Value::BigInt(8));
        let predicate = KeyPredicate::from_row(&s, &row);
        assert!(predicate.is_empty());
        assert_eq!(build_where(&s, &predicate).unwrap(), "");
    }

    #[test]
    fn test_has_where_clause() {
        assert!(!has_where_clause(""));
        assert!(!has_where_clause(" \t\r\n"));
        assert!(has_where_clause("id = 1"));
    }

    #[test]
    fn test_drop_and_truncate() {
        assert_eq!(build_drop_table(&schema()), "DROP TABLE IF EXISTS ks.t");
        assert_eq!(build_truncate(&schema()), "TRUNCATE ks.t");
    }
}
