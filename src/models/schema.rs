//! Table schema types: logical column types, roles, and descriptors.

use std::fmt;

/// Logical CQL column type.
///
/// The fixed enumeration of types the translation layer round-trips.
/// `Decimal` carries its scale so encoded literals keep the column's
/// native precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CqlType {
    /// 8-bit signed integer (`tinyint`).
    TinyInt,
    /// 16-bit signed integer (`smallint`).
    SmallInt,
    /// 32-bit signed integer (`int`).
    Int,
    /// 64-bit signed integer (`bigint`).
    BigInt,
    /// 32-bit floating point (`float`).
    Float,
    /// 64-bit floating point (`double`).
    Double,
    /// Arbitrary-precision decimal with a fixed scale (`decimal`).
    Decimal,
    /// Variable-length text (`text`). Also the fallback for enum/set/JSON
    /// style structured text.
    Text,
    /// Binary blob (`blob`), encoded as a `0x`-prefixed hex literal.
    Blob,
    /// Calendar date (`date`), encoded as quoted `YYYY-MM-DD`.
    Date,
    /// Time of day (`time`), encoded as quoted `HH:MM:SS`.
    Time,
    /// Point in time (`timestamp`), encoded as unquoted milliseconds
    /// since the Unix epoch.
    Timestamp,
    /// Boolean (`boolean`), encoded as unquoted `true`/`false`.
    Boolean,
}

impl fmt::Display for CqlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(crate::translate::types::cql_type_name(*self))
    }
}

/// Role a column plays in the table's primary key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColumnRole {
    /// Ordinary non-key column.
    #[default]
    Regular,
    /// Partition-selecting prefix of the primary key.
    PartitionKey,
    /// Ordering suffix of the primary key.
    ClusteringKey,
}

impl ColumnRole {
    /// Returns `true` for either primary-key role.
    #[must_use]
    pub const fn is_key(self) -> bool {
        matches!(self, Self::PartitionKey | Self::ClusteringKey)
    }
}

/// Description of a single table column.
#[derive(Debug, Clone)]
pub struct ColumnDescriptor {
    /// Column name. Unique within the table; compared case-insensitively.
    pub name: String,
    /// Logical type.
    pub cql_type: CqlType,
    /// Whether the column accepts NULL.
    pub nullable: bool,
    /// Primary-key role.
    pub role: ColumnRole,
}

impl ColumnDescriptor {
    /// Creates a nullable regular column.
    #[must_use]
    pub fn new(name: impl Into<String>, cql_type: CqlType) -> Self {
        Self {
            name: name.into(),
            cql_type,
            nullable: true,
            role: ColumnRole::Regular,
        }
    }

    /// Sets the primary-key role.
    #[must_use]
    pub const fn with_role(mut self, role: ColumnRole) -> Self {
        self.role = role;
        self
    }

    /// Marks the column NOT NULL.
    #[must_use]
    pub const fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }
}

/// Ordered table schema.
///
/// Column order is significant: it defines CREATE TABLE column order and
/// the canonical projection used by SELECT and INSERT.
#[derive(Debug, Clone)]
pub struct TableSchema {
    /// Keyspace the table lives in.
    pub keyspace: String,
    /// Table name.
    pub table: String,
    columns: Vec<ColumnDescriptor>,
}

impl TableSchema {
    /// Creates an empty schema for `keyspace.table`.
    #[must_use]
    pub fn new(keyspace: impl Into<String>, table: impl Into<String>) -> Self {
        Self {
            keyspace: keyspace.into(),
            table: table.into(),
            columns: Vec::new(),
        }
    }

    /// Appends a column, preserving declaration order.
    #[must_use]
    pub fn with_column(mut self, column: ColumnDescriptor) -> Self {
        self.columns.push(column);
        self
    }

    /// Returns the columns in declaration order.
    #[must_use]
    pub fn columns(&self) -> &[ColumnDescriptor] {
        &self.columns
    }

    /// Returns the fully-qualified `keyspace.table` name.
    #[must_use]
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.keyspace, self.table)
    }

    /// Looks up a column by case-insensitive name.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&ColumnDescriptor> {
        self.columns
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
    }

    /// Returns the primary-key columns in declaration order.
    ///
    /// Falls back to the first column when no column carries a key role,
    /// so every non-empty table has a usable key.
    #[must_use]
    pub fn primary_key_columns(&self) -> Vec<&ColumnDescriptor> {
        let marked: Vec<&ColumnDescriptor> =
            self.columns.iter().filter(|c| c.role.is_key()).collect();
        if marked.is_empty() {
            self.columns.first().into_iter().collect()
        } else {
            marked
        }
    }

    /// Returns `true` if `name` belongs to the effective primary key.
    #[must_use]
    pub fn is_primary_key_column(&self, name: &str) -> bool {
        self.primary_key_columns()
            .iter()
            .any(|c| c.name.eq_ignore_ascii_case(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_column_schema() -> TableSchema {
        TableSchema::new("ks", "t")
            .with_column(
                ColumnDescriptor::new("id", CqlType::BigInt).with_role(ColumnRole::PartitionKey),
            )
            .with_column(ColumnDescriptor::new("name", CqlType::Text))
    }

    #[test]
    fn test_primary_key_columns_marked() {
        let schema = two_column_schema();
        let pk = schema.primary_key_columns();
        assert_eq!(pk.len(), 1);
        assert_eq!(pk[0].name, "id");
    }

    #[test]
    fn test_primary_key_fallback_to_first_column() {
        let schema = TableSchema::new("ks", "t")
            .with_column(ColumnDescriptor::new("a", CqlType::Int))
            .with_column(ColumnDescriptor::new("b", CqlType::Text));
        let pk = schema.primary_key_columns();
        assert_eq!(pk.len(), 1);
        assert_eq!(pk[0].name, "a");
    }

    #[test]
    fn test_primary_key_empty_schema() {
        let schema = TableSchema::new("ks", "empty");
        assert!(schema.primary_key_columns().is_empty());
    }

    #[test]
    fn test_composite_key_order() {
        let schema = TableSchema::new("ks", "t")
            .with_column(
                ColumnDescriptor::new("part", CqlType::Int).with_role(ColumnRole::PartitionKey),
            )
            .with_column(ColumnDescriptor::new("val", CqlType::Text))
            .with_column(
                ColumnDescriptor::new("clust", CqlType::Int).with_role(ColumnRole::ClusteringKey),
            );
        let pk: Vec<&str> = schema
            .primary_key_columns()
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(pk, vec!["part", "clust"]);
    }

    #[test]
    fn test_column_lookup_case_insensitive() {
        let schema = two_column_schema();
        assert!(schema.column("NAME").is_some());
        assert!(schema.column("Id").is_some());
        assert!(schema.column("missing").is_none());
        assert!(schema.is_primary_key_column("ID"));
        assert!(!schema.is_primary_key_column("name"));
    }

    #[test]
    fn test_qualified_name() {
        assert_eq!(two_column_schema().qualified_name(), "ks.t");
    }
}
