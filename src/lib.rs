//! # cqlbridge
//!
//! Translation layer between strongly-typed relational rows and textual
//! CQL statements.
//!
//! cqlbridge converts a fixed-layout row record into CQL text (CREATE,
//! INSERT, UPDATE, DELETE, SELECT) and converts textual result rows back
//! into typed row records, preserving exact value semantics across the
//! string boundary: integer width, float precision, decimal scale,
//! date/time encoding, null-ness, and binary vs. text blobs.
//!
//! ## Architecture
//!
//! - **TypeMapper** (`translate::types`) - bijective scalar ↔ text codecs
//!   plus quoting/escaping rules
//! - **StatementBuilder** (`translate::query`) - assembles statements from
//!   a [`TableSchema`] and a [`Row`] or [`KeyPredicate`]
//! - **ResultMaterializer** (`translate::materialize`) - decodes one
//!   result row into a [`Row`] by case-insensitive column-name matching
//! - **ConnectionFacade** (`connection`) - the external "send text, get
//!   text matrix back" boundary; cqlbridge ships only the trait
//! - **TableClient** (`client`) - CRUD and scan surface stitched over the
//!   pieces above
//!
//! ## Example
//!
//! ```rust
//! use cqlbridge::{ColumnDescriptor, ColumnRole, CqlType, Row, TableSchema, Value};
//! use cqlbridge::translate::query;
//!
//! let schema = TableSchema::new("ks", "t")
//!     .with_column(ColumnDescriptor::new("id", CqlType::BigInt).with_role(ColumnRole::PartitionKey))
//!     .with_column(ColumnDescriptor::new("name", CqlType::Text));
//!
//! let mut row = Row::new();
//! row.set("id", Value::BigInt(7));
//! row.set("name", Value::Text("O'Brien".to_string()));
//!
//! let cql = query::build_insert(&schema, &row)?;
//! assert_eq!(cql, "INSERT INTO ks.t (id, name) VALUES (7, 'O''Brien')");
//! # Ok::<(), cqlbridge::Error>(())
//! ```

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(missing_docs)]
#![forbid(unsafe_code)]
#![allow(clippy::multiple_crate_versions)]

use thiserror::Error as ThisError;

// Module declarations
pub mod client;
pub mod config;
pub mod connection;
pub mod models;
pub mod translate;

// Re-exports for convenience
pub use client::TableClient;
pub use config::{ConnectionParams, TranslatorConfig};
pub use connection::{Capabilities, ConnectionFacade};
pub use models::{
    ColumnDescriptor, ColumnRole, CqlType, QueryOutput, Row, ScanPosition, TableSchema, Value,
};
pub use translate::materialize::DecodeMode;
pub use translate::query::KeyPredicate;

/// Error type for cqlbridge operations.
///
/// Uses `thiserror` for automatic `Display` and `Error` trait implementations.
///
/// # Error Variant Triggers
///
/// | Variant | Raised When |
/// |---------|-------------|
/// | `Connection` | The backing cluster cannot be reached or authenticated to |
/// | `Execution` | A statement was rejected by the backing store |
/// | `OutOfRange` | A value parses but does not fit the destination type's range |
/// | `Malformed` | Text cannot be parsed as the destination logical type at all |
/// | `Unsupported` | The operation has no CQL equivalent (e.g. table rename) |
#[derive(Debug, ThisError)]
pub enum Error {
    /// The backing store cannot be reached.
    ///
    /// Not retried automatically; surfaced to the caller, which decides
    /// whether to re-establish the connection.
    #[error("connection failed: {cause}")]
    Connection {
        /// The underlying cause.
        cause: String,
    },

    /// A syntactically valid statement was rejected by the backing store.
    #[error("statement execution failed: {cause}")]
    Execution {
        /// The statement that was rejected.
        statement: String,
        /// The underlying cause.
        cause: String,
    },

    /// A value parsed successfully but exceeds the destination type's range.
    #[error("value '{text}' out of range for {cql_type}")]
    OutOfRange {
        /// The offending textual value.
        text: String,
        /// The destination CQL type name.
        cql_type: &'static str,
    },

    /// Text cannot be parsed as the destination logical type.
    #[error("cannot parse '{text}' as {cql_type}")]
    Malformed {
        /// The offending textual value.
        text: String,
        /// The destination CQL type name.
        cql_type: &'static str,
    },

    /// The requested operation has no backing-store equivalent.
    #[error("unsupported operation: {0}")]
    Unsupported(String),
}

impl Error {
    /// Returns `true` if this is a type-conversion failure (either kind).
    #[must_use]
    pub const fn is_conversion(&self) -> bool {
        matches!(self, Self::OutOfRange { .. } | Self::Malformed { .. })
    }
}

/// Result type alias for cqlbridge operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::Connection {
            cause: "no contact points".to_string(),
        };
        assert_eq!(err.to_string(), "connection failed: no contact points");

        let err = Error::OutOfRange {
            text: "300".to_string(),
            cql_type: "tinyint",
        };
        assert_eq!(err.to_string(), "value '300' out of range for tinyint");

        let err = Error::Unsupported("rename_table".to_string());
        assert_eq!(err.to_string(), "unsupported operation: rename_table");
    }

    #[test]
    fn test_is_conversion() {
        assert!(
            Error::Malformed {
                text: "abc".to_string(),
                cql_type: "int",
            }
            .is_conversion()
        );
        assert!(
            !Error::Connection {
                cause: "down".to_string(),
            }
            .is_conversion()
        );
    }
}
