//! Data model: table schemas, typed rows, and result sets.

mod result;
mod row;
mod schema;

pub use result::{QueryOutput, ScanPosition};
pub use row::{Row, Value};
pub use schema::{ColumnDescriptor, ColumnRole, CqlType, TableSchema};
