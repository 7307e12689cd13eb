//! Table-level client stitching the builders, the materializer, and a
//! connection facade into a CRUD/scan surface.
//!
//! The client owns the only piece of state in the crate: the last
//! materialized result set and a forward cursor over it. Everything else
//! is delegated to the pure translation functions.

use crate::config::TranslatorConfig;
use crate::connection::{Capabilities, ConnectionFacade};
use crate::models::{QueryOutput, Row, ScanPosition, TableSchema, Value};
use crate::translate::materialize::{DecodeMode, materialize};
use crate::translate::query::{self, KeyPredicate};
use crate::{Error, Result};

/// Client for one remote table.
///
/// Statements are issued synchronously through the facade; the facade is
/// (re)connected lazily before each statement. Each statement is an
/// independent, immediately-applied operation; there is no transaction
/// concept.
pub struct TableClient<C: ConnectionFacade> {
    facade: C,
    schema: TableSchema,
    config: TranslatorConfig,
    // Last read result set; invalidated (cleared) by the next statement.
    result_set: QueryOutput,
    cursor: usize,
}

impl<C: ConnectionFacade> TableClient<C> {
    /// Creates a client for `schema`, applying the config's keyspace and
    /// table-name overrides.
    #[must_use]
    pub fn new(facade: C, mut schema: TableSchema, config: TranslatorConfig) -> Self {
        if schema.keyspace.is_empty() {
            schema.keyspace = config.connection.keyspace.clone();
        }
        if let Some(table) = &config.connection.table {
            schema.table = table.clone();
        }
        Self {
            facade,
            schema,
            config,
            result_set: QueryOutput::empty(),
            cursor: 0,
        }
    }

    /// Returns the schema this client operates on.
    #[must_use]
    pub const fn schema(&self) -> &TableSchema {
        &self.schema
    }

    /// Returns the capability set the layer declares.
    #[must_use]
    pub const fn capabilities(&self) -> Capabilities {
        Capabilities::DECLARED
    }

    const fn decode_mode(&self) -> DecodeMode {
        if self.config.strict_decoding {
            DecodeMode::Strict
        } else {
            DecodeMode::NullFill
        }
    }

    fn ensure_connected(&mut self) -> Result<()> {
        if !self.facade.is_connected() {
            self.facade.connect()?;
        }
        Ok(())
    }

    fn execute(&mut self, cql: &str) -> Result<QueryOutput> {
        self.ensure_connected()?;
        // Any statement invalidates previously handed-out positions.
        self.result_set = QueryOutput::empty();
        self.cursor = 0;

        if self.config.connection.verbose {
            tracing::info!(%cql, "executing statement");
        } else {
            tracing::debug!(%cql, "executing statement");
        }
        metrics::counter!("cqlbridge_statements_total").increment(1);

        self.facade.execute(cql)
    }

    /// Creates the keyspace (if needed) and the table.
    ///
    /// # Errors
    ///
    /// Propagates connection and execution failures from the facade.
    pub fn create_table(&mut self) -> Result<()> {
        let keyspace_cql = query::build_create_keyspace(&self.schema.keyspace);
        self.execute(&keyspace_cql)?;
        let table_cql = query::build_create_table(&self.schema);
        self.execute(&table_cql)?;
        Ok(())
    }

    /// Drops the table.
    ///
    /// # Errors
    ///
    /// Propagates connection and execution failures from the facade.
    pub fn drop_table(&mut self) -> Result<()> {
        let cql = query::build_drop_table(&self.schema);
        self.execute(&cql)?;
        Ok(())
    }

    /// Removes every row from the table.
    ///
    /// # Errors
    ///
    /// Propagates connection and execution failures from the facade.
    pub fn truncate(&mut self) -> Result<()> {
        let cql = query::build_truncate(&self.schema);
        self.execute(&cql)?;
        Ok(())
    }

    /// Renaming has no CQL equivalent; always fails.
    ///
    /// # Errors
    ///
    /// Always returns [`Error::Unsupported`].
    pub fn rename_table(&mut self, _to: &str) -> Result<()> {
        Err(Error::Unsupported("rename_table".to_string()))
    }

    /// Inserts a row (every schema column, absent ones as `NULL`).
    ///
    /// # Errors
    ///
    /// Returns conversion errors from encoding and facade failures.
    pub fn insert(&mut self, row: &Row) -> Result<()> {
        let cql = query::build_insert(&self.schema, row)?;
        self.execute(&cql)?;
        Ok(())
    }

    /// Updates the row identified by `old_row`'s key to `new_row`'s
    /// non-key values.
    ///
    /// # Errors
    ///
    /// Returns conversion errors from encoding and facade failures.
    pub fn update(&mut self, old_row: &Row, new_row: &Row) -> Result<()> {
        let cql = query::build_update(&self.schema, old_row, new_row)?;
        self.execute(&cql)?;
        Ok(())
    }

    /// Deletes the row identified by `row`'s key.
    ///
    /// # Errors
    ///
    /// Returns conversion errors from encoding and facade failures.
    pub fn delete(&mut self, row: &Row) -> Result<()> {
        let cql = query::build_delete(&self.schema, row)?;
        self.execute(&cql)?;
        Ok(())
    }

    /// Starts a full-table scan, retaining the result set for iteration.
    ///
    /// # Errors
    ///
    /// Propagates connection and execution failures from the facade.
    pub fn scan_init(&mut self) -> Result<()> {
        let cql = query::build_select(&self.schema, None, self.config.allow_filtering);
        self.result_set = self.execute(&cql)?;
        self.cursor = 0;
        Ok(())
    }

    /// Runs a key-equality lookup and retains the result set.
    ///
    /// `key_parts` aligns with the primary-key columns; a partial prefix
    /// is allowed. Returns the first matching row, or `None` when the key
    /// matches nothing. Further matches are available via [`next_row`].
    ///
    /// [`next_row`]: Self::next_row
    ///
    /// # Errors
    ///
    /// Returns conversion errors from encoding/decoding and facade
    /// failures.
    pub fn lookup(&mut self, key_parts: &[Option<Value>]) -> Result<Option<Row>> {
        let predicate = KeyPredicate::from_key_parts(&self.schema, key_parts);
        let clause = query::build_where(&self.schema, &predicate)?;
        let cql = query::build_select(&self.schema, Some(&clause), self.config.allow_filtering);
        self.result_set = self.execute(&cql)?;
        self.cursor = 0;
        self.next_row()
    }

    /// Materializes the next row of the retained result set.
    ///
    /// Returns `None` at end of scan.
    ///
    /// # Errors
    ///
    /// In strict decoding, surfaces per-cell conversion errors.
    pub fn next_row(&mut self) -> Result<Option<Row>> {
        let Some(cells) = self.result_set.rows.get(self.cursor) else {
            return Ok(None);
        };
        let row = materialize(
            &self.result_set.columns,
            cells,
            &self.schema,
            self.decode_mode(),
        )?;
        self.cursor += 1;
        Ok(Some(row))
    }

    /// Returns a position reference for the most recently returned row.
    ///
    /// `None` before the first [`next_row`] call. The reference is valid
    /// only until the next statement.
    ///
    /// [`next_row`]: Self::next_row
    #[must_use]
    pub const fn position(&self) -> Option<ScanPosition> {
        if self.cursor == 0 {
            None
        } else {
            Some(ScanPosition::new(self.cursor as u64 - 1))
        }
    }

    /// Re-materializes the row a position reference addresses.
    ///
    /// Returns `None` when the position points past the retained result
    /// set (including after it was invalidated by a newer statement).
    ///
    /// # Errors
    ///
    /// In strict decoding, surfaces per-cell conversion errors.
    pub fn row_at(&self, position: ScanPosition) -> Result<Option<Row>> {
        let index = usize::try_from(position.index()).map_err(|_| Error::Malformed {
            text: position.index().to_string(),
            cql_type: "scan position",
        })?;
        let Some(cells) = self.result_set.rows.get(index) else {
            return Ok(None);
        };
        materialize(
            &self.result_set.columns,
            cells,
            &self.schema,
            self.decode_mode(),
        )
        .map(Some)
    }

    /// Ends the scan and releases the retained result set.
    pub fn scan_end(&mut self) {
        self.result_set = QueryOutput::empty();
        self.cursor = 0;
    }

    /// Consumes the client, returning the facade.
    ///
    /// Useful for handing the link back to a pool, and for inspecting
    /// recorded statements in tests.
    #[must_use]
    pub fn into_facade(self) -> C {
        self.facade
    }
}
