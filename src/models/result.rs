//! Query results and scan-position references.

use crate::{Error, Result};

/// Result of executing a statement.
///
/// A rectangular matrix of textual cells plus the column names the remote
/// side actually returned. Column order is the remote side's, which need
/// not match schema order or completeness. Produced by a
/// [`crate::ConnectionFacade`], consumed immediately by the materializer,
/// then discarded.
#[derive(Debug, Clone, Default)]
pub struct QueryOutput {
    /// Names of the returned columns, positionally aligned with each row.
    pub columns: Vec<String>,
    /// Row matrix; each inner vector aligns with `columns`.
    pub rows: Vec<Vec<String>>,
}

impl QueryOutput {
    /// An empty result (statements that return no rows).
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            columns: Vec::new(),
            rows: Vec::new(),
        }
    }

    /// Number of rows returned.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// Opaque reference to a row within the last retained result set.
///
/// A fixed-width binary encoding of a zero-based row index. Valid only
/// while the caller retains the result set it points into; the next query
/// invalidates it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanPosition(u64);

impl ScanPosition {
    /// Width of the binary encoding in bytes.
    pub const ENCODED_LEN: usize = 8;

    /// Creates a position for a zero-based row index.
    #[must_use]
    pub const fn new(index: u64) -> Self {
        Self(index)
    }

    /// Returns the zero-based row index.
    #[must_use]
    pub const fn index(self) -> u64 {
        self.0
    }

    /// Encodes the position as fixed-width little-endian bytes.
    #[must_use]
    pub const fn to_bytes(self) -> [u8; Self::ENCODED_LEN] {
        self.0.to_le_bytes()
    }

    /// Decodes a position from its fixed-width binary form.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Malformed`] if `bytes` is not exactly
    /// [`Self::ENCODED_LEN`] bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let arr: [u8; Self::ENCODED_LEN] =
            bytes.try_into().map_err(|_| Error::Malformed {
                text: format!("{} byte position reference", bytes.len()),
                cql_type: "scan position",
            })?;
        Ok(Self(u64::from_le_bytes(arr)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_position_round_trip() {
        let pos = ScanPosition::new(42);
        let bytes = pos.to_bytes();
        assert_eq!(bytes.len(), ScanPosition::ENCODED_LEN);
        assert_eq!(ScanPosition::from_bytes(&bytes).unwrap(), pos);
        assert_eq!(ScanPosition::from_bytes(&bytes).unwrap().index(), 42);
    }

    #[test]
    fn test_scan_position_bad_width() {
        let err = ScanPosition::from_bytes(&[1, 2, 3]).unwrap_err();
        assert!(matches!(err, Error::Malformed { .. }));
    }

    #[test]
    fn test_empty_output() {
        let out = QueryOutput::empty();
        assert_eq!(out.row_count(), 0);
        assert!(out.columns.is_empty());
    }
}
