//! The external connection boundary.
//!
//! Statements carry no placeholders; every value is pre-encoded into the
//! text by the statement builder, so the facade is a pure "send text, get
//! text matrix back" contract. Real driver integrations implement
//! [`ConnectionFacade`] outside this crate; tests use scripted doubles.

use crate::Result;
use crate::models::QueryOutput;

/// Capability a statement stream gets from a facade implementation.
///
/// Consumed by the host, not negotiated: any request outside these
/// capabilities must degrade to a full scan plus application-side
/// filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    /// Forward-only row iteration over a retained result set.
    pub forward_scan: bool,
    /// Position-addressable row iteration via scan-position references.
    pub position_addressable: bool,
    /// Equality lookup on primary-key columns.
    pub key_equality_lookup: bool,
    /// Unrestricted full-table scan.
    pub full_table_scan: bool,
    /// Native range scans over key columns.
    pub range_scan: bool,
    /// Server-side result ordering.
    pub ordered_scan: bool,
    /// Secondary (non-primary) index scans.
    pub secondary_index_scan: bool,
}

impl Capabilities {
    /// The capability set this translation layer declares.
    pub const DECLARED: Self = Self {
        forward_scan: true,
        position_addressable: true,
        key_equality_lookup: true,
        full_table_scan: true,
        range_scan: false,
        ordered_scan: false,
        secondary_index_scan: false,
    };
}

impl Default for Capabilities {
    fn default() -> Self {
        Self::DECLARED
    }
}

/// Boundary to the backing cluster.
///
/// Implementations must be safe to call repeatedly: `connect` on an
/// already-live link is a no-op, and `is_connected` lets the caller
/// lazily (re)establish the link before issuing a statement. Statements
/// issued sequentially by one caller are observed in that order; nothing
/// is guaranteed across distinct callers. Timeouts and retries are the
/// facade's concern, never the translation layer's.
pub trait ConnectionFacade: Send {
    /// Establishes the link to the cluster.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Connection`] when the cluster cannot be
    /// reached or authenticated to.
    fn connect(&mut self) -> Result<()>;

    /// Reports whether the underlying link is alive.
    fn is_connected(&self) -> bool;

    /// Executes one statement and returns the textual result matrix.
    ///
    /// Statements that produce no rows return an empty [`QueryOutput`].
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Execution`] when the backing store rejects
    /// the statement and [`crate::Error::Connection`] when the link fails
    /// mid-flight.
    fn execute(&mut self, statement: &str) -> Result<QueryOutput>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declared_capabilities() {
        let caps = Capabilities::default();
        assert!(caps.forward_scan);
        assert!(caps.position_addressable);
        assert!(caps.key_equality_lookup);
        assert!(caps.full_table_scan);
        assert!(!caps.range_scan);
        assert!(!caps.ordered_scan);
        assert!(!caps.secondary_index_scan);
    }
}
