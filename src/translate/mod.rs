//! The translation core: scalar codecs, statement assembly, and result
//! materialization.
//!
//! Everything here is stateless and pure; operations are deterministic
//! functions of their inputs and safe to call from any number of threads.
//! Blocking happens only at the [`crate::ConnectionFacade`] boundary.

pub mod materialize;
pub mod query;
pub mod types;

pub use materialize::{DecodeMode, materialize};
pub use query::KeyPredicate;
