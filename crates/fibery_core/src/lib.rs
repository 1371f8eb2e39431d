//! Fibery bridge core types
//!
//! This crate contains pure types and logic with no I/O.
//! Everything here is safe to share between concurrent callers once built.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod command;
pub mod error;
pub mod query;
pub mod schema;

// Re-exports
pub use command::{Command, CommandResponse};
pub use error::{CommandError, SchemaError};
pub use query::{Filter, QueryParams, StructuredQuery};
pub use schema::{Database, Field, Schema};
