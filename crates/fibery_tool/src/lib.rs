//! Fibery bridge tool layer
//!
//! Named tools with strict JSON input schemas. Arguments are checked before
//! any network access, and every request a tool makes goes through a
//! [`WorkspaceApi`](fibery_client::WorkspaceApi), so the command guard sees it.
//! No tool deletes entities.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod args;
pub mod error;
pub mod registry;
pub mod schema;
pub mod tools;
pub mod trait_;

pub use args::Args;
pub use error::{ArgumentError, RegistryError, ToolError};
pub use registry::ToolRegistry;
pub use schema::ToolSchema;
pub use trait_::{Tool, ToolOutput};
