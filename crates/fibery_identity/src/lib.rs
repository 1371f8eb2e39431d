//! Fibery bridge identity resolution
//!
//! Workspaces define user-like collections under arbitrary namespaces, so
//! the collection and its email/name fields are inferred from the schema at
//! resolution time.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod heuristic;
pub mod resolver;
pub mod selector;

pub use heuristic::{IdentityFields, find_email_field, find_name_field};
pub use resolver::{IdentityQuery, IdentityResolver, ResolveError, ResolvedUser};
pub use selector::{Candidate, LookupKind, candidate_databases};
