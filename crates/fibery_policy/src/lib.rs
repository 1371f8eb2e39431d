//! Fibery bridge command policy
//!
//! Decides, before any network I/O, whether a command tree may be sent.
//! Every decision is local and pure; the caller performs the dispatch.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod guard;
pub mod policy;

pub use guard::{CommandGuard, GuardDecision};
pub use policy::{CommandPolicy, DEFAULT_DENIED_COMMANDS};
