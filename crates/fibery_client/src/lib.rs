//! Fibery bridge API client
//!
//! Every outbound request is a command tree that passes the
//! [`CommandGuard`](fibery_policy::CommandGuard) before it reaches the
//! transport. Request builders only construct commands; they never send.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod requests;
pub mod transport;

pub use api::WorkspaceApi;
pub use client::FiberyClient;
pub use config::ClientConfig;
pub use error::{ClientError, TransportError};
pub use transport::{HttpTransport, Transport};
