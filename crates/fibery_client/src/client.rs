//! Guarded client.
//!
//! The guard decision is taken before the transport is touched, and an
//! allowed tree is sent exactly once, unmodified, as a single request.
//! Batch semantics (partial success, nested responses) belong to the API.

use crate::api::WorkspaceApi;
use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::transport::{HttpTransport, Transport};
use async_trait::async_trait;
use fibery_core::{Command, CommandResponse};
use fibery_policy::CommandGuard;
use tracing::{debug, warn};

/// Workspace client enforcing a command guard over a transport
pub struct FiberyClient<T: Transport = HttpTransport> {
    transport: T,
    guard: CommandGuard,
}

impl FiberyClient<HttpTransport> {
    /// Connect over HTTP using the given configuration
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP transport cannot be built
    pub fn from_config(config: &ClientConfig) -> Result<Self, ClientError> {
        Ok(Self::new(HttpTransport::new(config)?))
    }
}

impl<T: Transport> FiberyClient<T> {
    /// Create a client with the default guard
    #[must_use]
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            guard: CommandGuard::default(),
        }
    }

    /// Replace the guard
    #[must_use]
    pub fn with_guard(mut self, guard: CommandGuard) -> Self {
        self.guard = guard;
        self
    }

    /// Underlying transport
    #[must_use]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Guard in force
    #[must_use]
    pub fn guard(&self) -> &CommandGuard {
        &self.guard
    }
}

#[async_trait]
impl<T: Transport> WorkspaceApi for FiberyClient<T> {
    async fn execute_command(&self, command: Command) -> Result<CommandResponse, ClientError> {
        let decision = self.guard.inspect(&command);
        if let Some(rejection) = decision.to_response() {
            warn!(
                command = %command.tag(),
                denied = decision.denied_tag.as_deref().unwrap_or_default(),
                path = ?decision.path,
                "command blocked by guard"
            );
            return Ok(rejection);
        }

        debug!(command = %command.tag(), checked = decision.checked, "dispatching command");
        let mut responses = self.transport.send(std::slice::from_ref(&command)).await?;
        if responses.is_empty() {
            return Err(ClientError::EmptyResponse);
        }
        Ok(responses.swap_remove(0))
    }
}
