//! Tool trait

use crate::args::Args;
use crate::error::ToolError;
use crate::schema::ToolSchema;
use async_trait::async_trait;
use fibery_client::WorkspaceApi;
use fibery_core::CommandResponse;

/// Text returned to the caller of a tool
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOutput {
    /// Rendered output
    pub text: String,
    /// Whether the text reports an error
    pub is_error: bool,
}

impl ToolOutput {
    /// Successful output
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: false,
        }
    }

    /// Render an error as `Error: <message>.`
    #[must_use]
    pub fn error(err: &ToolError) -> Self {
        let message = err.to_string();
        Self {
            text: format!("Error: {}.", message.trim_end_matches('.')),
            is_error: true,
        }
    }

    /// Render a backend failure as its JSON envelope
    #[must_use]
    pub fn failure(response: &CommandResponse) -> Self {
        Self {
            text: serde_json::to_string(response).unwrap_or_else(|_| response.result.to_string()),
            is_error: true,
        }
    }
}

/// A named operation exposed to callers
#[async_trait]
pub trait Tool: Send + Sync {
    /// Schema declaring the tool name and accepted arguments
    fn schema(&self) -> &ToolSchema;

    /// Tool name
    fn name(&self) -> &str {
        &self.schema().name
    }

    /// Run the tool against a workspace
    ///
    /// # Errors
    ///
    /// Returns error on invalid arguments or a failed request
    async fn call(&self, api: &dyn WorkspaceApi, args: Args) -> Result<ToolOutput, ToolError>;
}
