//! Current date tool.

use crate::args::Args;
use crate::error::ToolError;
use crate::schema::ToolSchema;
use crate::trait_::{Tool, ToolOutput};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use fibery_client::WorkspaceApi;

/// Current UTC timestamp in the workspace date format
pub struct CurrentDate {
    schema: ToolSchema,
}

impl CurrentDate {
    /// Create the tool
    #[must_use]
    pub fn new() -> Self {
        Self {
            schema: ToolSchema::new(
                "current_date",
                "Get the current date and time in UTC, formatted as YYYY-MM-DDTHH:MM:SS.000Z. \
                 Use it to fill date fields and to resolve relative dates such as \"tomorrow\".",
            ),
        }
    }
}

impl Default for CurrentDate {
    fn default() -> Self {
        Self::new()
    }
}

/// Format a timestamp with whole seconds and a fixed `.000` fraction
#[must_use]
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%dT%H:%M:%S.000Z").to_string()
}

#[async_trait]
impl Tool for CurrentDate {
    fn schema(&self) -> &ToolSchema {
        &self.schema
    }

    async fn call(&self, _api: &dyn WorkspaceApi, _args: Args) -> Result<ToolOutput, ToolError> {
        Ok(ToolOutput::text(format_timestamp(Utc::now())))
    }
}
