//! Database listing tool.

use crate::args::Args;
use crate::error::ToolError;
use crate::schema::ToolSchema;
use crate::trait_::{Tool, ToolOutput};
use async_trait::async_trait;
use fibery_client::WorkspaceApi;
use serde_json::json;

/// Numbered list of databases in the workspace
pub struct ListDatabases {
    schema: ToolSchema,
}

impl ListDatabases {
    /// Create the tool
    #[must_use]
    pub fn new() -> Self {
        Self {
            schema: ToolSchema::new(
                "list_databases",
                "Get list of all databases (their names) in user's Fibery workspace (schema)",
            )
            .with_property(
                "include_system_databases",
                json!({
                    "type": "boolean",
                    "default": false,
                    "description": "Whether to include internal/system databases (such as fibery/* and workflow/*).",
                }),
            ),
        }
    }
}

impl Default for ListDatabases {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for ListDatabases {
    fn schema(&self) -> &ToolSchema {
        &self.schema
    }

    async fn call(&self, api: &dyn WorkspaceApi, args: Args) -> Result<ToolOutput, ToolError> {
        let include_system = args.flag("include_system_databases");
        let schema = api.get_schema().await?;
        let databases = schema.include(include_system);

        if databases.is_empty() {
            return Ok(ToolOutput::text("No databases found in this Fibery workspace."));
        }

        let lines: String = databases
            .iter()
            .enumerate()
            .map(|(i, database)| format!("{}. {}\n", i + 1, database.name))
            .collect();
        Ok(ToolOutput::text(format!("Databases in Fibery workspace:\n\n{lines}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::testing::{RecordingApi, workspace};
    use fibery_core::{CommandResponse, Schema};

    async fn run(args: serde_json::Value) -> String {
        let tool = ListDatabases::new();
        let api = RecordingApi::new(workspace(), CommandResponse::success(json!(null)));
        let args = Args::parse(tool.schema(), args).unwrap();
        tool.call(&api, args).await.unwrap().text
    }

    #[tokio::test]
    async fn test_user_databases_only_by_default() {
        assert_eq!(
            run(json!({})).await,
            "Databases in Fibery workspace:\n\n1. Product Management/Feature\n2. Directory/Contact\n"
        );
    }

    #[tokio::test]
    async fn test_string_false_does_not_enable_system() {
        let text = run(json!({"include_system_databases": "false"})).await;
        assert!(!text.contains("fibery/user"));
    }

    #[tokio::test]
    async fn test_true_includes_system() {
        let text = run(json!({"include_system_databases": true})).await;
        assert!(text.contains("1. fibery/user\n"));
        assert!(text.contains("3. workflow/state\n"));
    }

    #[tokio::test]
    async fn test_empty_workspace() {
        let tool = ListDatabases::new();
        let api = RecordingApi::new(Schema::default(), CommandResponse::success(json!(null)));
        let output = tool.call(&api, Args::default()).await.unwrap();
        assert_eq!(output.text, "No databases found in this Fibery workspace.");
    }
}
