//! Single entity create and update tools.

use super::{database_property, ensure_database, pretty};
use crate::args::Args;
use crate::error::{ArgumentError, ToolError};
use crate::schema::ToolSchema;
use crate::trait_::{Tool, ToolOutput};
use async_trait::async_trait;
use fibery_client::{WorkspaceApi, requests};
use fibery_core::schema::ID_FIELD;
use serde_json::{Value, json};

/// Create one entity
pub struct CreateEntity {
    schema: ToolSchema,
}

impl CreateEntity {
    /// Create the tool
    #[must_use]
    pub fn new() -> Self {
        Self {
            schema: ToolSchema::new(
                "create_entity",
                "Create one entity in a Fibery database. Field names must be fully qualified, \
                 e.g. {\"Product Management/Name\": \"New feature\"}.",
            )
            .with_required("database", database_property("where the entity will be created"))
            .with_required(
                "entity",
                json!({"type": "object", "description": "Field values keyed by qualified field name."}),
            ),
        }
    }
}

impl Default for CreateEntity {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for CreateEntity {
    fn schema(&self) -> &ToolSchema {
        &self.schema
    }

    async fn call(&self, api: &dyn WorkspaceApi, args: Args) -> Result<ToolOutput, ToolError> {
        let database = args.required_string("database")?;
        let entity = args.required_object("entity")?.clone();
        ensure_database(api, database).await?;

        let response = api.execute_command(requests::create_entity(database, entity)).await?;
        if !response.success {
            return Ok(ToolOutput::failure(&response));
        }
        Ok(ToolOutput::text(format!(
            "Entity created successfully. Database: \"{database}\".\n{}",
            pretty(&response.result)
        )))
    }
}

/// Update one entity identified by its `fibery/id`
pub struct UpdateEntity {
    schema: ToolSchema,
}

impl UpdateEntity {
    /// Create the tool
    #[must_use]
    pub fn new() -> Self {
        Self {
            schema: ToolSchema::new(
                "update_entity",
                "Update fields of one existing entity. The entity must include its fibery/id; \
                 only the given fields change.",
            )
            .with_required("database", database_property("where the entity is stored"))
            .with_required(
                "entity",
                json!({
                    "type": "object",
                    "properties": {ID_FIELD: {"type": "string"}},
                    "required": [ID_FIELD],
                    "additionalProperties": true,
                    "description": "fibery/id plus the field values to change.",
                }),
            ),
        }
    }
}

impl Default for UpdateEntity {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for UpdateEntity {
    fn schema(&self) -> &ToolSchema {
        &self.schema
    }

    async fn call(&self, api: &dyn WorkspaceApi, args: Args) -> Result<ToolOutput, ToolError> {
        let database = args.required_string("database")?;
        let entity = args.required_object("entity")?.clone();
        let id = match entity.get(ID_FIELD).and_then(Value::as_str) {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => {
                return Err(ArgumentError::Missing {
                    name: ID_FIELD.to_string(),
                }
                .into());
            }
        };

        let response = api.execute_command(requests::update_entity(database, entity)).await?;
        if !response.success {
            return Ok(ToolOutput::failure(&response));
        }
        Ok(ToolOutput::text(format!(
            "Entity updated successfully. Database: \"{database}\", Entity: \"{id}\"."
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::ToolRegistry;
    use crate::tools::testing::{RecordingApi, workspace};
    use fibery_core::CommandResponse;

    #[tokio::test]
    async fn test_create_sends_one_create_command() {
        let api = RecordingApi::new(workspace(), CommandResponse::success(json!({"fibery/id": "f-1"})));
        let output = ToolRegistry::standard()
            .call(
                "create_entity",
                &api,
                json!({"database": "Product Management/Feature", "entity": {"Product Management/Name": "X"}}),
            )
            .await
            .unwrap();

        assert!(output.text.starts_with("Entity created successfully."));
        assert_eq!(
            api.sent(),
            [json!({
                "command": "fibery.entity/create",
                "args": {"type": "Product Management/Feature", "entity": {"Product Management/Name": "X"}}
            })]
        );
    }

    #[tokio::test]
    async fn test_create_unknown_database() {
        let api = RecordingApi::new(workspace(), CommandResponse::success(json!({})));
        let output = ToolRegistry::standard()
            .call("create_entity", &api, json!({"database": "Nope/Thing", "entity": {}}))
            .await
            .unwrap();
        assert_eq!(output.text, "Error: database \"Nope/Thing\" does not exist in this workspace.");
        assert!(api.sent().is_empty());
    }

    #[tokio::test]
    async fn test_update_requires_id() {
        let api = RecordingApi::new(workspace(), CommandResponse::success(json!({})));
        let output = ToolRegistry::standard()
            .call("update_entity", &api, json!({"database": "A/B", "entity": {"A/Name": "x"}}))
            .await
            .unwrap();
        assert_eq!(output.text, "Error: fibery/id is not provided.");
        assert_eq!(api.calls(), 0);
    }

    #[tokio::test]
    async fn test_update_sends_update() {
        let api = RecordingApi::new(workspace(), CommandResponse::success(json!({})));
        let output = ToolRegistry::standard()
            .call(
                "update_entity",
                &api,
                json!({"database": "A/B", "entity": {"fibery/id": "e-1", "A/Name": "x"}}),
            )
            .await
            .unwrap();
        assert_eq!(output.text, "Entity updated successfully. Database: \"A/B\", Entity: \"e-1\".");
        assert_eq!(api.sent()[0]["command"], "fibery.entity/update");
    }

    #[test]
    fn test_schemas_strict() {
        for schema in [CreateEntity::new().schema().clone(), UpdateEntity::new().schema().clone()] {
            assert_eq!(schema.input_schema()["additionalProperties"], false);
        }
    }
}
