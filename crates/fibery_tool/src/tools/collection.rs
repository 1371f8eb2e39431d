//! Collection relation tools: add items and confirmed unlink.

use super::database_property;
use crate::args::Args;
use crate::error::{ArgumentError, ToolError};
use crate::schema::ToolSchema;
use crate::trait_::{Tool, ToolOutput};
use async_trait::async_trait;
use fibery_client::{WorkspaceApi, requests};
use serde_json::{Value, json};

const ADD_OPERATION: &str = "add";

fn entity_id_property() -> Value {
    json!({"type": "string", "description": "fibery/id of the entity to update."})
}

fn field_property() -> Value {
    json!({
        "type": "string",
        "description": "Collection relation field name (for example, assignments/assignees).",
    })
}

fn item_ids_property(verb: &str) -> Value {
    json!({
        "type": "array",
        "items": {"type": "string"},
        "description": format!("List of related entity fibery/id values to {verb}."),
    })
}

/// Add items to a collection relation
///
/// Removal is a separate tool with its own confirmation flag.
pub struct UpdateCollection {
    schema: ToolSchema,
}

impl UpdateCollection {
    /// Create the tool
    #[must_use]
    pub fn new() -> Self {
        Self {
            schema: ToolSchema::new(
                "update_collection",
                "Add related entities to a collection relation field (for example, assign users). \
                 Only the add operation is supported; use unlink_collection to remove items.",
            )
            .with_required("database", database_property("where the entity is stored"))
            .with_required("entity_id", entity_id_property())
            .with_required("field", field_property())
            .with_required(
                "operation",
                json!({
                    "type": "string",
                    "enum": [ADD_OPERATION],
                    "description": "Collection operation to apply.",
                }),
            )
            .with_required("item_ids", item_ids_property("add")),
        }
    }
}

impl Default for UpdateCollection {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for UpdateCollection {
    fn schema(&self) -> &ToolSchema {
        &self.schema
    }

    async fn call(&self, api: &dyn WorkspaceApi, args: Args) -> Result<ToolOutput, ToolError> {
        let database = args.required_string("database")?;
        let entity_id = args.required_string("entity_id")?;
        let field = args.required_string("field")?;
        if args.string("operation")? != Some(ADD_OPERATION) {
            return Err(ArgumentError::InvalidChoice {
                name: "operation".to_string(),
                allowed: ADD_OPERATION,
            }
            .into());
        }
        let item_ids = args.strings("item_ids")?;

        let command = requests::add_collection_items(database, entity_id, field, &item_ids);
        let response = api.execute_command(command).await?;
        if !response.success {
            return Ok(ToolOutput::failure(&response));
        }
        Ok(ToolOutput::text(format!(
            "Collection updated successfully. Database: \"{database}\", Entity: \"{entity_id}\", \
             Field: \"{field}\", Operation: \"{ADD_OPERATION}\"."
        )))
    }
}

/// Remove items from a collection relation, with explicit confirmation
pub struct UnlinkCollection {
    schema: ToolSchema,
}

impl UnlinkCollection {
    /// Create the tool
    #[must_use]
    pub fn new() -> Self {
        Self {
            schema: ToolSchema::new(
                "unlink_collection",
                "Remove related entities from a collection relation field. The related entities \
                 themselves are kept. Requires confirm_unlink: true.",
            )
            .with_required("database", database_property("where the entity is stored"))
            .with_required("entity_id", entity_id_property())
            .with_required("field", field_property())
            .with_required("item_ids", item_ids_property("unlink"))
            .with_required(
                "confirm_unlink",
                json!({
                    "type": "boolean",
                    "description": "Explicit confirmation for unlink/removal operations. Must be true.",
                }),
            ),
        }
    }
}

impl Default for UnlinkCollection {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for UnlinkCollection {
    fn schema(&self) -> &ToolSchema {
        &self.schema
    }

    async fn call(&self, api: &dyn WorkspaceApi, args: Args) -> Result<ToolOutput, ToolError> {
        let database = args.required_string("database")?;
        let entity_id = args.required_string("entity_id")?;
        let field = args.required_string("field")?;
        let item_ids = args.strings("item_ids")?;
        if !args.flag("confirm_unlink") {
            return Err(ArgumentError::NotConfirmed {
                flag: "confirm_unlink",
                action: "remove relation items",
            }
            .into());
        }

        let command = requests::remove_collection_items(database, entity_id, field, &item_ids);
        let response = api.execute_command(command).await?;
        if !response.success {
            return Ok(ToolOutput::failure(&response));
        }
        Ok(ToolOutput::text(format!(
            "Collection items unlinked successfully. Database: \"{database}\", Entity: \"{entity_id}\", Field: \"{field}\"."
        )))
    }
}
