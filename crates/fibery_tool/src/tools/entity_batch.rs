//! Batch create and update tools, sent as one batch command.

use super::{database_property, ensure_database};
use crate::args::Args;
use crate::error::{ArgumentError, ToolError};
use crate::schema::ToolSchema;
use crate::trait_::{Tool, ToolOutput};
use async_trait::async_trait;
use fibery_client::{WorkspaceApi, requests};
use fibery_core::schema::ID_FIELD;
use serde_json::{Value, json};

/// Most entities one batch call accepts
pub const MAX_BATCH: usize = 50;

/// Largest create batch that runs without `confirm_batch`
pub const UNCONFIRMED_CREATE_BATCH: usize = 10;

fn check_batch_size(count: usize) -> Result<(), ArgumentError> {
    if count > MAX_BATCH {
        return Err(ArgumentError::TooMany {
            name: "entities".to_string(),
            max: MAX_BATCH,
        });
    }
    Ok(())
}

/// Create several entities in one batch
pub struct CreateEntitiesBatch {
    schema: ToolSchema,
}

impl CreateEntitiesBatch {
    /// Create the tool
    #[must_use]
    pub fn new() -> Self {
        Self {
            schema: ToolSchema::new(
                "create_entities_batch",
                "Create up to 50 entities in one Fibery database with a single request. \
                 Batches of more than 10 entities require confirm_batch: true.",
            )
            .with_required("database", database_property("where the entities will be created"))
            .with_required(
                "entities",
                json!({
                    "type": "array",
                    "minItems": 1,
                    "maxItems": MAX_BATCH,
                    "items": {"type": "object"},
                    "description": "Entities to create, each keyed by qualified field name.",
                }),
            )
            .with_property(
                "confirm_batch",
                json!({
                    "type": "boolean",
                    "description": "Explicit confirmation, required for more than 10 entities.",
                }),
            ),
        }
    }
}

impl Default for CreateEntitiesBatch {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for CreateEntitiesBatch {
    fn schema(&self) -> &ToolSchema {
        &self.schema
    }

    async fn call(&self, api: &dyn WorkspaceApi, args: Args) -> Result<ToolOutput, ToolError> {
        let database = args.required_string("database")?;
        let entities = args.entities("entities")?;
        check_batch_size(entities.len())?;
        if entities.len() > UNCONFIRMED_CREATE_BATCH && !args.flag("confirm_batch") {
            return Err(ArgumentError::NotConfirmed {
                flag: "confirm_batch",
                action: "create more than 10 entities",
            }
            .into());
        }
        ensure_database(api, database).await?;

        let count = entities.len();
        let response = api.execute_command(requests::create_entities(database, entities)).await?;
        if !response.success {
            return Ok(ToolOutput::failure(&response));
        }
        Ok(ToolOutput::text(format!("{count} entities created successfully.")))
    }
}

/// Update several entities in one batch
pub struct UpdateEntitiesBatch {
    schema: ToolSchema,
}

impl UpdateEntitiesBatch {
    /// Create the tool
    #[must_use]
    pub fn new() -> Self {
        Self {
            schema: ToolSchema::new(
                "update_entities_batch",
                "Update up to 50 existing entities in one Fibery database with a single request. \
                 Every entity must include fibery/id, and confirm_batch must be true.",
            )
            .with_required("database", database_property("where entities will be updated"))
            .with_required(
                "entities",
                json!({
                    "type": "array",
                    "minItems": 1,
                    "maxItems": MAX_BATCH,
                    "items": {
                        "type": "object",
                        "properties": {ID_FIELD: {"type": "string"}},
                        "required": [ID_FIELD],
                        "additionalProperties": true,
                    },
                    "description": "List of entities to update. Each item must include fibery/id.",
                }),
            )
            .with_required(
                "confirm_batch",
                json!({
                    "type": "boolean",
                    "description": "Explicit confirmation for batch updates. Must be true.",
                }),
            )
            .with_property(
                "fail_fast",
                json!({
                    "type": "boolean",
                    "default": true,
                    "description": "If true, return as soon as a failed nested update is detected.",
                }),
            ),
        }
    }
}

impl Default for UpdateEntitiesBatch {
    fn default() -> Self {
        Self::new()
    }
}

/// Nested results whose `success` is not `true`
fn nested_failures(results: &[Value]) -> Vec<&Value> {
    results
        .iter()
        .filter(|result| result.get("success").and_then(Value::as_bool) != Some(true))
        .collect()
}

#[async_trait]
impl Tool for UpdateEntitiesBatch {
    fn schema(&self) -> &ToolSchema {
        &self.schema
    }

    async fn call(&self, api: &dyn WorkspaceApi, args: Args) -> Result<ToolOutput, ToolError> {
        let database = args.required_string("database")?;
        let entities = args.entities("entities")?;
        check_batch_size(entities.len())?;
        if !args.flag("confirm_batch") {
            return Err(ArgumentError::NotConfirmed {
                flag: "confirm_batch",
                action: "execute a batch update",
            }
            .into());
        }
        let fail_fast = args.boolean("fail_fast")?.unwrap_or(true);

        let missing: Vec<usize> = entities
            .iter()
            .enumerate()
            .filter(|(_, entity)| entity.get(ID_FIELD).and_then(Value::as_str).is_none_or(str::is_empty))
            .map(|(index, _)| index)
            .collect();
        if !missing.is_empty() {
            return Err(ArgumentError::MissingIds(missing).into());
        }

        let count = entities.len();
        let response = api
            .execute_command(requests::update_entities_batch(database, entities))
            .await?;
        if !response.success {
            return Ok(ToolOutput::failure(&response));
        }

        let Some(results) = response.result.as_array() else {
            return Ok(ToolOutput::text(format!("{count} entities updated successfully.")));
        };

        let failures = nested_failures(results);
        if let Some(first) = failures.first() {
            let result = if fail_fast { (*first).clone() } else { json!(failures) };
            let text = json!({"success": false, "result": result}).to_string();
            return Ok(ToolOutput { text, is_error: true });
        }

        Ok(ToolOutput::text(format!("{} entities updated successfully.", results.len())))
    }
}
