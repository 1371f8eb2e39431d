//! Structured entity query tool.

use super::pretty;
use crate::args::Args;
use crate::error::{ArgumentError, ToolError};
use crate::schema::ToolSchema;
use crate::trait_::{Tool, ToolOutput};
use async_trait::async_trait;
use fibery_client::WorkspaceApi;
use fibery_core::QueryParams;
use serde_json::{Map, Value, json};

/// Structured entity query
///
/// The query shape is passed through as given; only its top-level argument
/// types are checked.
pub struct Query {
    schema: ToolSchema,
}

impl Query {
    /// Create the tool
    #[must_use]
    pub fn new() -> Self {
        Self {
            schema: ToolSchema::new(
                "query",
                "Run a read-only structured query against one Fibery database and return the matching \
                 entities as JSON. q_from names the database, q_select maps output keys to field paths, \
                 and q_where filters using parameters from q_params.",
            )
            .with_required(
                "q_from",
                json!({"type": "string", "description": "Database to query, e.g. Product Management/Feature."}),
            )
            .with_required(
                "q_select",
                json!({"type": "object", "description": "Output keys mapped to field names or nested field paths."}),
            )
            .with_property(
                "q_where",
                json!({"type": "array", "items": {}, "description": "Filter expression, e.g. [\"=\", [\"Space/Name\"], \"$name\"]."}),
            )
            .with_property(
                "q_order_by",
                json!({"type": "array", "items": {}, "description": "Sort specification, e.g. [[[\"fibery/creation-date\"], \"q/desc\"]]."}),
            )
            .with_property(
                "q_limit",
                json!({"type": "integer", "minimum": 1, "description": "Maximum number of entities to return."}),
            )
            .with_property(
                "q_offset",
                json!({"type": "integer", "minimum": 0, "description": "Number of entities to skip."}),
            )
            .with_property(
                "q_params",
                json!({"type": "object", "description": "Values for $-prefixed parameters used in q_where."}),
            ),
        }
    }
}

impl Default for Query {
    fn default() -> Self {
        Self::new()
    }
}

fn query_value(args: &Args) -> Result<Value, ArgumentError> {
    let mut query = Map::new();
    query.insert("q/from".to_string(), json!(args.required_string("q_from")?));
    query.insert("q/select".to_string(), Value::Object(args.required_object("q_select")?.clone()));

    if let Some(filter) = args.array("q_where")? {
        query.insert("q/where".to_string(), Value::Array(filter.clone()));
    }
    if let Some(order) = args.array("q_order_by")? {
        query.insert("q/order-by".to_string(), Value::Array(order.clone()));
    }
    if let Some(limit) = args.integer("q_limit")? {
        if limit < 1 {
            return Err(ArgumentError::BelowMinimum {
                name: "q_limit".to_string(),
                min: 1,
            });
        }
        query.insert("q/limit".to_string(), json!(limit));
    }
    if let Some(offset) = args.integer("q_offset")? {
        if offset < 0 {
            return Err(ArgumentError::BelowMinimum {
                name: "q_offset".to_string(),
                min: 0,
            });
        }
        query.insert("q/offset".to_string(), json!(offset));
    }

    Ok(Value::Object(query))
}

#[async_trait]
impl Tool for Query {
    fn schema(&self) -> &ToolSchema {
        &self.schema
    }

    async fn call(&self, api: &dyn WorkspaceApi, args: Args) -> Result<ToolOutput, ToolError> {
        let query = query_value(&args)?;
        let params: QueryParams = args
            .object("q_params")?
            .map(|params| params.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
            .unwrap_or_default();

        let response = api.query(query, params).await?;
        if !response.success {
            return Ok(ToolOutput::failure(&response));
        }
        Ok(ToolOutput::text(pretty(&response.result)))
    }
}
