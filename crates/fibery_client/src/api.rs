//! Workspace API seam used by the resolver and the tool layer.

use crate::error::ClientError;
use crate::requests;
use async_trait::async_trait;
use fibery_core::{Command, CommandResponse, QueryParams, Schema};
use serde_json::Value;

/// Operations the tool layer needs from a workspace
///
/// Only [`execute_command`](Self::execute_command) is required; the other
/// operations are built on it so they cannot bypass the command guard.
#[async_trait]
pub trait WorkspaceApi: Send + Sync {
    /// Guard a command tree and, if allowed, send it as one request
    ///
    /// # Errors
    ///
    /// Returns error only on transport failure; guard rejections and backend
    /// failures are reported in the response
    async fn execute_command(&self, command: Command) -> Result<CommandResponse, ClientError>;

    /// Run a structured query
    ///
    /// # Errors
    ///
    /// Returns error on transport failure
    async fn query(&self, query: Value, params: QueryParams) -> Result<CommandResponse, ClientError> {
        self.execute_command(requests::entity_query(query, params)).await
    }

    /// Fetch and parse the workspace schema
    ///
    /// # Errors
    ///
    /// Returns error on transport failure, backend failure, or a malformed catalogue
    async fn get_schema(&self) -> Result<Schema, ClientError> {
        let response = self.execute_command(requests::schema_query()).await?;
        if !response.success {
            return Err(ClientError::Backend(describe(&response.result)));
        }
        Ok(Schema::load(&response.result)?)
    }
}

fn describe(result: &Value) -> String {
    match result {
        Value::String(message) => message.clone(),
        Value::Object(object) => object
            .get("message")
            .and_then(Value::as_str)
            .map_or_else(|| result.to_string(), str::to_string),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Mutex;

    struct ScriptedApi {
        response: CommandResponse,
        seen: Mutex<Vec<Command>>,
    }

    #[async_trait]
    impl WorkspaceApi for ScriptedApi {
        async fn execute_command(&self, command: Command) -> Result<CommandResponse, ClientError> {
            self.seen.lock().unwrap().push(command);
            Ok(self.response.clone())
        }
    }

    fn scripted(response: CommandResponse) -> ScriptedApi {
        ScriptedApi {
            response,
            seen: Mutex::new(Vec::new()),
        }
    }

    #[tokio::test]
    async fn test_get_schema_parses_result() {
        let api = scripted(CommandResponse::success(json!({
            "fibery/types": [{"fibery/name": "A/B", "fibery/fields": []}]
        })));
        let schema = api.get_schema().await.unwrap();
        assert_eq!(schema.databases()[0].name, "A/B");
        assert_eq!(api.seen.lock().unwrap()[0].tag(), "fibery.schema/query");
    }

    #[tokio::test]
    async fn test_get_schema_backend_failure() {
        let api = scripted(CommandResponse::failure(json!({"message": "forbidden"})));
        let result = api.get_schema().await;
        assert!(matches!(result, Err(ClientError::Backend(msg)) if msg == "forbidden"));
    }

    #[tokio::test]
    async fn test_get_schema_malformed() {
        let api = scripted(CommandResponse::success(json!({"unexpected": true})));
        assert!(matches!(api.get_schema().await, Err(ClientError::Schema(_))));
    }

    #[tokio::test]
    async fn test_query_routes_through_execute_command() {
        let api = scripted(CommandResponse::success(json!([])));
        api.query(json!({"q/from": "A/B"}), QueryParams::new()).await.unwrap();
        let seen = api.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].tag(), "fibery.entity/query");
    }
}
