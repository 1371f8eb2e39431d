//! Bridge tools.
//!
//! Tools that write to the workspace take explicit confirmation flags for
//! bulk and removal operations. None of them builds a delete command.

mod collection;
mod current_date;
mod entity;
mod entity_batch;
mod list_databases;
mod query;
mod resolve_user;

pub use collection::{UnlinkCollection, UpdateCollection};
pub use current_date::CurrentDate;
pub use entity::{CreateEntity, UpdateEntity};
pub use entity_batch::{CreateEntitiesBatch, UpdateEntitiesBatch};
pub use list_databases::ListDatabases;
pub use query::Query;
pub use resolve_user::ResolveUser;

use crate::error::ToolError;
use crate::trait_::Tool;
use fibery_client::WorkspaceApi;
use serde_json::{Value, json};
use std::sync::Arc;

/// Every bridge tool, in listing order
#[must_use]
pub fn all() -> Vec<Arc<dyn Tool>> {
    vec![
        Arc::new(CurrentDate::new()),
        Arc::new(ListDatabases::new()),
        Arc::new(Query::new()),
        Arc::new(ResolveUser::new()),
        Arc::new(CreateEntity::new()),
        Arc::new(CreateEntitiesBatch::new()),
        Arc::new(UpdateEntity::new()),
        Arc::new(UpdateEntitiesBatch::new()),
        Arc::new(UpdateCollection::new()),
        Arc::new(UnlinkCollection::new()),
    ]
}

fn database_property(purpose: &str) -> Value {
    json!({
        "type": "string",
        "description": format!("Fibery Database {purpose}, in Space/Type form."),
    })
}

/// Fail unless the schema lists the database
async fn ensure_database(api: &dyn WorkspaceApi, database: &str) -> Result<(), ToolError> {
    let schema = api.get_schema().await?;
    if schema.database(database).is_none() {
        return Err(ToolError::UnknownDatabase {
            name: database.to_string(),
        });
    }
    Ok(())
}

/// Pretty JSON, falling back to compact text
fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}
