//! Command builders for the operations the tool layer performs.
//!
//! Builders are pure; sending goes through [`WorkspaceApi::execute_command`](crate::WorkspaceApi::execute_command).

use fibery_core::command::{
    ADD_COLLECTION_ITEMS_COMMAND, ENTITY_CREATE_COMMAND, ENTITY_QUERY_COMMAND,
    ENTITY_UPDATE_COMMAND, REMOVE_COLLECTION_ITEMS_COMMAND, SCHEMA_QUERY_COMMAND,
};
use fibery_core::schema::ID_FIELD;
use fibery_core::{Command, QueryParams};
use serde_json::{Map, Value, json};

/// Entity payload: qualified field name to value
pub type Entity = Map<String, Value>;

fn args(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

/// Fetch the type catalogue
#[must_use]
pub fn schema_query() -> Command {
    Command::leaf(SCHEMA_QUERY_COMMAND, Map::new())
}

/// Run a structured query; `params` is omitted when empty
#[must_use]
pub fn entity_query(query: Value, params: QueryParams) -> Command {
    let mut map = Map::new();
    map.insert("query".to_string(), query);
    if !params.is_empty() {
        map.insert("params".to_string(), json!(params));
    }
    Command::leaf(ENTITY_QUERY_COMMAND, map)
}

/// Create one entity
#[must_use]
pub fn create_entity(database: &str, entity: Entity) -> Command {
    Command::leaf(ENTITY_CREATE_COMMAND, args(json!({"type": database, "entity": entity})))
}

/// Create several entities in one batch
#[must_use]
pub fn create_entities(database: &str, entities: Vec<Entity>) -> Command {
    Command::batch(
        entities
            .into_iter()
            .map(|entity| create_entity(database, entity))
            .collect(),
    )
}

/// Update one entity; the payload carries its `fibery/id`
#[must_use]
pub fn update_entity(database: &str, entity: Entity) -> Command {
    Command::leaf(ENTITY_UPDATE_COMMAND, args(json!({"type": database, "entity": entity})))
}

/// Update several entities in one batch
#[must_use]
pub fn update_entities_batch(database: &str, entities: Vec<Entity>) -> Command {
    Command::batch(
        entities
            .into_iter()
            .map(|entity| update_entity(database, entity))
            .collect(),
    )
}

fn collection_items(tag: &str, database: &str, entity_id: &str, field: &str, item_ids: &[String]) -> Command {
    let items: Vec<Value> = item_ids.iter().map(|id| json!({ ID_FIELD: id })).collect();
    Command::leaf(
        tag,
        args(json!({
            "type": database,
            "field": field,
            "entity": { ID_FIELD: entity_id },
            "items": items,
        })),
    )
}

/// Link related entities into a collection field
#[must_use]
pub fn add_collection_items(database: &str, entity_id: &str, field: &str, item_ids: &[String]) -> Command {
    collection_items(ADD_COLLECTION_ITEMS_COMMAND, database, entity_id, field, item_ids)
}

/// Unlink related entities from a collection field
#[must_use]
pub fn remove_collection_items(database: &str, entity_id: &str, field: &str, item_ids: &[String]) -> Command {
    collection_items(REMOVE_COLLECTION_ITEMS_COMMAND, database, entity_id, field, item_ids)
}
