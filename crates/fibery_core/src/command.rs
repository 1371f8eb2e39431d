//! API command tree and response envelope.
//!
//! On the wire a command is `{"command": <tag>, "args": {...}}`. A batch
//! command carries its nested commands under `args.commands`; every nested
//! entry is itself a command, so batches may nest arbitrarily deep.

use crate::error::CommandError;
use serde::de::Error as _;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

/// Tag of the composite batch command
pub const BATCH_COMMAND: &str = "fibery.command/batch";
/// Tag of the schema catalogue query
pub const SCHEMA_QUERY_COMMAND: &str = "fibery.schema/query";
/// Tag of the structured entity query
pub const ENTITY_QUERY_COMMAND: &str = "fibery.entity/query";
/// Tag of entity creation
pub const ENTITY_CREATE_COMMAND: &str = "fibery.entity/create";
/// Tag of entity update
pub const ENTITY_UPDATE_COMMAND: &str = "fibery.entity/update";
/// Tag of single entity deletion
pub const ENTITY_DELETE_COMMAND: &str = "fibery.entity/delete";
/// Tag of bulk entity deletion
pub const ENTITY_BATCH_DELETE_COMMAND: &str = "fibery.entity.batch/delete";
/// Tag for linking items into a collection field
pub const ADD_COLLECTION_ITEMS_COMMAND: &str = "fibery.entity/add-collection-items";
/// Tag for unlinking items from a collection field
pub const REMOVE_COLLECTION_ITEMS_COMMAND: &str = "fibery.entity/remove-collection-items";

/// One API operation: a single action or an ordered batch of commands
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Single, non-composite action
    Leaf {
        /// Action tag, e.g. `fibery.entity/create`
        action: String,
        /// Action arguments
        args: Map<String, Value>,
    },
    /// Composite command executed together by the backend
    Batch {
        /// Nested commands in execution order
        commands: Vec<Command>,
        /// Batch arguments other than `commands`, forwarded as given
        args: Map<String, Value>,
    },
}

impl Command {
    /// Create a leaf command
    #[must_use]
    pub fn leaf(action: impl Into<String>, args: Map<String, Value>) -> Self {
        Self::Leaf {
            action: action.into(),
            args,
        }
    }

    /// Create a batch command
    #[must_use]
    pub fn batch(commands: Vec<Command>) -> Self {
        Self::Batch {
            commands,
            args: Map::new(),
        }
    }

    /// Create a batch command carrying extra arguments next to `commands`
    ///
    /// A `commands` key in `args` is dropped; the nested list always wins.
    #[must_use]
    pub fn batch_with_args(commands: Vec<Command>, mut args: Map<String, Value>) -> Self {
        args.remove("commands");
        Self::Batch { commands, args }
    }

    /// Wire tag of this command
    #[must_use]
    pub fn tag(&self) -> &str {
        match self {
            Self::Leaf { action, .. } => action,
            Self::Batch { .. } => BATCH_COMMAND,
        }
    }

    /// Whether this is a batch command
    #[must_use]
    pub fn is_batch(&self) -> bool {
        matches!(self, Self::Batch { .. })
    }

    /// Nested commands; empty for a leaf
    #[must_use]
    pub fn nested(&self) -> &[Command] {
        match self {
            Self::Leaf { .. } => &[],
            Self::Batch { commands, .. } => commands,
        }
    }

    /// Decode a command tree from a JSON value
    ///
    /// # Errors
    ///
    /// Returns error if the value is not a well-formed command
    pub fn from_value(value: Value) -> Result<Self, CommandError> {
        let wire: WireCommand =
            serde_json::from_value(value).map_err(|e| CommandError::Malformed(e.to_string()))?;
        Self::try_from(wire)
    }

    /// Encode the command tree as a JSON value
    #[must_use]
    pub fn to_value(&self) -> Value {
        let args = match self {
            Self::Leaf { args, .. } => Value::Object(args.clone()),
            Self::Batch { commands, args } => {
                let nested = commands.iter().map(Self::to_value).collect();
                let mut args = args.clone();
                args.insert("commands".to_string(), Value::Array(nested));
                Value::Object(args)
            }
        };
        let mut object = Map::new();
        object.insert("command".to_string(), Value::String(self.tag().to_string()));
        object.insert("args".to_string(), args);
        Value::Object(object)
    }
}

#[derive(Deserialize)]
struct WireCommand {
    command: String,
    #[serde(default)]
    args: Value,
}

impl TryFrom<WireCommand> for Command {
    type Error = CommandError;

    fn try_from(wire: WireCommand) -> Result<Self, Self::Error> {
        if wire.command.is_empty() {
            return Err(CommandError::EmptyTag);
        }

        let mut args = match wire.args {
            Value::Null => Map::new(),
            Value::Object(args) => args,
            _ => return Err(CommandError::InvalidArgs { tag: wire.command }),
        };

        if wire.command != BATCH_COMMAND {
            return Ok(Self::Leaf {
                action: wire.command,
                args,
            });
        }

        let Some(Value::Array(entries)) = args.remove("commands") else {
            return Err(CommandError::MissingBatchCommands);
        };

        let commands = entries
            .into_iter()
            .enumerate()
            .map(|(index, entry)| {
                Self::from_value(entry).map_err(|e| CommandError::InvalidNested {
                    index,
                    reason: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self::Batch { commands, args })
    }
}

impl Serialize for Command {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Command", 2)?;
        state.serialize_field("command", self.tag())?;
        match self {
            Self::Leaf { args, .. } => state.serialize_field("args", args)?,
            Self::Batch { commands, args } => state.serialize_field("args", &BatchArgs { commands, args })?,
        }
        state.end()
    }
}

#[derive(Serialize)]
struct BatchArgs<'a> {
    commands: &'a [Command],
    #[serde(flatten)]
    args: &'a Map<String, Value>,
}

impl<'de> Deserialize<'de> for Command {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let wire = WireCommand::deserialize(deserializer)?;
        Self::try_from(wire).map_err(D::Error::custom)
    }
}

/// Response envelope returned by the API for each command
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandResponse {
    /// Whether the backend (or local guard) accepted the command
    pub success: bool,
    /// Result payload, or failure description
    #[serde(default)]
    pub result: Value,
}

impl CommandResponse {
    /// Create a successful response
    #[must_use]
    pub fn success(result: Value) -> Self {
        Self {
            success: true,
            result,
        }
    }

    /// Create a failed response
    #[must_use]
    pub fn failure(result: impl Into<Value>) -> Self {
        Self {
            success: false,
            result: result.into(),
        }
    }

    /// Result rows, if the command succeeded with a list result
    #[must_use]
    pub fn rows(&self) -> Option<&[Value]> {
        match &self.result {
            Value::Array(rows) if self.success => Some(rows),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn args(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => Map::new(),
        }
    }

    #[test]
    fn test_leaf_tag() {
        let cmd = Command::leaf(ENTITY_CREATE_COMMAND, Map::new());
        assert_eq!(cmd.tag(), "fibery.entity/create");
        assert!(!cmd.is_batch());
        assert!(cmd.nested().is_empty());
    }

    #[test]
    fn test_batch_wire_shape() {
        let cmd = Command::batch(vec![
            Command::leaf(ENTITY_CREATE_COMMAND, args(json!({"type": "A/B"}))),
            Command::leaf(ENTITY_UPDATE_COMMAND, args(json!({"type": "A/B"}))),
        ]);

        let value = serde_json::to_value(&cmd).unwrap();
        assert_eq!(value["command"], "fibery.command/batch");
        assert_eq!(value["args"]["commands"][0]["command"], "fibery.entity/create");
        assert_eq!(value["args"]["commands"][1]["command"], "fibery.entity/update");
        assert_eq!(value, cmd.to_value());
    }

    #[test]
    fn test_decode_nested_batch() {
        let value = json!({
            "command": "fibery.command/batch",
            "args": {"commands": [
                {"command": "fibery.entity/create", "args": {"type": "A/B"}},
                {"command": "fibery.command/batch", "args": {"commands": [
                    {"command": "fibery.entity/delete", "args": {}}
                ]}}
            ]}
        });

        let cmd = Command::from_value(value).unwrap();
        assert!(cmd.is_batch());
        assert_eq!(cmd.nested().len(), 2);
        assert_eq!(cmd.nested()[1].nested()[0].tag(), ENTITY_DELETE_COMMAND);
    }

    #[test]
    fn test_batch_keeps_extra_args() {
        let raw = json!({
            "command": "fibery.command/batch",
            "args": {
                "commands": [{"command": "fibery.entity/create", "args": {"type": "A/B"}}],
                "options": {"atomic": true}
            }
        });

        let cmd = Command::from_value(raw.clone()).unwrap();
        assert_eq!(cmd.nested().len(), 1);
        assert_eq!(cmd.to_value(), raw);
        assert_eq!(serde_json::to_value(&cmd).unwrap(), raw);
    }

    #[test]
    fn test_decode_leaf_without_args() {
        let cmd: Command = serde_json::from_value(json!({"command": "fibery.schema/query"})).unwrap();
        assert_eq!(cmd, Command::leaf(SCHEMA_QUERY_COMMAND, Map::new()));
    }

    #[test]
    fn test_decode_batch_without_commands() {
        let result = Command::from_value(json!({"command": "fibery.command/batch", "args": {}}));
        assert_eq!(result, Err(CommandError::MissingBatchCommands));
    }

    #[test]
    fn test_decode_invalid_nested() {
        let result = Command::from_value(json!({
            "command": "fibery.command/batch",
            "args": {"commands": [{"command": "fibery.entity/create"}, {"args": {}}]}
        }));
        assert!(matches!(result, Err(CommandError::InvalidNested { index: 1, .. })));
    }

    #[test]
    fn test_decode_rejects_non_object_args() {
        let result = Command::from_value(json!({"command": "x/y", "args": [1, 2]}));
        assert!(matches!(result, Err(CommandError::InvalidArgs { .. })));
    }

    #[test]
    fn test_decode_rejects_empty_tag() {
        let result = Command::from_value(json!({"command": ""}));
        assert_eq!(result, Err(CommandError::EmptyTag));
    }

    #[test]
    fn test_response_rows() {
        let ok = CommandResponse::success(json!([{"Id": "a"}]));
        assert_eq!(ok.rows().map(<[Value]>::len), Some(1));

        let failed = CommandResponse {
            success: false,
            result: json!([{"Id": "a"}]),
        };
        assert!(failed.rows().is_none());

        let scalar = CommandResponse::success(json!({"ok": true}));
        assert!(scalar.rows().is_none());
    }

    #[test]
    fn test_response_decode_without_result() {
        let response: CommandResponse = serde_json::from_value(json!({"success": true})).unwrap();
        assert!(response.success);
        assert_eq!(response.result, Value::Null);
    }
}
