//! Tool schemas.
//!
//! Input schemas are always strict objects: `"additionalProperties": false`.

use indexmap::IndexMap;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value, json};

/// Name, description, and input schema of a tool
#[derive(Debug, Clone, PartialEq)]
pub struct ToolSchema {
    /// Tool name
    pub name: String,
    /// Human-readable description
    pub description: String,
    properties: IndexMap<String, Value>,
    required: Vec<String>,
}

impl ToolSchema {
    /// Create a schema with no properties
    #[must_use]
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            properties: IndexMap::new(),
            required: Vec::new(),
        }
    }

    /// Declare an optional property
    #[must_use]
    pub fn with_property(mut self, name: impl Into<String>, schema: Value) -> Self {
        self.properties.insert(name.into(), schema);
        self
    }

    /// Declare a required property
    #[must_use]
    pub fn with_required(mut self, name: impl Into<String>, schema: Value) -> Self {
        let name = name.into();
        self.required.push(name.clone());
        self.with_property(name, schema)
    }

    /// Whether a property is declared
    #[must_use]
    pub fn declares(&self, name: &str) -> bool {
        self.properties.contains_key(name)
    }

    /// Required property names, in declaration order
    #[must_use]
    pub fn required(&self) -> &[String] {
        &self.required
    }

    /// JSON Schema for the tool input
    #[must_use]
    pub fn input_schema(&self) -> Value {
        let mut schema = Map::new();
        schema.insert("type".to_string(), json!("object"));
        schema.insert("additionalProperties".to_string(), json!(false));
        schema.insert("properties".to_string(), json!(self.properties));
        if !self.required.is_empty() {
            schema.insert("required".to_string(), json!(self.required));
        }
        Value::Object(schema)
    }
}

impl Serialize for ToolSchema {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        json!({
            "name": self.name,
            "description": self.description,
            "inputSchema": self.input_schema(),
        })
        .serialize(serializer)
    }
}
