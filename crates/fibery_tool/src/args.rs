//! Tool argument validation.
//!
//! Null values count as absent. Empty strings and empty arrays count as
//! absent for required accessors.

use crate::error::ArgumentError;
use crate::schema::ToolSchema;
use fibery_client::requests::Entity;
use serde_json::{Map, Value};

/// Validated tool arguments
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Args {
    values: Map<String, Value>,
}

impl Args {
    /// Check raw arguments against a schema
    ///
    /// `null` stands for no arguments.
    ///
    /// # Errors
    ///
    /// Returns error if the value is not an object or carries an undeclared key
    pub fn parse(schema: &ToolSchema, raw: Value) -> Result<Self, ArgumentError> {
        let values = match raw {
            Value::Object(values) => values,
            Value::Null => Map::new(),
            _ => return Err(ArgumentError::NotAnObject),
        };

        if let Some(name) = values.keys().find(|name| !schema.declares(name)) {
            return Err(ArgumentError::Unknown { name: name.clone() });
        }

        Ok(Self { values })
    }

    /// Raw value, `None` when absent or null
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name).filter(|value| !value.is_null())
    }

    /// Whether the argument is exactly JSON `true`
    #[must_use]
    pub fn flag(&self, name: &str) -> bool {
        matches!(self.get(name), Some(Value::Bool(true)))
    }

    /// Optional boolean
    ///
    /// # Errors
    ///
    /// Returns error if present but not a boolean
    pub fn boolean(&self, name: &str) -> Result<Option<bool>, ArgumentError> {
        self.get(name)
            .map(|value| value.as_bool().ok_or_else(|| wrong_type(name, "a boolean")))
            .transpose()
    }

    /// Optional string; an empty string counts as absent
    ///
    /// # Errors
    ///
    /// Returns error if present but not a string
    pub fn string(&self, name: &str) -> Result<Option<&str>, ArgumentError> {
        let text = self
            .get(name)
            .map(|value| value.as_str().ok_or_else(|| wrong_type(name, "a string")))
            .transpose()?;
        Ok(text.filter(|text| !text.is_empty()))
    }

    /// Required non-empty string
    ///
    /// # Errors
    ///
    /// Returns error if absent, empty, or not a string
    pub fn required_string(&self, name: &str) -> Result<&str, ArgumentError> {
        self.string(name)?.ok_or_else(|| missing(name))
    }

    /// Optional integer
    ///
    /// # Errors
    ///
    /// Returns error if present but not an integer
    pub fn integer(&self, name: &str) -> Result<Option<i64>, ArgumentError> {
        self.get(name)
            .map(|value| value.as_i64().ok_or_else(|| wrong_type(name, "an integer")))
            .transpose()
    }

    /// Optional array
    ///
    /// # Errors
    ///
    /// Returns error if present but not an array
    pub fn array(&self, name: &str) -> Result<Option<&Vec<Value>>, ArgumentError> {
        self.get(name)
            .map(|value| value.as_array().ok_or_else(|| wrong_type(name, "an array")))
            .transpose()
    }

    /// Optional object
    ///
    /// # Errors
    ///
    /// Returns error if present but not an object
    pub fn object(&self, name: &str) -> Result<Option<&Map<String, Value>>, ArgumentError> {
        self.get(name)
            .map(|value| value.as_object().ok_or_else(|| wrong_type(name, "an object")))
            .transpose()
    }

    /// Required object
    ///
    /// # Errors
    ///
    /// Returns error if absent or not an object
    pub fn required_object(&self, name: &str) -> Result<&Map<String, Value>, ArgumentError> {
        self.object(name)?.ok_or_else(|| missing(name))
    }

    /// Required non-empty array of strings
    ///
    /// # Errors
    ///
    /// Returns error if absent, empty, or holding a non-string
    pub fn strings(&self, name: &str) -> Result<Vec<String>, ArgumentError> {
        let items = self.array(name)?.filter(|items| !items.is_empty()).ok_or_else(|| missing(name))?;
        items
            .iter()
            .map(|item| {
                item.as_str()
                    .map(str::to_string)
                    .ok_or_else(|| wrong_type(name, "an array of strings"))
            })
            .collect()
    }

    /// Required non-empty array of entity objects
    ///
    /// # Errors
    ///
    /// Returns error if absent, empty, or holding a non-object
    pub fn entities(&self, name: &str) -> Result<Vec<Entity>, ArgumentError> {
        let items = self.array(name)?.filter(|items| !items.is_empty()).ok_or_else(|| missing(name))?;
        items
            .iter()
            .map(|item| {
                item.as_object()
                    .cloned()
                    .ok_or_else(|| wrong_type(name, "an array of objects"))
            })
            .collect()
    }
}

fn missing(name: &str) -> ArgumentError {
    ArgumentError::Missing { name: name.to_string() }
}

fn wrong_type(name: &str, expected: &'static str) -> ArgumentError {
    ArgumentError::WrongType {
        name: name.to_string(),
        expected,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn schema() -> ToolSchema {
        ToolSchema::new("demo", "Demo")
            .with_required("database", json!({"type": "string"}))
            .with_property("flag", json!({"type": "boolean"}))
            .with_property("limit", json!({"type": "integer"}))
            .with_property("item_ids", json!({"type": "array"}))
            .with_property("entities", json!({"type": "array"}))
    }

    #[test]
    fn test_rejects_unknown_argument() {
        let err = Args::parse(&schema(), json!({"database": "A/B", "extra": 1})).unwrap_err();
        assert_eq!(err, ArgumentError::Unknown { name: "extra".to_string() });
    }

    #[test]
    fn test_rejects_non_object() {
        assert_eq!(Args::parse(&schema(), json!([1])).unwrap_err(), ArgumentError::NotAnObject);
        assert!(Args::parse(&schema(), Value::Null).is_ok());
    }

    #[test]
    fn test_flag_only_true() {
        let args = Args::parse(&schema(), json!({"flag": "false"})).unwrap();
        assert!(!args.flag("flag"));
        let args = Args::parse(&schema(), json!({"flag": "true"})).unwrap();
        assert!(!args.flag("flag"));
        let args = Args::parse(&schema(), json!({"flag": true})).unwrap();
        assert!(args.flag("flag"));
    }

    #[test]
    fn test_required_string() {
        let args = Args::parse(&schema(), json!({"database": ""})).unwrap();
        assert_eq!(
            args.required_string("database").unwrap_err().to_string(),
            "database is not provided"
        );
        let args = Args::parse(&schema(), json!({"database": 4})).unwrap();
        assert_eq!(
            args.required_string("database").unwrap_err().to_string(),
            "database must be a string"
        );
    }

    #[test]
    fn test_null_is_absent() {
        let args = Args::parse(&schema(), json!({"limit": null})).unwrap();
        assert_eq!(args.integer("limit").unwrap(), None);
    }

    #[test]
    fn test_strings() {
        let args = Args::parse(&schema(), json!({"item_ids": ["a", "b"]})).unwrap();
        assert_eq!(args.strings("item_ids").unwrap(), ["a", "b"]);

        let args = Args::parse(&schema(), json!({"item_ids": []})).unwrap();
        assert!(matches!(args.strings("item_ids"), Err(ArgumentError::Missing { .. })));

        let args = Args::parse(&schema(), json!({"item_ids": ["a", 1]})).unwrap();
        assert!(matches!(args.strings("item_ids"), Err(ArgumentError::WrongType { .. })));
    }

    #[test]
    fn test_entities() {
        let args = Args::parse(&schema(), json!({"entities": [{"A/Name": "x"}]})).unwrap();
        assert_eq!(args.entities("entities").unwrap().len(), 1);

        let args = Args::parse(&schema(), json!({"entities": ["x"]})).unwrap();
        assert!(matches!(args.entities("entities"), Err(ArgumentError::WrongType { .. })));
    }
}
