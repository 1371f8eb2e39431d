//! Workspace schema model.
//!
//! A [`Schema`] is an immutable snapshot of the workspace type catalogue,
//! parsed once from the `fibery.schema/query` result. Databases and their
//! fields keep catalogue order.

use crate::error::SchemaError;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Field present on every entity that has a usable identity
pub const ID_FIELD: &str = "fibery/id";

/// Key holding a catalogue entry's qualified name
const NAME_KEY: &str = "fibery/name";
/// Key holding a field's type
const TYPE_KEY: &str = "fibery/type";
/// Key holding the type list of the catalogue
const TYPES_KEY: &str = "fibery/types";
/// Key holding a database's field list
const FIELDS_KEY: &str = "fibery/fields";

/// Namespaces reserved for platform-internal collections
pub const SYSTEM_PREFIXES: &[&str] = &[
    "fibery/",
    "workflow/",
    "comments/",
    "files/",
    "notifications/",
    "Collaboration~Documents/",
];

/// Metadata for one field of a database
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    /// Qualified field name, e.g. `People/Email`
    pub name: String,
    /// Field type, e.g. `fibery/text`
    pub field_type: Option<String>,
}

/// One entity-type collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Database {
    /// Qualified name in `Space/Type` form
    pub name: String,
    /// Fields by qualified name, in catalogue order
    pub fields: IndexMap<String, Field>,
}

impl Database {
    /// Create a database from its name and ordered fields
    #[must_use]
    pub fn new(name: impl Into<String>, fields: impl IntoIterator<Item = Field>) -> Self {
        Self {
            name: name.into(),
            fields: fields.into_iter().map(|f| (f.name.clone(), f)).collect(),
        }
    }

    /// Whether the database lives in a reserved namespace
    #[must_use]
    pub fn is_system(&self) -> bool {
        SYSTEM_PREFIXES.iter().any(|prefix| self.name.starts_with(prefix))
    }

    /// Whether the database exposes the `fibery/id` field
    #[must_use]
    pub fn has_id_field(&self) -> bool {
        self.fields.contains_key(ID_FIELD)
    }

    /// Field names in catalogue order
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    fn parse(index: usize, entry: &Value) -> Result<Self, SchemaError> {
        let object = entry.as_object().ok_or(SchemaError::InvalidEntry { index })?;
        let name = object
            .get(NAME_KEY)
            .and_then(Value::as_str)
            .filter(|name| !name.is_empty())
            .ok_or(SchemaError::MissingName { index })?;

        let mut fields = IndexMap::new();
        let raw_fields = object.get(FIELDS_KEY).and_then(Value::as_array);
        for (field_index, raw) in raw_fields.into_iter().flatten().enumerate() {
            let field_name = raw
                .get(NAME_KEY)
                .and_then(Value::as_str)
                .filter(|name| !name.is_empty())
                .ok_or_else(|| SchemaError::MissingFieldName {
                    database: name.to_string(),
                    index: field_index,
                })?;
            let field_type = raw.get(TYPE_KEY).and_then(Value::as_str).map(str::to_string);
            fields.insert(
                field_name.to_string(),
                Field {
                    name: field_name.to_string(),
                    field_type,
                },
            );
        }

        Ok(Self {
            name: name.to_string(),
            fields,
        })
    }
}

/// Immutable snapshot of the workspace type catalogue
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    databases: Vec<Database>,
}

impl Schema {
    /// Build a schema from already-parsed databases
    #[must_use]
    pub fn new(databases: Vec<Database>) -> Self {
        Self { databases }
    }

    /// Parse the raw `fibery.schema/query` result
    ///
    /// # Errors
    ///
    /// Returns error if the catalogue or any of its entries is malformed
    pub fn load(raw: &Value) -> Result<Self, SchemaError> {
        let object = raw.as_object().ok_or(SchemaError::NotAnObject)?;
        let types = object
            .get(TYPES_KEY)
            .and_then(Value::as_array)
            .ok_or(SchemaError::MissingTypes)?;

        let databases = types
            .iter()
            .enumerate()
            .map(|(index, entry)| Database::parse(index, entry))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { databases })
    }

    /// All databases in catalogue order
    #[must_use]
    pub fn databases(&self) -> &[Database] {
        &self.databases
    }

    /// Databases in catalogue order, skipping system ones unless requested
    #[must_use]
    pub fn include(&self, system: bool) -> Vec<&Database> {
        self.databases
            .iter()
            .filter(|db| system || !db.is_system())
            .collect()
    }

    /// Look up a database by its qualified name
    #[must_use]
    pub fn database(&self, name: &str) -> Option<&Database> {
        self.databases.iter().find(|db| db.name == name)
    }
}
