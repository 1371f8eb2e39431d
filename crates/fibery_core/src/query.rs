//! Structured entity queries.
//!
//! Only the query shapes built locally are typed here. Queries supplied by
//! callers stay opaque JSON values and are passed through untouched.

use indexmap::IndexMap;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value, json};
use std::collections::BTreeMap;

/// Named parameter values referenced from a filter, keyed `$name`
pub type QueryParams = BTreeMap<String, Value>;

/// Filter expression tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    /// Field equals the named parameter
    Eq {
        /// Qualified field name
        field: String,
        /// Parameter reference, e.g. `$email`
        param: String,
    },
    /// Field contains the named parameter as a substring
    Contains {
        /// Qualified field name
        field: String,
        /// Parameter reference
        param: String,
    },
    /// All sub-expressions hold
    And(Vec<Filter>),
}

impl Filter {
    /// Equality condition
    #[must_use]
    pub fn eq(field: impl Into<String>, param: impl Into<String>) -> Self {
        Self::Eq {
            field: field.into(),
            param: param.into(),
        }
    }

    /// Substring condition
    #[must_use]
    pub fn contains(field: impl Into<String>, param: impl Into<String>) -> Self {
        Self::Contains {
            field: field.into(),
            param: param.into(),
        }
    }

    /// Combine conditions; a single condition is returned as-is
    #[must_use]
    pub fn all(mut conditions: Vec<Filter>) -> Option<Self> {
        match conditions.len() {
            0 => None,
            1 => conditions.pop(),
            _ => Some(Self::And(conditions)),
        }
    }

    /// Encode in the API's prefix-array form
    #[must_use]
    pub fn to_value(&self) -> Value {
        match self {
            Self::Eq { field, param } => json!(["=", [field], param]),
            Self::Contains { field, param } => json!(["q/contains", [field], param]),
            Self::And(conditions) => {
                let mut items = vec![Value::String("q/and".to_string())];
                items.extend(conditions.iter().map(Self::to_value));
                Value::Array(items)
            }
        }
    }
}

impl Serialize for Filter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

/// Query over one database
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructuredQuery {
    /// Source database
    pub from: String,
    /// Output key to source field
    pub select: IndexMap<String, String>,
    /// Optional filter
    pub filter: Option<Filter>,
    /// Maximum number of rows
    pub limit: usize,
}

impl StructuredQuery {
    /// Start a query over a database
    #[must_use]
    pub fn new(from: impl Into<String>, limit: usize) -> Self {
        Self {
            from: from.into(),
            select: IndexMap::new(),
            filter: None,
            limit,
        }
    }

    /// Select a source field under an output key
    #[must_use]
    pub fn select(mut self, key: impl Into<String>, field: impl Into<String>) -> Self {
        self.select.insert(key.into(), field.into());
        self
    }

    /// Set the filter
    #[must_use]
    pub fn with_filter(mut self, filter: Option<Filter>) -> Self {
        self.filter = filter;
        self
    }

    /// Encode using the `q/*` keys the API expects
    #[must_use]
    pub fn to_value(&self) -> Value {
        let select: Map<String, Value> = self
            .select
            .iter()
            .map(|(key, field)| (key.clone(), Value::String(field.clone())))
            .collect();

        let mut query = Map::new();
        query.insert("q/from".to_string(), Value::String(self.from.clone()));
        query.insert("q/select".to_string(), Value::Object(select));
        if let Some(filter) = &self.filter {
            query.insert("q/where".to_string(), filter.to_value());
        }
        query.insert("q/limit".to_string(), json!(self.limit));
        Value::Object(query)
    }
}

impl Serialize for StructuredQuery {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_eq_shape() {
        let filter = Filter::eq("Directory/Email", "$email");
        assert_eq!(filter.to_value(), json!(["=", ["Directory/Email"], "$email"]));
    }

    #[test]
    fn test_filter_all_collapses() {
        assert_eq!(Filter::all(Vec::new()), None);

        let single = Filter::all(vec![Filter::contains("A/Name", "$name")]).unwrap();
        assert_eq!(single, Filter::contains("A/Name", "$name"));

        let both = Filter::all(vec![
            Filter::eq("A/Email", "$email"),
            Filter::contains("A/Name", "$name"),
        ])
        .unwrap();
        assert_eq!(
            both.to_value(),
            json!(["q/and", ["=", ["A/Email"], "$email"], ["q/contains", ["A/Name"], "$name"]])
        );
    }

    #[test]
    fn test_query_shape() {
        let query = StructuredQuery::new("People/User", 5)
            .select("Id", "fibery/id")
            .select("Name", "People/Name")
            .with_filter(Some(Filter::contains("People/Name", "$name")));

        let value = serde_json::to_value(&query).unwrap();
        assert_eq!(value["q/from"], "People/User");
        assert_eq!(value["q/select"], json!({"Id": "fibery/id", "Name": "People/Name"}));
        assert_eq!(value["q/where"][0], "q/contains");
        assert_eq!(value["q/limit"], 5);
    }

    #[test]
    fn test_query_without_filter_has_no_where() {
        let query = StructuredQuery::new("People/User", 1).select("Id", "fibery/id");
        assert!(query.to_value().get("q/where").is_none());
    }

    proptest::proptest! {
        #[test]
        fn prop_all_keeps_every_condition(fields in proptest::collection::vec("[A-Z][a-z]{1,6}/[A-Z][a-z]{1,6}", 0..6)) {
            let conditions: Vec<Filter> = fields.iter().map(|f| Filter::eq(f.as_str(), "$p")).collect();
            match Filter::all(conditions.clone()) {
                None => proptest::prop_assert!(fields.is_empty()),
                Some(Filter::And(inner)) => {
                    proptest::prop_assert!(fields.len() > 1);
                    proptest::prop_assert_eq!(inner, conditions);
                }
                Some(single) => {
                    proptest::prop_assert_eq!(fields.len(), 1);
                    proptest::prop_assert_eq!(single, conditions[0].clone());
                }
            }
        }
    }
}
