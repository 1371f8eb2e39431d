//! Identity query builder and resolver.
//!
//! Candidates are queried one at a time, in selector order, until the caller's
//! limit is reached. Ids are deduplicated across candidates and the first
//! record seen for an id wins.

use crate::selector::{Candidate, LookupKind, candidate_databases};
use fibery_client::{ClientError, WorkspaceApi};
use fibery_core::schema::ID_FIELD;
use fibery_core::{Filter, QueryParams, StructuredQuery};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use tracing::{debug, warn};

/// Default number of identities returned
pub const DEFAULT_LIMIT: usize = 10;

/// Output key for the id field
pub const ID_KEY: &str = "Id";
/// Output key for the email field
pub const EMAIL_KEY: &str = "Email";
/// Output key for the name field
pub const NAME_KEY: &str = "Name";

const EMAIL_PARAM: &str = "$email";
const NAME_PARAM: &str = "$name";

/// Identity resolution error
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// Neither email nor name given
    #[error("either email or name must be provided")]
    MissingCriterion,

    /// Limit below one
    #[error("limit must be at least 1")]
    InvalidLimit,

    /// No database can answer the lookup
    #[error("unable to identify a user database in this workspace")]
    NoCandidates,

    /// Schema could not be fetched or parsed
    #[error(transparent)]
    Client(#[from] ClientError),
}

/// Free-text identity lookup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityQuery {
    /// Email to match exactly
    pub email: Option<String>,
    /// Name to match by substring
    pub name: Option<String>,
    /// Maximum number of identities
    pub limit: usize,
}

impl IdentityQuery {
    /// Lookup by email
    #[must_use]
    pub fn by_email(email: impl Into<String>) -> Self {
        Self {
            email: Some(email.into()),
            name: None,
            limit: DEFAULT_LIMIT,
        }
    }

    /// Lookup by name
    #[must_use]
    pub fn by_name(name: impl Into<String>) -> Self {
        Self {
            email: None,
            name: Some(name.into()),
            limit: DEFAULT_LIMIT,
        }
    }

    /// Set the limit
    #[must_use]
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Criteria this lookup uses
    #[must_use]
    pub fn kind(&self) -> LookupKind {
        LookupKind {
            email: self.email.is_some(),
            name: self.name.is_some(),
        }
    }

    /// Check the lookup before any network access
    ///
    /// # Errors
    ///
    /// Returns error if no criterion is given or the limit is zero
    pub fn validate(&self) -> Result<(), ResolveError> {
        if self.email.is_none() && self.name.is_none() {
            return Err(ResolveError::MissingCriterion);
        }
        if self.limit < 1 {
            return Err(ResolveError::InvalidLimit);
        }
        Ok(())
    }

    /// Build the query for one candidate, asking for at most `remaining` rows
    ///
    /// Returns `None` when the candidate lacks a field the lookup needs.
    #[must_use]
    pub fn build_for(&self, candidate: &Candidate<'_>, remaining: usize) -> Option<(StructuredQuery, QueryParams)> {
        let mut conditions = Vec::new();
        let mut params = QueryParams::new();

        if let Some(email) = &self.email {
            let field = candidate.fields.email?;
            conditions.push(Filter::eq(field, EMAIL_PARAM));
            params.insert(EMAIL_PARAM.to_string(), Value::String(email.clone()));
        }
        if let Some(name) = &self.name {
            let field = candidate.fields.name?;
            conditions.push(Filter::contains(field, NAME_PARAM));
            params.insert(NAME_PARAM.to_string(), Value::String(name.clone()));
        }

        let mut query = StructuredQuery::new(candidate.database.name.clone(), remaining).select(ID_KEY, ID_FIELD);
        if let Some(field) = candidate.fields.email {
            query = query.select(EMAIL_KEY, field);
        }
        if let Some(field) = candidate.fields.name {
            query = query.select(NAME_KEY, field);
        }

        Some((query.with_filter(Filter::all(conditions)), params))
    }
}

/// Canonical identity record
///
/// Email and name are kept as the backend returned them, so rich-text or
/// other non-string field values pass through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedUser {
    /// Entity id
    #[serde(rename = "fibery/id")]
    pub id: String,
    /// Email, if the source database has one
    pub email: Option<Value>,
    /// Display name, if the source database has one
    pub name: Option<Value>,
}

impl ResolvedUser {
    fn from_row(row: &Value) -> Option<Self> {
        let row = row.as_object()?;
        let id = row.get(ID_KEY)?.as_str()?;
        let field = |key: &str| row.get(key).filter(|value| !value.is_null()).cloned();

        Some(Self {
            id: id.to_string(),
            email: field(EMAIL_KEY),
            name: field(NAME_KEY),
        })
    }
}

/// Append rows as users, skipping unusable rows and already-seen ids, until `limit`
fn merge_rows(rows: &[Value], seen: &mut HashSet<String>, users: &mut Vec<ResolvedUser>, limit: usize) {
    for row in rows {
        if users.len() >= limit {
            break;
        }
        let Some(user) = ResolvedUser::from_row(row) else {
            continue;
        };
        if seen.insert(user.id.clone()) {
            users.push(user);
        }
    }
}

/// Resolves identity lookups against a workspace
pub struct IdentityResolver<'a, A: WorkspaceApi + ?Sized> {
    api: &'a A,
}

impl<'a, A: WorkspaceApi + ?Sized> IdentityResolver<'a, A> {
    /// Create a resolver over an API
    #[must_use]
    pub fn new(api: &'a A) -> Self {
        Self { api }
    }

    /// Resolve a lookup into at most `limit` unique identities
    ///
    /// Candidate query failures are logged and skipped.
    ///
    /// # Errors
    ///
    /// Returns error on invalid input, schema fetch failure, or when no
    /// database can answer the lookup
    pub async fn resolve(&self, request: &IdentityQuery) -> Result<Vec<ResolvedUser>, ResolveError> {
        request.validate()?;

        let schema = self.api.get_schema().await?;
        let candidates = candidate_databases(&schema, request.kind());
        if candidates.is_empty() {
            return Err(ResolveError::NoCandidates);
        }

        let mut users = Vec::new();
        let mut seen = HashSet::new();

        for candidate in &candidates {
            if users.len() >= request.limit {
                break;
            }

            let Some((query, params)) = request.build_for(candidate, request.limit - users.len()) else {
                continue;
            };

            let database = candidate.database.name.as_str();
            let response = match self.api.query(query.to_value(), params).await {
                Ok(response) => response,
                Err(err) => {
                    warn!(database, error = %err, "identity query failed");
                    continue;
                }
            };

            let Some(rows) = response.rows() else {
                warn!(database, result = %response.result, "identity query returned no rows");
                continue;
            };

            debug!(database, rows = rows.len(), "identity query answered");
            merge_rows(rows, &mut seen, &mut users, request.limit);
        }

        Ok(users)
    }
}
