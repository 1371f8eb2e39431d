//! Identity lookup tool built on the schema-driven resolver.

use crate::args::Args;
use crate::error::{ArgumentError, ToolError};
use crate::schema::ToolSchema;
use crate::trait_::{Tool, ToolOutput};
use async_trait::async_trait;
use fibery_client::WorkspaceApi;
use fibery_identity::resolver::DEFAULT_LIMIT;
use fibery_identity::{IdentityQuery, IdentityResolver, ResolveError};
use serde_json::json;

/// Largest accepted `limit`
pub const MAX_LIMIT: i64 = 100;

/// Find user identities by email or name
pub struct ResolveUser {
    schema: ToolSchema,
}

impl ResolveUser {
    /// Create the tool
    #[must_use]
    pub fn new() -> Self {
        Self {
            schema: ToolSchema::new(
                "resolve_user",
                "Find users by email (exact match) or name (substring match) and return their fibery/id, \
                 email and name. The user database and its fields are detected from the workspace schema.",
            )
            .with_property("email", json!({"type": "string", "description": "Email address to match exactly."}))
            .with_property("name", json!({"type": "string", "description": "Name fragment to match."}))
            .with_property(
                "limit",
                json!({
                    "type": "integer",
                    "minimum": 1,
                    "maximum": MAX_LIMIT,
                    "default": DEFAULT_LIMIT,
                    "description": "Maximum number of identities to return.",
                }),
            ),
        }
    }
}

impl Default for ResolveUser {
    fn default() -> Self {
        Self::new()
    }
}

fn identity_query(args: &Args) -> Result<IdentityQuery, ToolError> {
    let email = args.string("email")?.map(str::to_string);
    let name = args.string("name")?.map(str::to_string);
    if email.is_none() && name.is_none() {
        return Err(ResolveError::MissingCriterion.into());
    }

    let limit = args.integer("limit")?.unwrap_or(DEFAULT_LIMIT as i64);
    if limit < 1 {
        return Err(ResolveError::InvalidLimit.into());
    }
    if limit > MAX_LIMIT {
        return Err(ArgumentError::AboveMaximum {
            name: "limit".to_string(),
            max: MAX_LIMIT,
        }
        .into());
    }

    Ok(IdentityQuery {
        email,
        name,
        limit: usize::try_from(limit).unwrap_or(DEFAULT_LIMIT),
    })
}

#[async_trait]
impl Tool for ResolveUser {
    fn schema(&self) -> &ToolSchema {
        &self.schema
    }

    async fn call(&self, api: &dyn WorkspaceApi, args: Args) -> Result<ToolOutput, ToolError> {
        let request = identity_query(&args)?;
        let users = IdentityResolver::new(api).resolve(&request).await?;
        Ok(ToolOutput::text(json!(users).to_string()))
    }
}
