//! Tool registry for discovery and dispatch.

use crate::args::Args;
use crate::error::RegistryError;
use crate::schema::ToolSchema;
use crate::tools;
use crate::trait_::{Tool, ToolOutput};
use fibery_client::WorkspaceApi;
use indexmap::IndexMap;
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, warn};

/// Registry of tools by name, in registration order
pub struct ToolRegistry {
    tools: IndexMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    /// Create a new empty registry
    #[must_use]
    pub fn new() -> Self {
        Self { tools: IndexMap::new() }
    }

    /// Registry holding every bridge tool
    #[must_use]
    pub fn standard() -> Self {
        let mut registry = Self::new();
        for tool in tools::all() {
            let name = tool.name().to_string();
            registry.tools.insert(name, tool);
        }
        registry
    }

    /// Register a tool
    ///
    /// # Errors
    ///
    /// Returns error if the name is already taken
    pub fn register(&mut self, tool: Arc<dyn Tool>) -> Result<(), RegistryError> {
        let name = tool.name().to_string();
        if self.tools.contains_key(&name) {
            return Err(RegistryError::AlreadyRegistered { name });
        }
        self.tools.insert(name, tool);
        Ok(())
    }

    /// Get a tool by name
    ///
    /// # Errors
    ///
    /// Returns error if tool not found
    pub fn get(&self, name: &str) -> Result<Arc<dyn Tool>, RegistryError> {
        self.tools
            .get(name)
            .map(Arc::clone)
            .ok_or_else(|| RegistryError::NotFound { name: name.to_string() })
    }

    /// Registered tool names
    #[must_use]
    pub fn list(&self) -> Vec<String> {
        self.tools.keys().cloned().collect()
    }

    /// Schemas of every tool, in registration order
    pub fn schemas(&self) -> impl Iterator<Item = &ToolSchema> {
        self.tools.values().map(|tool| tool.schema())
    }

    /// Check if a tool is registered
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Number of registered tools
    #[must_use]
    pub fn count(&self) -> usize {
        self.tools.len()
    }

    /// Check if registry is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Validate arguments and run a tool
    ///
    /// Argument and request failures come back as `Error: ...` output.
    ///
    /// # Errors
    ///
    /// Returns error only if the tool is not registered
    pub async fn call(&self, name: &str, api: &dyn WorkspaceApi, raw: Value) -> Result<ToolOutput, RegistryError> {
        let tool = self.get(name)?;
        info!(tool = name, "tool invoked");

        let result = match Args::parse(tool.schema(), raw) {
            Ok(args) => tool.call(api, args).await,
            Err(err) => Err(err.into()),
        };

        Ok(match result {
            Ok(output) => output,
            Err(err) => {
                warn!(tool = name, error = %err, "tool failed");
                ToolOutput::error(&err)
            }
        })
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}
