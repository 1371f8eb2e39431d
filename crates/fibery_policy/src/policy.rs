//! Deny-list policy for command tags.

use fibery_core::command::{ENTITY_BATCH_DELETE_COMMAND, ENTITY_DELETE_COMMAND};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Tags rejected at any nesting depth
pub const DEFAULT_DENIED_COMMANDS: &[&str] = &[ENTITY_DELETE_COMMAND, ENTITY_BATCH_DELETE_COMMAND];

/// Default-allow policy with an explicit deny list
///
/// Batch commands are structural: they are never denied by shape alone,
/// only through the tags of the commands they carry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandPolicy {
    denied: BTreeSet<String>,
}

impl CommandPolicy {
    /// Create a policy that denies nothing
    #[must_use]
    pub fn permissive() -> Self {
        Self {
            denied: BTreeSet::new(),
        }
    }

    /// Deny an additional tag
    #[must_use]
    pub fn with_denied(mut self, tag: impl Into<String>) -> Self {
        self.denied.insert(tag.into());
        self
    }

    /// Check whether a tag is denied
    #[must_use]
    pub fn is_denied(&self, tag: &str) -> bool {
        self.denied.contains(tag)
    }

    /// Denied tags, sorted
    pub fn denied(&self) -> impl Iterator<Item = &str> {
        self.denied.iter().map(String::as_str)
    }
}

impl Default for CommandPolicy {
    fn default() -> Self {
        DEFAULT_DENIED_COMMANDS
            .iter()
            .fold(Self::permissive(), |policy, tag| policy.with_denied(*tag))
    }
}
