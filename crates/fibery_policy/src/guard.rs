//! Recursive command guard.
//!
//! The guard walks a command tree depth-first, in execution order, and stops
//! at the first denied tag. It never touches the network and never edits the
//! tree, so an allowed command is forwarded exactly as it was built.

use crate::policy::CommandPolicy;
use fibery_core::command::BATCH_COMMAND;
use fibery_core::{Command, CommandResponse};
use serde::{Deserialize, Serialize};

/// Outcome of inspecting one command tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuardDecision {
    /// Whether the whole tree may be sent
    pub allowed: bool,
    /// Tag that caused the rejection
    pub denied_tag: Option<String>,
    /// Indices from the root batch down to the rejected command
    pub path: Vec<usize>,
    /// Commands inspected before the decision was reached
    pub checked: usize,
}

impl GuardDecision {
    fn allow(checked: usize) -> Self {
        Self {
            allowed: true,
            denied_tag: None,
            path: Vec::new(),
            checked,
        }
    }

    fn deny(tag: &str, path: Vec<usize>, checked: usize) -> Self {
        Self {
            allowed: false,
            denied_tag: Some(tag.to_string()),
            path,
            checked,
        }
    }

    /// Human-readable rejection, if the tree was rejected
    #[must_use]
    pub fn rejection_message(&self) -> Option<String> {
        self.denied_tag.as_ref().map(|tag| {
            format!("Command \"{tag}\" is not allowed; the request was blocked before any API call was made.")
        })
    }

    /// Failure response for a rejected tree
    #[must_use]
    pub fn to_response(&self) -> Option<CommandResponse> {
        self.rejection_message().map(CommandResponse::failure)
    }
}

/// Guard enforcing a [`CommandPolicy`] over whole command trees
#[derive(Debug, Clone, Default)]
pub struct CommandGuard {
    policy: CommandPolicy,
}

impl CommandGuard {
    /// Create a guard for a policy
    #[must_use]
    pub fn new(policy: CommandPolicy) -> Self {
        Self { policy }
    }

    /// Policy in force
    #[must_use]
    pub fn policy(&self) -> &CommandPolicy {
        &self.policy
    }

    /// Inspect a command and every command nested inside it
    #[must_use]
    pub fn inspect(&self, command: &Command) -> GuardDecision {
        let mut stack: Vec<(&Command, Vec<usize>)> = vec![(command, Vec::new())];
        let mut checked = 0;

        while let Some((current, path)) = stack.pop() {
            checked += 1;

            if self.policy.is_denied(current.tag()) {
                return GuardDecision::deny(current.tag(), path, checked);
            }

            // A hand-built leaf carrying the batch tag still reaches the API as a
            // batch, so its payload is decoded and inspected like one.
            if let Command::Leaf { action, .. } = current {
                if action == BATCH_COMMAND {
                    let inner = match Command::from_value(current.to_value()) {
                        Ok(decoded) => self.inspect(&decoded),
                        Err(_) => GuardDecision::deny(BATCH_COMMAND, Vec::new(), 1),
                    };
                    checked += inner.checked - 1;
                    if let Some(tag) = inner.denied_tag {
                        let mut full_path = path;
                        full_path.extend(inner.path);
                        return GuardDecision::deny(&tag, full_path, checked);
                    }
                    continue;
                }
            }

            // Reverse push keeps the walk in execution order.
            for (index, nested) in current.nested().iter().enumerate().rev() {
                let mut nested_path = path.clone();
                nested_path.push(index);
                stack.push((nested, nested_path));
            }
        }

        GuardDecision::allow(checked)
    }

    /// Convenience check
    #[must_use]
    pub fn is_allowed(&self, command: &Command) -> bool {
        self.inspect(command).allowed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fibery_core::command::{
        BATCH_COMMAND, ENTITY_CREATE_COMMAND, ENTITY_DELETE_COMMAND, ENTITY_UPDATE_COMMAND,
    };
    use proptest::prelude::*;
    use serde_json::Map;

    fn leaf(tag: &str) -> Command {
        Command::leaf(tag, Map::new())
    }

    #[test]
    fn test_leaf_allowed() {
        let guard = CommandGuard::default();
        let decision = guard.inspect(&leaf(ENTITY_CREATE_COMMAND));
        assert!(decision.allowed);
        assert_eq!(decision.checked, 1);
        assert!(decision.rejection_message().is_none());
        assert!(decision.to_response().is_none());
    }

    #[test]
    fn test_top_level_delete_denied() {
        let guard = CommandGuard::default();
        let decision = guard.inspect(&leaf(ENTITY_DELETE_COMMAND));
        assert!(!decision.allowed);
        assert_eq!(decision.denied_tag.as_deref(), Some(ENTITY_DELETE_COMMAND));
        assert!(decision.path.is_empty());

        let response = decision.to_response().unwrap();
        assert!(!response.success);
        assert!(response.result.as_str().unwrap().contains("fibery.entity/delete"));
    }

    #[test]
    fn test_empty_batch_allowed() {
        let guard = CommandGuard::default();
        assert!(guard.is_allowed(&Command::batch(Vec::new())));
    }

    #[test]
    fn test_batch_with_create_and_update_allowed() {
        let guard = CommandGuard::default();
        let cmd = Command::batch(vec![leaf(ENTITY_CREATE_COMMAND), leaf(ENTITY_UPDATE_COMMAND)]);
        let decision = guard.inspect(&cmd);
        assert!(decision.allowed);
        assert_eq!(decision.checked, 3);
    }

    #[test]
    fn test_nested_delete_denied_with_path() {
        let guard = CommandGuard::default();
        let cmd = Command::batch(vec![
            leaf(ENTITY_CREATE_COMMAND),
            Command::batch(vec![leaf(ENTITY_UPDATE_COMMAND), leaf(ENTITY_DELETE_COMMAND)]),
            leaf(ENTITY_UPDATE_COMMAND),
        ]);

        let decision = guard.inspect(&cmd);
        assert!(!decision.allowed);
        assert_eq!(decision.path, vec![1, 1]);
        // root, create, inner batch, update, delete
        assert_eq!(decision.checked, 5);
    }

    #[test]
    fn test_first_denied_in_execution_order_reported() {
        let guard = CommandGuard::new(CommandPolicy::default().with_denied("custom/purge"));
        let cmd = Command::batch(vec![leaf("custom/purge"), leaf(ENTITY_DELETE_COMMAND)]);
        let decision = guard.inspect(&cmd);
        assert_eq!(decision.denied_tag.as_deref(), Some("custom/purge"));
        assert_eq!(decision.path, vec![0]);
    }

    #[test]
    fn test_denied_batch_tag() {
        let guard = CommandGuard::new(CommandPolicy::permissive().with_denied(BATCH_COMMAND));
        let decision = guard.inspect(&Command::batch(vec![leaf(ENTITY_CREATE_COMMAND)]));
        assert!(!decision.allowed);
        assert_eq!(decision.checked, 1);
    }

    #[test]
    fn test_leaf_tagged_as_batch_is_inspected() {
        let guard = CommandGuard::default();
        let mut args = Map::new();
        args.insert(
            "commands".to_string(),
            serde_json::json!([{"command": "fibery.entity/delete", "args": {}}]),
        );
        let disguised = Command::batch(vec![
            leaf(ENTITY_CREATE_COMMAND),
            Command::leaf(BATCH_COMMAND, args),
        ]);

        let decision = guard.inspect(&disguised);
        assert!(!decision.allowed);
        assert_eq!(decision.denied_tag.as_deref(), Some(ENTITY_DELETE_COMMAND));
        assert_eq!(decision.path, vec![1, 0]);
    }

    #[test]
    fn test_leaf_tagged_as_batch_without_commands_denied() {
        let guard = CommandGuard::default();
        let decision = guard.inspect(&Command::leaf(BATCH_COMMAND, Map::new()));
        assert!(!decision.allowed);
        assert_eq!(decision.denied_tag.as_deref(), Some(BATCH_COMMAND));
    }

    #[test]
    fn test_permissive_allows_delete() {
        let guard = CommandGuard::new(CommandPolicy::permissive());
        assert!(guard.is_allowed(&leaf(ENTITY_DELETE_COMMAND)));
    }

    fn safe_tag() -> impl Strategy<Value = String> {
        prop_oneof![
            Just(ENTITY_CREATE_COMMAND.to_string()),
            Just(ENTITY_UPDATE_COMMAND.to_string()),
            "[a-z]{1,8}/[a-z]{1,8}",
        ]
    }

    fn safe_tree() -> impl Strategy<Value = Command> {
        safe_tag().prop_map(|tag| leaf(&tag)).prop_recursive(4, 32, 6, |inner| {
            prop::collection::vec(inner, 0..6).prop_map(Command::batch)
        })
    }

    /// Replace the leaf reached by `seed` with a delete, wrapping in a batch if needed.
    fn plant_delete(tree: Command, seed: usize) -> Command {
        match tree {
            Command::Batch { mut commands, args } if !commands.is_empty() => {
                let index = seed % commands.len();
                let child = commands.remove(index);
                commands.insert(index, plant_delete(child, seed / 7));
                Command::batch_with_args(commands, args)
            }
            Command::Batch { .. } => Command::batch(vec![leaf(ENTITY_DELETE_COMMAND)]),
            Command::Leaf { .. } => leaf(ENTITY_DELETE_COMMAND),
        }
    }

    proptest! {
        #[test]
        fn prop_safe_trees_allowed(tree in safe_tree()) {
            let guard = CommandGuard::default();
            prop_assert!(guard.is_allowed(&tree));
        }

        #[test]
        fn prop_delete_denied_at_any_depth(tree in safe_tree(), seed in any::<usize>()) {
            let guard = CommandGuard::default();
            let decision = guard.inspect(&plant_delete(tree, seed));
            prop_assert!(!decision.allowed);
            prop_assert_eq!(decision.denied_tag.as_deref(), Some(ENTITY_DELETE_COMMAND));
        }
    }
}
