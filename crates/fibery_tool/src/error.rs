//! Tool layer errors.

use fibery_client::ClientError;
use fibery_identity::ResolveError;

/// Argument rejected before any API call
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ArgumentError {
    /// Arguments are not a JSON object
    #[error("arguments must be a JSON object")]
    NotAnObject,

    /// Argument not declared by the tool schema
    #[error("unknown argument \"{name}\"")]
    Unknown {
        /// Argument name
        name: String,
    },

    /// Required argument absent or empty
    #[error("{name} is not provided")]
    Missing {
        /// Argument name
        name: String,
    },

    /// Argument has the wrong JSON type
    #[error("{name} must be {expected}")]
    WrongType {
        /// Argument name
        name: String,
        /// Expected shape, e.g. `a string`
        expected: &'static str,
    },

    /// Integer below its minimum
    #[error("{name} must be at least {min}")]
    BelowMinimum {
        /// Argument name
        name: String,
        /// Smallest accepted value
        min: i64,
    },

    /// Integer above its maximum
    #[error("{name} must be at most {max}")]
    AboveMaximum {
        /// Argument name
        name: String,
        /// Largest accepted value
        max: i64,
    },

    /// Array longer than allowed
    #[error("{name} cannot contain more than {max} items")]
    TooMany {
        /// Argument name
        name: String,
        /// Largest accepted length
        max: usize,
    },

    /// Value outside an enumeration
    #[error("{name} should be \"{allowed}\"")]
    InvalidChoice {
        /// Argument name
        name: String,
        /// Only accepted value
        allowed: &'static str,
    },

    /// Confirmation flag not set to `true`
    #[error("{flag} must be true to {action}")]
    NotConfirmed {
        /// Flag name
        flag: &'static str,
        /// What the flag confirms
        action: &'static str,
    },

    /// Entities without `fibery/id`, by position
    #[error("every entity must include fibery/id. Missing in items: {}", join_indices(.0))]
    MissingIds(Vec<usize>),
}

fn join_indices(indices: &[usize]) -> String {
    indices.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
}

/// Tool execution error, rendered as `Error: ...` text
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    /// Invalid arguments
    #[error(transparent)]
    Argument(#[from] ArgumentError),

    /// Identity resolution failed
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// Request could not be completed
    #[error(transparent)]
    Client(#[from] ClientError),

    /// Database absent from the workspace schema
    #[error("database \"{name}\" does not exist in this workspace")]
    UnknownDatabase {
        /// Requested database
        name: String,
    },
}

/// Registry error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// Tool name already taken
    #[error("tool already registered: {name}")]
    AlreadyRegistered {
        /// Tool name
        name: String,
    },

    /// No tool with this name
    #[error("tool not found: {name}")]
    NotFound {
        /// Tool name
        name: String,
    },
}
