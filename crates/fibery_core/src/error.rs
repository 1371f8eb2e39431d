//! Core error types.

/// Error raised while parsing a workspace type catalogue
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    /// Catalogue is not a JSON object
    #[error("Schema catalogue must be an object")]
    NotAnObject,

    /// Catalogue has no type list
    #[error("Schema catalogue has no \"fibery/types\" list")]
    MissingTypes,

    /// Type entry is not an object
    #[error("Schema entry {index} is not an object")]
    InvalidEntry {
        /// Position in the catalogue
        index: usize,
    },

    /// Type entry has no name
    #[error("Schema entry {index} is missing \"fibery/name\"")]
    MissingName {
        /// Position in the catalogue
        index: usize,
    },

    /// Field entry has no name
    #[error("Field {index} of database {database} is missing \"fibery/name\"")]
    MissingFieldName {
        /// Owning database
        database: String,
        /// Position in the field list
        index: usize,
    },
}

/// Error raised while decoding a command tree
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    /// Command tag is empty
    #[error("Command tag must not be empty")]
    EmptyTag,

    /// Command args are not an object
    #[error("Arguments of {tag} must be an object")]
    InvalidArgs {
        /// Offending command tag
        tag: String,
    },

    /// Batch command has no nested command list
    #[error("Batch command must carry an \"args.commands\" list")]
    MissingBatchCommands,

    /// Nested command could not be decoded
    #[error("Nested command {index} is invalid: {reason}")]
    InvalidNested {
        /// Position in the batch
        index: usize,
        /// Decoding failure
        reason: String,
    },

    /// Value is not a command at all
    #[error("Invalid command: {0}")]
    Malformed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_error_display() {
        let err = SchemaError::MissingName { index: 3 };
        assert_eq!(err.to_string(), "Schema entry 3 is missing \"fibery/name\"");

        let err = SchemaError::MissingFieldName {
            database: "People/User".to_string(),
            index: 1,
        };
        assert!(err.to_string().contains("People/User"));
    }

    #[test]
    fn test_command_error_display() {
        let err = CommandError::InvalidNested {
            index: 2,
            reason: "bad".to_string(),
        };
        assert_eq!(err.to_string(), "Nested command 2 is invalid: bad");
        assert_ne!(CommandError::EmptyTag, CommandError::MissingBatchCommands);
    }
}
