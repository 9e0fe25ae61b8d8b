//! Loader errors.
//!
//! Nothing here is retried by the loader. `NotAMapping` and `Config` are
//! caused by user input; everything else signals a broken generator, scope
//! or artifact and is fatal.

use std::fmt;

use cfgmap_ir::{ConfigError, DefineError, ScopeId};
use thiserror::Error;

use crate::generate::GenerateError;

/// Result type for loader operations.
pub type LoadResult<T> = Result<T, LoadError>;

/// Static entry point of an artifact.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Accessor {
    Names,
    Defaults,
}

impl fmt::Display for Accessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Accessor::Names => write!(f, "names"),
            Accessor::Defaults => write!(f, "defaults"),
        }
    }
}

/// Error returned by the mapping loader.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The type is neither an interface-style nor a class-style mapping.
    #[error("`{type_name}` is not a configuration mapping")]
    NotAMapping { type_name: String },

    #[error("failed to generate artifact `{name}`")]
    Generation {
        name: String,
        #[source]
        source: GenerateError,
    },

    /// The scope already binds the name to an incompatible artifact.
    #[error("artifact `{name}` conflicts with an incompatible definition in {scope}")]
    DefinitionConflict { name: String, scope: ScopeId },

    /// The scope could not turn the generated bytes into an artifact.
    #[error("artifact `{name}` was rejected by {scope}: {reason}")]
    InvalidArtifact {
        name: String,
        scope: ScopeId,
        reason: String,
    },

    #[error("artifact `{artifact}` has no context constructor")]
    ConstructorMissing { artifact: String },

    #[error("artifact `{artifact}` has no `{accessor}` entry point")]
    AccessorMissing { artifact: String, accessor: Accessor },

    /// The constructor raised a failure that is not a recognized kind.
    #[error("constructing `{artifact}` failed")]
    Construction {
        artifact: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A recognized configuration failure raised during construction.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The bound instance is not of the type the caller asked for.
    #[error("instance of `{artifact}` is not a `{expected}`")]
    InstanceTypeMismatch {
        artifact: String,
        expected: &'static str,
    },
}

impl LoadError {
    pub(crate) fn not_a_mapping(type_name: impl fmt::Display) -> Self {
        LoadError::NotAMapping {
            type_name: type_name.to_string(),
        }
    }

    pub(crate) fn from_define(error: DefineError) -> Self {
        match error {
            DefineError::Duplicate { name, scope } => LoadError::DefinitionConflict { name, scope },
            DefineError::Malformed {
                name,
                scope,
                reason,
            } => LoadError::InvalidArtifact {
                name,
                scope,
                reason,
            },
        }
    }

    /// Whether the error points at a bug in a generator, scope or artifact
    /// rather than at user input.
    pub fn is_contract_violation(&self) -> bool {
        !matches!(
            self,
            LoadError::NotAMapping { .. }
                | LoadError::Config(_)
                | LoadError::Construction { .. }
                | LoadError::InstanceTypeMismatch { .. }
        )
    }
}
