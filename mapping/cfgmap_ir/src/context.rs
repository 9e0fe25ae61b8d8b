//! Construction context and construction failures.

use std::any::Any;

use thiserror::Error;

/// Opaque source of bound values handed to an artifact's constructor.
///
/// The loader never inspects a context; it is passed through unchanged.
/// Artifacts recover the concrete type with [`Context::as_any`].
pub trait Context: Send + Sync {
    fn as_any(&self) -> &dyn Any;
}

/// Failure kinds raised by the configuration front end.
///
/// These are recognized by the loader and reach callers unwrapped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("no configuration value for `{path}`")]
    MissingValue { path: String },
    #[error("invalid configuration for `{path}`: {message}")]
    Invalid { path: String, message: String },
}

/// Error returned by an artifact constructor.
#[derive(Debug, Error)]
pub enum ConstructError {
    /// A recognized configuration failure.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// Anything else the constructor raised.
    #[error(transparent)]
    Other(Box<dyn std::error::Error + Send + Sync>),
}

impl ConstructError {
    /// Wrap an arbitrary failure.
    pub fn other<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        ConstructError::Other(Box::new(error))
    }
}
