//! Scopes: isolation boundaries for artifact names.
//!
//! A scope is where artifacts are looked up and defined. Names are unique
//! within one scope only; two scopes may each hold a different artifact
//! under the same name.

// Arc is the implementation of SharedScope - all usage goes through the newtype
#![expect(
    clippy::disallowed_types,
    reason = "Arc is the implementation of SharedScope"
)]

use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use thiserror::Error;

use crate::{ArtifactRef, SchemaType};

/// Process-unique identity of a scope, used in logs and errors.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
#[repr(transparent)]
pub struct ScopeId(u32);

impl ScopeId {
    /// Allocate a new scope identity.
    pub fn fresh() -> Self {
        static NEXT: AtomicU32 = AtomicU32::new(0);
        ScopeId(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for ScopeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "scope#{}", self.0)
    }
}

/// Error returned by [`Scope::define`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DefineError {
    /// The name is already bound in this scope.
    #[error("`{name}` is already defined in {scope}")]
    Duplicate { name: String, scope: ScopeId },
    /// The artifact payload could not be turned into a type.
    #[error("`{name}` could not be defined in {scope}: {reason}")]
    Malformed {
        name: String,
        scope: ScopeId,
        reason: String,
    },
}

/// Loading context that owns artifacts.
///
/// Implementations may block internally (e.g. on their own loading locks)
/// but must not call back into the mapping loader.
pub trait Scope: Send + Sync {
    fn id(&self) -> ScopeId;

    /// Find an artifact visible from this scope under `name`.
    fn load(&self, name: &str) -> Option<ArtifactRef>;

    /// Define a new artifact under `name` from generated bytes.
    fn define(&self, name: &str, bytes: &[u8]) -> Result<ArtifactRef, DefineError>;

    /// Whether `artifact` satisfies the capability contract of `schema`.
    fn is_compatible(&self, artifact: &ArtifactRef, schema: &SchemaType) -> bool;
}

/// Shared handle to a scope.
#[derive(Clone)]
pub struct SharedScope(Arc<dyn Scope>);

impl SharedScope {
    pub fn new<S: Scope + 'static>(scope: S) -> Self {
        SharedScope(Arc::new(scope))
    }

    /// Wrap an already shared scope.
    pub fn from_arc(scope: Arc<dyn Scope>) -> Self {
        SharedScope(scope)
    }

    /// Check if two handles refer to the same scope object.
    pub fn ptr_eq(&self, other: &SharedScope) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl std::ops::Deref for SharedScope {
    type Target = dyn Scope;

    fn deref(&self) -> &Self::Target {
        &*self.0
    }
}

impl fmt::Debug for SharedScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SharedScope({})", self.0.id())
    }
}
