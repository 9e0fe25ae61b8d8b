//! Minimal collaborators for unit tests.

use crate::{ArtifactRef, DefineError, SchemaType, Scope, ScopeId, SharedScope};

/// Scope that holds nothing and defines nothing.
pub(crate) struct NullScope {
    id: ScopeId,
}

impl NullScope {
    pub(crate) fn shared() -> SharedScope {
        SharedScope::new(NullScope {
            id: ScopeId::fresh(),
        })
    }
}

impl Scope for NullScope {
    fn id(&self) -> ScopeId {
        self.id
    }

    fn load(&self, _name: &str) -> Option<ArtifactRef> {
        None
    }

    fn define(&self, name: &str, _bytes: &[u8]) -> Result<ArtifactRef, DefineError> {
        Err(DefineError::Malformed {
            name: name.to_owned(),
            scope: self.id,
            reason: "null scope".to_owned(),
        })
    }

    fn is_compatible(&self, artifact: &ArtifactRef, schema: &SchemaType) -> bool {
        artifact.implements() == Some(schema.id())
    }
}
