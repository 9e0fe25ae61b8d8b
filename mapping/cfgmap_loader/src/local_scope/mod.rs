//! In-memory scope that defines artifacts from encoded manifests.
//!
//! `LocalScope` is the reference [`Scope`]: it owns the schema types declared
//! in it and every artifact defined in it, and it may delegate lookups to a
//! parent scope. A name defined locally shadows the parent's.
//!
//! Manifests name the types they implement or wrap. Those names are linked
//! against the types declared in the defining scope itself, so one payload
//! defined in two scopes yields two artifacts with different identities.
//!
//! Artifacts produced here bind every declared property from a
//! [`MapContext`], falling back to the property's default.

// Arc is the implementation of LocalScopeRef - all usage goes through the newtype
#![expect(
    clippy::disallowed_types,
    reason = "Arc is the implementation of LocalScopeRef"
)]

use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use cfgmap_ir::{
    ArtifactRef, ConfigError, ConstructError, Context, DefineError, ImplementationArtifact,
    MappingObject, SchemaKind, SchemaType, Scope, ScopeId, SharedScope,
};
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::manifest::{ArtifactManifest, ManifestKind, ManifestProperty};

/// In-memory scope.
pub struct LocalScope {
    id: ScopeId,
    parent: Option<SharedScope>,
    /// Declared types by qualified name; the first declaration of a name wins.
    types: RwLock<FxHashMap<String, SchemaType>>,
    artifacts: RwLock<FxHashMap<String, ArtifactRef>>,
}

impl LocalScope {
    /// Create a root scope.
    #[expect(clippy::new_ret_no_self, reason = "scopes only exist behind a shared handle")]
    pub fn new() -> LocalScopeRef {
        Self::create(None)
    }

    /// Create a scope that delegates missed lookups to `parent`.
    pub fn with_parent(parent: SharedScope) -> LocalScopeRef {
        Self::create(Some(parent))
    }

    fn create(parent: Option<SharedScope>) -> LocalScopeRef {
        LocalScopeRef(Arc::new(LocalScope {
            id: ScopeId::fresh(),
            parent,
            types: RwLock::new(FxHashMap::default()),
            artifacts: RwLock::new(FxHashMap::default()),
        }))
    }

    /// Artifact defined in this scope itself, ignoring the parent.
    pub fn load_local(&self, name: &str) -> Option<ArtifactRef> {
        self.artifacts.read().get(name).cloned()
    }

    /// Number of artifacts defined in this scope itself.
    pub fn artifact_count(&self) -> usize {
        self.artifacts.read().len()
    }

    /// Type declared in this scope under `qualified_name`.
    pub fn declared(&self, qualified_name: &str) -> Option<SchemaType> {
        self.types.read().get(qualified_name).cloned()
    }

    fn register(&self, schema: &SchemaType) {
        self.types
            .write()
            .entry(schema.qualified_name())
            .or_insert_with(|| schema.clone());
    }

    fn link(&self, manifest: ArtifactManifest) -> Result<ArtifactRef, DefineError> {
        let undeclared = |what: &str, type_name: &str| DefineError::Malformed {
            name: manifest.name.clone(),
            scope: self.id,
            reason: format!("{what} `{type_name}` is not declared in this scope"),
        };
        match manifest.kind {
            ManifestKind::Implementation {
                implements,
                properties,
                names,
                defaults,
            } => {
                let implemented = self
                    .declared(&implements)
                    .ok_or_else(|| undeclared("implemented interface", &implements))?;
                let mapping = manifest.name.clone();
                let artifact = ImplementationArtifact::builder(manifest.name, self.id)
                    .implements(implemented.id())
                    .constructor(move |ctx| bind(&mapping, &properties, ctx))
                    .names(move || names.clone())
                    .defaults(move || defaults.clone())
                    .build();
                Ok(artifact)
            }
            ManifestKind::WrapperInterface { origin } => {
                let origin = self
                    .declared(&origin)
                    .filter(|class| class.kind().is_class_style())
                    .ok_or_else(|| undeclared("wrapped class", &origin))?;
                let wrapper = SchemaType::synthetic(&origin, &manifest.name);
                self.register(&wrapper);
                Ok(ImplementationArtifact::builder(manifest.name, self.id)
                    .declares(wrapper)
                    .build())
            }
        }
    }
}

impl Scope for LocalScope {
    fn id(&self) -> ScopeId {
        self.id
    }

    fn load(&self, name: &str) -> Option<ArtifactRef> {
        if let Some(local) = self.load_local(name) {
            return Some(local);
        }
        self.parent.as_ref()?.load(name)
    }

    fn define(&self, name: &str, bytes: &[u8]) -> Result<ArtifactRef, DefineError> {
        let manifest = ArtifactManifest::decode(bytes).map_err(|err| DefineError::Malformed {
            name: name.to_owned(),
            scope: self.id,
            reason: err.to_string(),
        })?;
        if manifest.name != name {
            return Err(DefineError::Malformed {
                name: name.to_owned(),
                scope: self.id,
                reason: format!("payload describes `{}`", manifest.name),
            });
        }

        // Check before linking so a duplicate never registers a wrapper type.
        if self.artifacts.read().contains_key(name) {
            return Err(DefineError::Duplicate {
                name: name.to_owned(),
                scope: self.id,
            });
        }

        let artifact = self.link(manifest)?;

        let mut artifacts = self.artifacts.write();
        if artifacts.contains_key(name) {
            return Err(DefineError::Duplicate {
                name: name.to_owned(),
                scope: self.id,
            });
        }
        artifacts.insert(name.to_owned(), artifact.clone());
        tracing::debug!(artifact = name, scope = %self.id, "defined artifact");
        Ok(artifact)
    }

    fn is_compatible(&self, artifact: &ArtifactRef, schema: &SchemaType) -> bool {
        artifact.implements() == Some(schema.id())
    }
}

impl fmt::Debug for LocalScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalScope")
            .field("id", &self.id)
            .field("parent", &self.parent.as_ref().map(|p| p.id()))
            .field("types", &self.types.read().len())
            .field("artifacts", &self.artifacts.read().len())
            .finish()
    }
}

/// Shared handle to a [`LocalScope`].
#[derive(Clone)]
pub struct LocalScopeRef(Arc<LocalScope>);

impl LocalScopeRef {
    /// Type-erased handle for use as a schema type's scope.
    pub fn shared(&self) -> SharedScope {
        SharedScope::from_arc(self.0.clone())
    }

    /// Declare a schema type owned by this scope.
    pub fn declare(&self, qualified_name: &str, kind: SchemaKind) -> SchemaType {
        let schema = SchemaType::new(self.shared(), qualified_name, kind);
        self.0.register(&schema);
        schema
    }

    /// Declare a plain interface.
    pub fn declare_interface(&self, qualified_name: &str) -> SchemaType {
        self.declare(qualified_name, SchemaKind::INTERFACE)
    }
}

impl std::ops::Deref for LocalScopeRef {
    type Target = LocalScope;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl fmt::Debug for LocalScopeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.0, f)
    }
}

/// Context backed by a flat map of property path → value.
#[derive(Clone, Debug, Default)]
pub struct MapContext {
    values: FxHashMap<String, String>,
}

impl MapContext {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, path: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(path, value);
        self
    }

    pub fn insert(&mut self, path: impl Into<String>, value: impl Into<String>) {
        self.values.insert(path.into(), value.into());
    }

    pub fn get(&self, path: &str) -> Option<&str> {
        self.values.get(path).map(String::as_str)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MapContext {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut ctx = MapContext::new();
        for (path, value) in iter {
            ctx.insert(path, value);
        }
        ctx
    }
}

impl Context for MapContext {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Context type the artifact constructor cannot read.
#[derive(Debug, Error)]
#[error("`{mapping}` can only be bound from a MapContext")]
pub struct UnsupportedContext {
    pub mapping: String,
}

/// Instance produced by a [`LocalScope`] artifact.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BoundMapping {
    artifact: String,
    values: BTreeMap<String, String>,
}

impl BoundMapping {
    /// Name of the artifact this instance was constructed from.
    pub fn artifact(&self) -> &str {
        &self.artifact
    }

    pub fn get(&self, path: &str) -> Option<&str> {
        self.values.get(path).map(String::as_str)
    }

    pub fn values(&self) -> &BTreeMap<String, String> {
        &self.values
    }
}

fn bind(
    artifact: &str,
    properties: &[ManifestProperty],
    ctx: &dyn Context,
) -> Result<MappingObject, ConstructError> {
    let Some(values) = ctx.as_any().downcast_ref::<MapContext>() else {
        return Err(ConstructError::other(UnsupportedContext {
            mapping: artifact.to_owned(),
        }));
    };

    let mut bound = BTreeMap::new();
    for prop in properties {
        let value = values
            .get(&prop.path)
            .or(prop.default.as_deref())
            .ok_or_else(|| ConfigError::MissingValue {
                path: prop.path.clone(),
            })?;
        bound.insert(prop.path.clone(), value.to_owned());
    }

    Ok(Box::new(BoundMapping {
        artifact: artifact.to_owned(),
        values: bound,
    }))
}
