//! Implementation artifacts.
//!
//! An artifact is the runtime type a scope produces from generated bytes.
//! It carries up to three entry points:
//! - a constructor taking a single [`Context`]
//! - a static property-name table
//! - a static default-value table
//!
//! Missing entry points are representable on purpose: an artifact built by a
//! faulty generator must be detectable by the loader instead of failing to
//! exist at all.

// Arc is the implementation of ArtifactRef - all usage goes through the newtype
#![expect(
    clippy::disallowed_types,
    reason = "Arc is the implementation of ArtifactRef"
)]

use std::any::Any;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;

use crate::{ConstructError, Context, SchemaId, SchemaType, ScopeId};

/// A bound mapping instance.
pub type MappingObject = Box<dyn Any + Send + Sync>;

/// Property names: group → (nested group → property names).
pub type MappingNames = BTreeMap<String, BTreeMap<String, BTreeSet<String>>>;

/// Default values: property path → literal default.
pub type MappingDefaults = BTreeMap<String, String>;

/// Context constructor of an artifact.
pub type ConstructorFn =
    dyn Fn(&dyn Context) -> Result<MappingObject, ConstructError> + Send + Sync;

/// Static names entry point.
pub type NamesFn = dyn Fn() -> MappingNames + Send + Sync;

/// Static defaults entry point.
pub type DefaultsFn = dyn Fn() -> MappingDefaults + Send + Sync;

/// Runtime type defined in a scope from generated bytes.
pub struct ImplementationArtifact {
    name: String,
    scope: ScopeId,
    implements: Option<SchemaId>,
    declares: Option<SchemaType>,
    constructor: Option<Box<ConstructorFn>>,
    names: Option<Box<NamesFn>>,
    defaults: Option<Box<DefaultsFn>>,
}

impl ImplementationArtifact {
    /// Start building an artifact named `name` owned by `scope`.
    pub fn builder(name: impl Into<String>, scope: ScopeId) -> ArtifactBuilder {
        ArtifactBuilder {
            artifact: ImplementationArtifact {
                name: name.into(),
                scope,
                implements: None,
                declares: None,
                constructor: None,
                names: None,
                defaults: None,
            },
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Scope that defined this artifact.
    pub fn scope(&self) -> ScopeId {
        self.scope
    }

    /// Schema type whose contract this artifact implements, if any.
    pub fn implements(&self) -> Option<SchemaId> {
        self.implements
    }

    /// Mapping interface this artifact declares (synthetic wrapper interfaces).
    pub fn declared_mapping(&self) -> Option<&SchemaType> {
        self.declares.as_ref()
    }

    pub fn constructor(&self) -> Option<&ConstructorFn> {
        self.constructor.as_deref()
    }

    pub fn names_entry(&self) -> Option<&NamesFn> {
        self.names.as_deref()
    }

    pub fn defaults_entry(&self) -> Option<&DefaultsFn> {
        self.defaults.as_deref()
    }
}

impl fmt::Debug for ImplementationArtifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImplementationArtifact")
            .field("name", &self.name)
            .field("scope", &self.scope)
            .field("implements", &self.implements)
            .field("declares", &self.declares)
            .field("constructor", &self.constructor.is_some())
            .field("names", &self.names.is_some())
            .field("defaults", &self.defaults.is_some())
            .finish()
    }
}

/// Builder for [`ImplementationArtifact`].
pub struct ArtifactBuilder {
    artifact: ImplementationArtifact,
}

impl ArtifactBuilder {
    #[must_use]
    pub fn implements(mut self, schema: SchemaId) -> Self {
        self.artifact.implements = Some(schema);
        self
    }

    #[must_use]
    pub fn declares(mut self, mapping: SchemaType) -> Self {
        self.artifact.declares = Some(mapping);
        self
    }

    #[must_use]
    pub fn constructor<F>(mut self, f: F) -> Self
    where
        F: Fn(&dyn Context) -> Result<MappingObject, ConstructError> + Send + Sync + 'static,
    {
        self.artifact.constructor = Some(Box::new(f));
        self
    }

    #[must_use]
    pub fn names<F>(mut self, f: F) -> Self
    where
        F: Fn() -> MappingNames + Send + Sync + 'static,
    {
        self.artifact.names = Some(Box::new(f));
        self
    }

    #[must_use]
    pub fn defaults<F>(mut self, f: F) -> Self
    where
        F: Fn() -> MappingDefaults + Send + Sync + 'static,
    {
        self.artifact.defaults = Some(Box::new(f));
        self
    }

    pub fn build(self) -> ArtifactRef {
        ArtifactRef(Arc::new(self.artifact))
    }
}

/// Shared handle to an artifact.
///
/// Equality is identity: two handles are equal only when they point at the
/// same defined artifact.
#[derive(Clone)]
pub struct ArtifactRef(Arc<ImplementationArtifact>);

impl ArtifactRef {
    #[inline]
    pub fn ptr_eq(&self, other: &ArtifactRef) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl std::ops::Deref for ArtifactRef {
    type Target = ImplementationArtifact;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl PartialEq for ArtifactRef {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for ArtifactRef {}

impl fmt::Debug for ArtifactRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ArtifactRef({} in {})", self.0.name, self.0.scope)
    }
}
