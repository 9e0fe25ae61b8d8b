//! The mapping loader.
//!
//! [`MappingLoader`] turns schema types into artifacts. For an
//! interface-style type the flow is:
//!
//! 1. Consult the [`ImplementationCache`]. A hit returns immediately.
//! 2. Probe the type's scope for an artifact under the derived name. A
//!    compatible one is accepted without taking any lock.
//! 3. Otherwise ask the introspector for metadata and run
//!    [`MappingLoader::ensure_defined`], which generates and defines the
//!    artifact under the name's lock.
//!
//! A class-style type first gets its synthetic wrapper interface defined and
//! then resolves like the wrapper.

// Arc wraps class metadata that is shared between the memo and resolver output.
#![expect(
    clippy::disallowed_types,
    reason = "Arc shares memoized class metadata"
)]

mod builder;
mod factory;
mod resolve;

pub use builder::{ConfigurationError, GenerationMode, MappingLoaderBuilder};

use std::fmt;
use std::sync::Arc;

use cfgmap_ir::naming;
use cfgmap_ir::{
    ArtifactRef, BindingMetadata, ClassMetadata, MappingIntrospector, SchemaType,
    SharedClassMetadata, SharedInterfaceMetadata, SharedScope,
};
use dashmap::DashMap;
use rustc_hash::FxBuildHasher;

use crate::cache::ImplementationCache;
use crate::error::{LoadError, LoadResult};
use crate::generate::Generator;
use crate::introspect::DeclaredMappings;
use crate::locks::LockRegistry;

/// Resolves schema types to implementation artifacts.
///
/// A loader is meant to live as long as the schema types it resolves. All
/// methods take `&self` and may be called from any number of threads.
pub struct MappingLoader {
    introspector: Box<dyn MappingIntrospector>,
    generator: Box<dyn Generator>,
    mode: GenerationMode,
    locks: LockRegistry,
    cache: ImplementationCache,
    class_metadata: DashMap<SchemaType, Option<SharedClassMetadata>, FxBuildHasher>,
}

impl MappingLoader {
    /// Runtime-mode loader reading metadata from `introspector`.
    pub fn new(introspector: impl MappingIntrospector + 'static) -> Self {
        MappingLoader::from_parts(
            Box::new(introspector),
            Box::new(crate::ManifestGenerator),
            GenerationMode::Runtime,
        )
    }

    pub fn builder() -> MappingLoaderBuilder {
        MappingLoaderBuilder::new()
    }

    fn from_parts(
        introspector: Box<dyn MappingIntrospector>,
        generator: Box<dyn Generator>,
        mode: GenerationMode,
    ) -> Self {
        MappingLoader {
            introspector,
            generator,
            mode,
            locks: LockRegistry::new(),
            cache: ImplementationCache::new(),
            class_metadata: DashMap::with_hasher(FxBuildHasher),
        }
    }

    /// Where artifact bytes come from.
    pub fn mode(&self) -> GenerationMode {
        self.mode
    }

    /// Artifact for `schema`, computed once per schema type.
    ///
    /// # Errors
    /// `NotAMapping` if the type is neither interface-style nor class-style,
    /// or if the introspector does not know it. Generation and definition
    /// failures are returned as-is and leave nothing cached.
    pub fn artifact(&self, schema: &SchemaType) -> LoadResult<ArtifactRef> {
        self.cache.get_or_try_init(schema, || self.compute_artifact(schema))
    }

    fn compute_artifact(&self, schema: &SchemaType) -> LoadResult<ArtifactRef> {
        let kind = schema.kind();
        if kind.is_class_style() {
            let wrapper = self.mapping_interface_type(schema)?;
            return self.artifact(&wrapper);
        }
        if !kind.is_interface() {
            return Err(LoadError::not_a_mapping(schema));
        }

        let name = naming::implementation_name(schema);
        let scope = schema.scope();
        if let Some(existing) = scope.load(&name) {
            if scope.is_compatible(&existing, schema) {
                tracing::trace!(artifact = %name, scope = %scope.id(), "found existing artifact");
                return Ok(existing);
            }
        }

        let metadata = self
            .introspector
            .interface_metadata(schema)
            .ok_or_else(|| LoadError::not_a_mapping(schema))?;
        self.ensure_defined(scope, &BindingMetadata::Interface(metadata))
    }

    /// Make sure the artifact described by `metadata` is defined in `scope`.
    ///
    /// Runs under the lock for the artifact name. Inside the lock the scope
    /// is probed again; an artifact that is already loadable and compatible
    /// is returned without generating. Class-style metadata accepts any
    /// artifact already defined under its name.
    pub fn ensure_defined(
        &self,
        scope: &SharedScope,
        metadata: &BindingMetadata,
    ) -> LoadResult<ArtifactRef> {
        let name = metadata.class_name();
        let lock = self.locks.lock_for(name);
        let _guard = lock.lock();
        tracing::debug!(artifact = name, scope = %scope.id(), "acquired name lock");

        if let Some(existing) = scope.load(name) {
            if metadata.is_class_style()
                || scope.is_compatible(&existing, metadata.interface_type())
            {
                return Ok(existing);
            }
            tracing::warn!(
                artifact = name,
                scope = %scope.id(),
                found_in = %existing.scope(),
                "incompatible artifact under expected name, regenerating"
            );
        }

        self.define(scope, name, metadata)
    }

    /// Generate bytes for `metadata` and define them in `scope`.
    ///
    /// The only place where artifacts come into existence. A fresh artifact
    /// must implement (or wrap) the type it was generated for; one that does
    /// not is reported and never reaches the cache.
    fn define(
        &self,
        scope: &SharedScope,
        name: &str,
        metadata: &BindingMetadata,
    ) -> LoadResult<ArtifactRef> {
        tracing::debug!(artifact = name, mode = %self.mode, "generating artifact");
        let bytes = self
            .generator
            .generate(metadata)
            .map_err(|source| LoadError::Generation {
                name: name.to_owned(),
                source,
            })?;
        let artifact = scope.define(name, &bytes).map_err(LoadError::from_define)?;

        let expected = metadata.interface_type();
        let fits = match metadata {
            BindingMetadata::Interface(_) => scope.is_compatible(&artifact, expected),
            BindingMetadata::Class(_) => artifact
                .declared_mapping()
                .and_then(SchemaType::origin)
                .is_some_and(|origin| origin == expected),
        };
        if !fits {
            tracing::warn!(
                artifact = name,
                scope = %scope.id(),
                "defined artifact does not fit its type"
            );
            return Err(LoadError::InvalidArtifact {
                name: name.to_owned(),
                scope: scope.id(),
                reason: format!(
                    "defined artifact does not fit `{}`",
                    expected.qualified_name()
                ),
            });
        }
        Ok(artifact)
    }

    /// Interface type the mapping for `schema` binds through.
    ///
    /// A plain interface is its own mapping interface. For a class-style
    /// type the synthetic wrapper is defined in the type's scope first.
    pub fn mapping_interface_type(&self, schema: &SchemaType) -> LoadResult<SchemaType> {
        let kind = schema.kind();
        if !kind.is_class_style() {
            return if kind.is_interface() {
                Ok(schema.clone())
            } else {
                Err(LoadError::not_a_mapping(schema))
            };
        }

        let class = self
            .class_metadata(schema)
            .ok_or_else(|| LoadError::not_a_mapping(schema))?;
        let wrapper = self.ensure_defined(schema.scope(), &BindingMetadata::Class(class))?;
        wrapper
            .declared_mapping()
            .cloned()
            .ok_or_else(|| LoadError::not_a_mapping(wrapper.name()))
    }

    /// Interface metadata the mapping for `schema` binds through.
    pub fn mapping_interface(&self, schema: &SchemaType) -> LoadResult<SharedInterfaceMetadata> {
        let iface = self.mapping_interface_type(schema)?;
        self.introspector
            .interface_metadata(&iface)
            .ok_or_else(|| LoadError::not_a_mapping(&iface))
    }

    /// Class-style metadata of `schema`, memoized per type.
    pub fn class_metadata(&self, schema: &SchemaType) -> Option<SharedClassMetadata> {
        if let Some(memo) = self.class_metadata.get(schema) {
            return memo.clone();
        }
        let meta = ClassMetadata::of(schema).map(Arc::new);
        self.class_metadata
            .entry(schema.clone())
            .or_insert(meta)
            .clone()
    }

    /// Interface metadata of `schema` if it is a plain interface mapping.
    pub fn interface_metadata(&self, schema: &SchemaType) -> Option<SharedInterfaceMetadata> {
        let kind = schema.kind();
        if !kind.is_interface() || kind.is_class_style() {
            return None;
        }
        self.introspector.interface_metadata(schema)
    }

    /// Number of artifact names a lock was ever created for.
    pub fn lock_count(&self) -> usize {
        self.locks.len()
    }

    /// Number of schema types with a cached artifact.
    pub fn cached_count(&self) -> usize {
        self.cache.len()
    }

    /// Cached artifact for `schema`, without resolving anything.
    pub fn cached(&self, schema: &SchemaType) -> Option<ArtifactRef> {
        self.cache.get(schema)
    }
}

impl Default for MappingLoader {
    fn default() -> Self {
        MappingLoader::new(DeclaredMappings::new())
    }
}

impl fmt::Debug for MappingLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MappingLoader")
            .field("mode", &self.mode)
            .field("locks", &self.locks)
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}
