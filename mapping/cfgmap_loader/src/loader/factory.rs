//! Instance factory and accessor bridge.

use std::any::Any;

use cfgmap_ir::{
    ArtifactRef, ConstructError, Context, MappingDefaults, MappingNames, MappingObject, SchemaType,
};

use super::MappingLoader;
use crate::error::{Accessor, LoadError, LoadResult};

impl MappingLoader {
    /// Construct a bound instance of `artifact` from `ctx`.
    ///
    /// # Errors
    /// - `ConstructorMissing` if the artifact has no context constructor.
    /// - `Config` for a recognized configuration failure, unwrapped.
    /// - `Construction` wrapping any other constructor failure.
    pub fn instantiate(
        &self,
        artifact: &ArtifactRef,
        ctx: &dyn Context,
    ) -> LoadResult<MappingObject> {
        let constructor = artifact
            .constructor()
            .ok_or_else(|| LoadError::ConstructorMissing {
                artifact: artifact.name().to_owned(),
            })?;

        constructor(ctx).map_err(|err| match err {
            ConstructError::Config(config) => LoadError::Config(config),
            ConstructError::Other(source) => LoadError::Construction {
                artifact: artifact.name().to_owned(),
                source,
            },
        })
    }

    /// Resolve `schema` and construct a bound instance from `ctx`.
    pub fn mapping_object(
        &self,
        schema: &SchemaType,
        ctx: &dyn Context,
    ) -> LoadResult<MappingObject> {
        let artifact = self.artifact(schema)?;
        self.instantiate(&artifact, ctx)
    }

    /// Like [`mapping_object`](Self::mapping_object), cast to `T`.
    ///
    /// # Errors
    /// `InstanceTypeMismatch` if the instance is not a `T`.
    pub fn mapping_object_as<T: Any>(
        &self,
        schema: &SchemaType,
        ctx: &dyn Context,
    ) -> LoadResult<Box<T>> {
        let artifact = self.artifact(schema)?;
        self.instantiate(&artifact, ctx)?
            .downcast::<T>()
            .map_err(|_| LoadError::InstanceTypeMismatch {
                artifact: artifact.name().to_owned(),
                expected: std::any::type_name::<T>(),
            })
    }

    /// Property names the artifact for `schema` binds, grouped per mapping.
    pub fn names_of(&self, schema: &SchemaType) -> LoadResult<MappingNames> {
        let artifact = self.artifact(schema)?;
        let names = artifact
            .names_entry()
            .ok_or_else(|| missing(&artifact, Accessor::Names))?;
        Ok(names())
    }

    /// Default values the artifact for `schema` declares, by property path.
    pub fn defaults_of(&self, schema: &SchemaType) -> LoadResult<MappingDefaults> {
        let artifact = self.artifact(schema)?;
        let defaults = artifact
            .defaults_entry()
            .ok_or_else(|| missing(&artifact, Accessor::Defaults))?;
        Ok(defaults())
    }
}

fn missing(artifact: &ArtifactRef, accessor: Accessor) -> LoadError {
    LoadError::AccessorMissing {
        artifact: artifact.name().to_owned(),
        accessor,
    }
}
