//! Configuration-mapping IR.
//!
//! This crate holds the data model shared by every part of the mapping
//! loader:
//! - `SchemaType`: identity-keyed handles to user-declared mappings
//! - `BindingMetadata`: what a mapping declares and what its artifact is called
//! - `ImplementationArtifact`: the runtime type generated for a mapping
//! - `Scope`, `Context`, `MappingIntrospector`: collaborator interfaces
//!
//! # Identity
//!
//! Schema types compare by identity, never by name. Two types with the same
//! qualified name declared in different scopes are different keys, and so
//! are two artifacts defined under one name in different scopes.
//!
//! # Naming
//!
//! Artifact names are derived from the schema type alone (see [`naming`]), so
//! a loader can probe a scope for an existing artifact before it asks the
//! introspector anything.

mod artifact;
mod context;
mod metadata;
pub mod naming;
mod schema;
mod scope;

pub use artifact::{
    ArtifactBuilder, ArtifactRef, ConstructorFn, DefaultsFn, ImplementationArtifact,
    MappingDefaults, MappingNames, MappingObject, NamesFn,
};
pub use context::{ConfigError, ConstructError, Context};
pub use metadata::{
    BindingMetadata, ClassMetadata, InterfaceMetadata, MappingIntrospector, PropertyMetadata,
    SharedClassMetadata, SharedInterfaceMetadata,
};
pub use schema::{SchemaId, SchemaKind, SchemaType};
pub use scope::{DefineError, Scope, ScopeId, SharedScope};

#[cfg(test)]
mod test_support;
