//! Table-driven introspector.
//!
//! Front ends that know their mappings up front declare them here instead of
//! deriving them from the schema types. Metadata is assembled lazily on
//! first request and memoized per schema type.

// Arc shares the declaration tables between clones of DeclaredMappings.
#![expect(
    clippy::disallowed_types,
    reason = "Arc shares declaration tables between handles"
)]

use std::sync::Arc;

use cfgmap_ir::{
    InterfaceMetadata, MappingIntrospector, PropertyMetadata, SchemaId, SchemaType,
    SharedInterfaceMetadata,
};
use dashmap::DashMap;
use rustc_hash::{FxBuildHasher, FxHashSet};

/// What an interface-style mapping declares.
#[derive(Clone, Debug, Default)]
pub struct InterfaceDecl {
    pub properties: Vec<PropertyMetadata>,
    /// Directly nested mappings.
    pub nested: Vec<SchemaType>,
    /// Direct supertypes.
    pub super_types: Vec<SchemaType>,
}

impl InterfaceDecl {
    pub fn new(properties: Vec<PropertyMetadata>) -> Self {
        InterfaceDecl {
            properties,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn nested(mut self, nested: SchemaType) -> Self {
        self.nested.push(nested);
        self
    }

    #[must_use]
    pub fn super_type(mut self, super_type: SchemaType) -> Self {
        self.super_types.push(super_type);
        self
    }
}

#[derive(Default)]
struct Tables {
    interfaces: DashMap<SchemaType, InterfaceDecl, FxBuildHasher>,
    /// Properties of class-style mappings, served through their wrapper.
    classes: DashMap<SchemaType, Vec<PropertyMetadata>, FxBuildHasher>,
    built: DashMap<SchemaType, SharedInterfaceMetadata, FxBuildHasher>,
}

/// Declared mappings, shared between clones.
#[derive(Clone, Default)]
pub struct DeclaredMappings(Arc<Tables>);

impl DeclaredMappings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare an interface-style mapping.
    pub fn declare_interface(&self, schema: &SchemaType, decl: InterfaceDecl) {
        self.0.interfaces.insert(schema.clone(), decl);
        self.0.built.remove(schema);
    }

    /// Declare a class-style mapping.
    ///
    /// The properties are reported for the synthetic wrapper interface once
    /// the wrapper is defined.
    pub fn declare_class(&self, schema: &SchemaType, properties: Vec<PropertyMetadata>) {
        self.0.classes.insert(schema.clone(), properties);
    }

    /// Check if `schema` was declared as an interface.
    pub fn is_declared(&self, schema: &SchemaType) -> bool {
        self.0.interfaces.contains_key(schema)
    }

    fn build(&self, schema: &SchemaType) -> Option<SharedInterfaceMetadata> {
        if let Some(origin) = schema.origin() {
            let properties = self.0.classes.get(origin)?.clone();
            return Some(Arc::new(InterfaceMetadata::new(schema.clone(), properties)));
        }

        let mut path = FxHashSet::default();
        path.insert(schema.id());
        self.build_interface(schema, &mut path)
    }

    /// `path` holds the types currently being built, outermost first. Only
    /// those are skipped, so a type reached along two paths gets the same
    /// metadata on both.
    fn build_interface(
        &self,
        schema: &SchemaType,
        path: &mut FxHashSet<SchemaId>,
    ) -> Option<SharedInterfaceMetadata> {
        // Clone out so no shard lock is held while recursing
        let decl = self.0.interfaces.get(schema)?.clone();

        let nested = self.collect(&decl.nested, path, InterfaceMetadata::nested);
        let super_types = self.collect(&decl.super_types, path, InterfaceMetadata::super_types);

        Some(Arc::new(
            InterfaceMetadata::new(schema.clone(), decl.properties)
                .with_nested(nested)
                .with_super_types(super_types),
        ))
    }

    /// Metadata of `roots`, each followed by what `reachable` yields for it.
    fn collect(
        &self,
        roots: &[SchemaType],
        path: &mut FxHashSet<SchemaId>,
        reachable: fn(&InterfaceMetadata) -> &[SharedInterfaceMetadata],
    ) -> Vec<SharedInterfaceMetadata> {
        let mut out = Vec::new();
        for root in roots {
            if !path.insert(root.id()) {
                continue;
            }
            let built = self.build_interface(root, path);
            path.remove(&root.id());
            let Some(meta) = built else {
                continue;
            };
            let reached = reachable(&meta).to_vec();
            out.push(meta);
            out.extend(reached);
        }
        out
    }
}

impl MappingIntrospector for DeclaredMappings {
    fn interface_metadata(&self, schema: &SchemaType) -> Option<SharedInterfaceMetadata> {
        if let Some(built) = self.0.built.get(schema) {
            return Some(built.clone());
        }
        let meta = self.build(schema)?;
        Some(
            self.0
                .built
                .entry(schema.clone())
                .or_insert(meta)
                .clone(),
        )
    }
}

impl std::fmt::Debug for DeclaredMappings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeclaredMappings")
            .field("interfaces", &self.0.interfaces.len())
            .field("classes", &self.0.classes.len())
            .finish()
    }
}
