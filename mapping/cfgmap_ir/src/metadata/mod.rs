//! Binding metadata: what a mapping declares and what its artifact is named.
//!
//! Two shapes exist:
//! - [`InterfaceMetadata`] for interface-style mappings. Carries properties
//!   plus the nested and supertype mappings reachable from the interface.
//! - [`ClassMetadata`] for class-style mappings. Describes only the synthetic
//!   wrapper interface; everything else comes from the wrapper's own
//!   interface metadata once it is defined.
//!
//! The artifact payload is not stored here. It is produced on demand by a
//! generator from this metadata.

// Metadata is shared between the resolver output, the generator and the
// introspector's memo table.
#![expect(
    clippy::disallowed_types,
    reason = "Arc shares immutable metadata across threads"
)]

use std::sync::Arc;

use crate::naming;
use crate::SchemaType;

/// Shared interface metadata.
pub type SharedInterfaceMetadata = Arc<InterfaceMetadata>;

/// Shared class metadata.
pub type SharedClassMetadata = Arc<ClassMetadata>;

/// A single declared property.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PropertyMetadata {
    /// Full property path, e.g. `server.port`.
    pub path: String,
    /// Literal default, if the property declares one.
    pub default: Option<String>,
}

impl PropertyMetadata {
    pub fn new(path: impl Into<String>) -> Self {
        PropertyMetadata {
            path: path.into(),
            default: None,
        }
    }

    #[must_use]
    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }
}

/// Metadata of an interface-style mapping.
#[derive(Debug)]
pub struct InterfaceMetadata {
    interface_type: SchemaType,
    class_name: String,
    properties: Vec<PropertyMetadata>,
    nested: Vec<SharedInterfaceMetadata>,
    super_types: Vec<SharedInterfaceMetadata>,
}

impl InterfaceMetadata {
    /// Metadata for `interface_type` declaring `properties`.
    ///
    /// The artifact name is derived from the type.
    pub fn new(interface_type: SchemaType, properties: Vec<PropertyMetadata>) -> Self {
        let class_name = naming::implementation_name(&interface_type);
        InterfaceMetadata {
            interface_type,
            class_name,
            properties,
            nested: Vec::new(),
            super_types: Vec::new(),
        }
    }

    /// Set the nested mappings, in declaration order.
    ///
    /// Introspectors pass every mapping reachable through nesting, not only
    /// direct children.
    #[must_use]
    pub fn with_nested(mut self, nested: Vec<SharedInterfaceMetadata>) -> Self {
        self.nested = nested;
        self
    }

    /// Set the supertype mappings, in declaration order.
    #[must_use]
    pub fn with_super_types(mut self, super_types: Vec<SharedInterfaceMetadata>) -> Self {
        self.super_types = super_types;
        self
    }

    pub fn interface_type(&self) -> &SchemaType {
        &self.interface_type
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    pub fn properties(&self) -> &[PropertyMetadata] {
        &self.properties
    }

    pub fn nested(&self) -> &[SharedInterfaceMetadata] {
        &self.nested
    }

    pub fn super_types(&self) -> &[SharedInterfaceMetadata] {
        &self.super_types
    }
}

/// Metadata of a class-style mapping.
///
/// `class_name` is the synthetic wrapper interface's name.
#[derive(Debug)]
pub struct ClassMetadata {
    class_type: SchemaType,
    interface_name: String,
}

impl ClassMetadata {
    /// Metadata for a class-style type, or `None` if `class_type` is not one.
    pub fn of(class_type: &SchemaType) -> Option<Self> {
        let interface_name = naming::synthetic_interface_name(class_type)?;
        Some(ClassMetadata {
            class_type: class_type.clone(),
            interface_name,
        })
    }

    /// The class the wrapper interface is generated for.
    pub fn class_type(&self) -> &SchemaType {
        &self.class_type
    }

    pub fn class_name(&self) -> &str {
        &self.interface_name
    }
}

/// Descriptor of one artifact a mapping needs.
#[derive(Clone, Debug)]
pub enum BindingMetadata {
    Interface(SharedInterfaceMetadata),
    Class(SharedClassMetadata),
}

impl BindingMetadata {
    /// Derived artifact name.
    pub fn class_name(&self) -> &str {
        match self {
            BindingMetadata::Interface(iface) => iface.class_name(),
            BindingMetadata::Class(class) => class.class_name(),
        }
    }

    /// The schema type this metadata originates from.
    pub fn interface_type(&self) -> &SchemaType {
        match self {
            BindingMetadata::Interface(iface) => iface.interface_type(),
            BindingMetadata::Class(class) => class.class_type(),
        }
    }

    #[inline]
    pub fn is_class_style(&self) -> bool {
        matches!(self, BindingMetadata::Class(_))
    }

    /// Nested mappings (always empty for class-style metadata).
    pub fn nested(&self) -> &[SharedInterfaceMetadata] {
        match self {
            BindingMetadata::Interface(iface) => iface.nested(),
            BindingMetadata::Class(_) => &[],
        }
    }

    /// Supertype mappings (always empty for class-style metadata).
    pub fn super_types(&self) -> &[SharedInterfaceMetadata] {
        match self {
            BindingMetadata::Interface(iface) => iface.super_types(),
            BindingMetadata::Class(_) => &[],
        }
    }
}

/// Source of interface metadata.
///
/// Decides what an interface-style schema type declares. Returns `None` for
/// types it does not recognize as mappings.
pub trait MappingIntrospector: Send + Sync {
    fn interface_metadata(&self, schema: &SchemaType) -> Option<SharedInterfaceMetadata>;
}
