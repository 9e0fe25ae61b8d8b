//! Metadata resolution and eager preparation.

use cfgmap_ir::{
    ArtifactRef, BindingMetadata, InterfaceMetadata, SchemaType, SharedInterfaceMetadata,
};

use super::MappingLoader;
use crate::error::{LoadError, LoadResult};

impl MappingLoader {
    /// Every binding metadata the mapping for `schema` needs, in a stable
    /// order.
    ///
    /// For an interface: the interface, its nested mappings, then each
    /// supertype followed by the supertype's nested mappings. For a
    /// class-style type: the class's own metadata, then the resolution of
    /// its wrapper interface.
    ///
    /// # Errors
    /// `NotAMapping` when neither shape applies.
    pub fn resolve(&self, schema: &SchemaType) -> LoadResult<Vec<BindingMetadata>> {
        let mut out = Vec::new();

        if let Some(iface) = self.interface_metadata(schema) {
            push_interface(&mut out, &iface);
        }

        if let Some(class) = self.class_metadata(schema) {
            out.push(BindingMetadata::Class(class));
            let wrapper = self.mapping_interface(schema)?;
            push_interface(&mut out, &wrapper);
        }

        if out.is_empty() {
            return Err(LoadError::not_a_mapping(schema));
        }
        Ok(out)
    }

    /// Define every artifact the mapping for `schema` needs.
    ///
    /// Returns the artifacts in [`resolve`](Self::resolve) order. Interface
    /// artifacts go through the cache, so a later [`artifact`](Self::artifact)
    /// call is a hit.
    pub fn prepare(&self, schema: &SchemaType) -> LoadResult<Vec<ArtifactRef>> {
        let metadata = self.resolve(schema)?;
        let mut artifacts = Vec::with_capacity(metadata.len());
        for meta in &metadata {
            let artifact = match meta {
                BindingMetadata::Interface(iface) => self.artifact(iface.interface_type())?,
                BindingMetadata::Class(class) => {
                    self.ensure_defined(class.class_type().scope(), meta)?
                }
            };
            artifacts.push(artifact);
        }
        tracing::debug!(schema = %schema, count = artifacts.len(), "prepared mapping");
        Ok(artifacts)
    }
}

fn push_interface(out: &mut Vec<BindingMetadata>, iface: &SharedInterfaceMetadata) {
    out.push(BindingMetadata::Interface(iface.clone()));
    push_nested(out, iface);
    for super_type in iface.super_types() {
        out.push(BindingMetadata::Interface(super_type.clone()));
        push_nested(out, super_type);
    }
}

fn push_nested(out: &mut Vec<BindingMetadata>, iface: &InterfaceMetadata) {
    out.extend(
        iface
            .nested()
            .iter()
            .cloned()
            .map(BindingMetadata::Interface),
    );
}
