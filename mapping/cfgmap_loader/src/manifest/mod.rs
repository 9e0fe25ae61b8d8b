//! Artifact manifests: the payload the runtime generator emits.
//!
//! A manifest is a self-contained description of one artifact, encoded with
//! `bincode`. [`LocalScope`](crate::LocalScope) turns manifests back into
//! artifacts.
//!
//! Types are referenced by qualified name, never by `SchemaId`. The same
//! bytes can then be defined in any scope declaring a type of that name, and
//! a table built by another process stays valid.

use cfgmap_ir::{ClassMetadata, InterfaceMetadata, MappingDefaults, MappingNames};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

/// One property the artifact binds.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestProperty {
    pub path: String,
    pub default: Option<String>,
}

/// What kind of artifact a manifest describes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ManifestKind {
    /// Implementation of an interface-style mapping.
    Implementation {
        /// Qualified name of the implemented interface.
        implements: String,
        properties: Vec<ManifestProperty>,
        names: MappingNames,
        defaults: MappingDefaults,
    },
    /// Synthetic wrapper interface of a class-style mapping.
    WrapperInterface {
        /// Qualified name of the wrapped class.
        origin: String,
    },
}

/// Encoded description of one artifact.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactManifest {
    pub name: String,
    pub kind: ManifestKind,
}

impl ArtifactManifest {
    /// Manifest of the implementation artifact for an interface mapping.
    ///
    /// Properties are gathered from the interface, its nested mappings and its
    /// supertypes (with their nested mappings), first declaration wins.
    pub fn implementation(iface: &InterfaceMetadata) -> Self {
        let mut seen = FxHashSet::default();
        let mut properties = Vec::new();
        let mut names = MappingNames::new();
        let mut defaults = MappingDefaults::new();

        let group = names
            .entry(iface.interface_type().qualified_name())
            .or_default();
        for member in family(iface) {
            let member_names = group
                .entry(member.interface_type().qualified_name())
                .or_default();
            for prop in member.properties() {
                member_names.insert(prop.path.clone());
                if !seen.insert(prop.path.clone()) {
                    continue;
                }
                if let Some(default) = &prop.default {
                    defaults.insert(prop.path.clone(), default.clone());
                }
                properties.push(ManifestProperty {
                    path: prop.path.clone(),
                    default: prop.default.clone(),
                });
            }
        }

        ArtifactManifest {
            name: iface.class_name().to_owned(),
            kind: ManifestKind::Implementation {
                implements: iface.interface_type().qualified_name(),
                properties,
                names,
                defaults,
            },
        }
    }

    /// Manifest of the synthetic wrapper interface for a class mapping.
    pub fn wrapper_interface(class: &ClassMetadata) -> Self {
        ArtifactManifest {
            name: class.class_name().to_owned(),
            kind: ManifestKind::WrapperInterface {
                origin: class.class_type().qualified_name(),
            },
        }
    }

    pub fn encode(&self) -> Result<Vec<u8>, bincode::Error> {
        bincode::serialize(self)
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, bincode::Error> {
        bincode::deserialize(bytes)
    }
}

/// The interface followed by everything its artifact must bind.
fn family(iface: &InterfaceMetadata) -> Vec<&InterfaceMetadata> {
    let mut members = vec![iface];
    members.extend(iface.nested().iter().map(|m| &**m));
    for super_type in iface.super_types() {
        members.push(super_type);
        members.extend(super_type.nested().iter().map(|m| &**m));
    }
    members
}
