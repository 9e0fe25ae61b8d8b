//! Artifact generators.
//!
//! A generator turns binding metadata into artifact bytes. Two are provided:
//! - [`ManifestGenerator`]: runtime generation, encodes an [`ArtifactManifest`]
//! - [`PrecomputedGenerator`]: ahead-of-time mode, serves bytes produced at
//!   build time and never generates anything itself

use std::fmt;

use cfgmap_ir::BindingMetadata;
use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::manifest::ArtifactManifest;

/// Error returned by [`Generator::generate`].
#[derive(Debug, Error)]
pub enum GenerateError {
    /// Ahead-of-time mode has no bytes for this artifact.
    #[error("no precomputed artifact named `{name}`")]
    NotPrecomputed { name: String },
    /// The artifact payload could not be encoded.
    #[error("failed to encode `{name}`: {source}")]
    Encode {
        name: String,
        #[source]
        source: bincode::Error,
    },
    /// Failure raised by a custom generator.
    #[error(transparent)]
    Other(Box<dyn std::error::Error + Send + Sync>),
}

/// Source of artifact bytes.
pub trait Generator: Send + Sync {
    fn generate(&self, metadata: &BindingMetadata) -> Result<Vec<u8>, GenerateError>;
}

/// Runtime generator emitting encoded artifact manifests.
#[derive(Copy, Clone, Debug, Default)]
pub struct ManifestGenerator;

impl ManifestGenerator {
    /// Build the manifest for `metadata` without encoding it.
    pub fn manifest(metadata: &BindingMetadata) -> ArtifactManifest {
        match metadata {
            BindingMetadata::Interface(iface) => ArtifactManifest::implementation(iface),
            BindingMetadata::Class(class) => ArtifactManifest::wrapper_interface(class),
        }
    }
}

impl Generator for ManifestGenerator {
    fn generate(&self, metadata: &BindingMetadata) -> Result<Vec<u8>, GenerateError> {
        Self::manifest(metadata)
            .encode()
            .map_err(|source| GenerateError::Encode {
                name: metadata.class_name().to_owned(),
                source,
            })
    }
}

/// Ahead-of-time artifact table.
///
/// Filled once (typically while building the application) and then only
/// read. Lookups are by artifact name.
#[derive(Clone, Default)]
pub struct PrecomputedGenerator {
    table: FxHashMap<String, Vec<u8>>,
}

impl PrecomputedGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the bytes for one artifact name.
    pub fn insert(&mut self, name: impl Into<String>, bytes: Vec<u8>) {
        self.table.insert(name.into(), bytes);
    }

    /// Run `generator` over `metadata` and record every result.
    pub fn precompute<'a>(
        generator: &dyn Generator,
        metadata: impl IntoIterator<Item = &'a BindingMetadata>,
    ) -> Result<Self, GenerateError> {
        let mut table = Self::new();
        for meta in metadata {
            let bytes = generator.generate(meta)?;
            table.insert(meta.class_name(), bytes);
        }
        Ok(table)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.table.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

impl Generator for PrecomputedGenerator {
    fn generate(&self, metadata: &BindingMetadata) -> Result<Vec<u8>, GenerateError> {
        let name = metadata.class_name();
        self.table
            .get(name)
            .cloned()
            .ok_or_else(|| GenerateError::NotPrecomputed {
                name: name.to_owned(),
            })
    }
}

impl fmt::Debug for PrecomputedGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&String> = self.table.keys().collect();
        names.sort();
        f.debug_struct("PrecomputedGenerator")
            .field("artifacts", &names)
            .finish()
    }
}
