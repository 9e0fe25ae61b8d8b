//! `MappingLoaderBuilder` for assembling loaders in either generation mode.

use std::fmt;
use std::str::FromStr;

use cfgmap_ir::MappingIntrospector;
use thiserror::Error;

use super::MappingLoader;
use crate::generate::{Generator, ManifestGenerator, PrecomputedGenerator};
use crate::introspect::DeclaredMappings;

/// Where artifact bytes come from.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum GenerationMode {
    /// Generate artifacts on first use.
    #[default]
    Runtime,
    /// Serve artifacts produced ahead of time. Nothing is generated.
    Precomputed,
}

impl GenerationMode {
    /// Environment variable selecting the mode.
    pub const ENV_VAR: &'static str = "CFGMAP_GENERATION";

    /// Mode selected by `CFGMAP_GENERATION`, or `Runtime` when unset.
    pub fn from_env() -> Result<Self, ConfigurationError> {
        match std::env::var(Self::ENV_VAR) {
            Ok(value) => value.parse(),
            Err(_) => Ok(GenerationMode::Runtime),
        }
    }
}

impl FromStr for GenerationMode {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "runtime" => Ok(GenerationMode::Runtime),
            "precomputed" => Ok(GenerationMode::Precomputed),
            _ => Err(ConfigurationError::UnknownMode(s.to_owned())),
        }
    }
}

impl fmt::Display for GenerationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerationMode::Runtime => write!(f, "runtime"),
            GenerationMode::Precomputed => write!(f, "precomputed"),
        }
    }
}

/// Error returned when a loader cannot be assembled.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("precomputed generation mode requires a precomputed artifact table")]
    MissingPrecomputedTable,
    #[error("unknown generation mode `{0}` (expected `runtime` or `precomputed`)")]
    UnknownMode(String),
}

/// Builder for [`MappingLoader`].
///
/// Defaults: an empty [`DeclaredMappings`] introspector, the
/// [`ManifestGenerator`] and [`GenerationMode::Runtime`]. In precomputed mode
/// the precomputed table replaces the generator.
pub struct MappingLoaderBuilder {
    introspector: Option<Box<dyn MappingIntrospector>>,
    generator: Option<Box<dyn Generator>>,
    precomputed: Option<PrecomputedGenerator>,
    mode: GenerationMode,
}

impl MappingLoaderBuilder {
    pub fn new() -> Self {
        MappingLoaderBuilder {
            introspector: None,
            generator: None,
            precomputed: None,
            mode: GenerationMode::default(),
        }
    }

    /// Set the source of interface metadata.
    #[must_use]
    pub fn introspector(mut self, introspector: impl MappingIntrospector + 'static) -> Self {
        self.introspector = Some(Box::new(introspector));
        self
    }

    /// Set the runtime generator.
    #[must_use]
    pub fn generator(mut self, generator: impl Generator + 'static) -> Self {
        self.generator = Some(Box::new(generator));
        self
    }

    /// Set the ahead-of-time artifact table.
    #[must_use]
    pub fn precomputed(mut self, table: PrecomputedGenerator) -> Self {
        self.precomputed = Some(table);
        self
    }

    /// Set the generation mode.
    #[must_use]
    pub fn mode(mut self, mode: GenerationMode) -> Self {
        self.mode = mode;
        self
    }

    /// Assemble the loader.
    ///
    /// # Errors
    /// `MissingPrecomputedTable` in precomputed mode without a table.
    pub fn build(self) -> Result<MappingLoader, ConfigurationError> {
        let introspector = self
            .introspector
            .unwrap_or_else(|| Box::new(DeclaredMappings::new()));

        let generator: Box<dyn Generator> = match self.mode {
            GenerationMode::Runtime => self
                .generator
                .unwrap_or_else(|| Box::new(ManifestGenerator)),
            GenerationMode::Precomputed => Box::new(
                self.precomputed
                    .ok_or(ConfigurationError::MissingPrecomputedTable)?,
            ),
        };

        tracing::debug!(mode = %self.mode, "built mapping loader");
        Ok(MappingLoader::from_parts(introspector, generator, self.mode))
    }
}

impl Default for MappingLoaderBuilder {
    fn default() -> Self {
        Self::new()
    }
}
