//! Configuration-mapping loader.
//!
//! Resolves a [`SchemaType`](cfgmap_ir::SchemaType) to the implementation
//! artifact generated for it, generating and defining the artifact in the
//! type's scope the first time it is needed.
//!
//! # Architecture
//!
//! - [`MappingLoader`]: entry point. Owns the lock registry and the cache,
//!   and exposes resolution, instantiation and the accessor bridge.
//! - [`LockRegistry`]: one lock per artifact name, so concurrent resolutions
//!   of one name generate once.
//! - [`ImplementationCache`]: per-schema-type memo, computed at most once.
//! - [`Generator`]: the single place artifact bytes come from. Runtime mode
//!   uses [`ManifestGenerator`]; ahead-of-time mode uses
//!   [`PrecomputedGenerator`].
//!
//! [`LocalScope`] and [`DeclaredMappings`] are in-memory implementations of
//! the scope and introspector collaborators.
//!
//! # Debugging
//!
//! Call [`init_tracing`] and set `RUST_LOG=cfgmap_loader=debug` to see cache
//! misses, lock acquisition and artifact definition.

mod cache;
mod error;
mod generate;
mod introspect;
mod loader;
mod local_scope;
mod locks;
mod manifest;

pub use cache::ImplementationCache;
pub use error::{Accessor, LoadError, LoadResult};
pub use generate::{GenerateError, Generator, ManifestGenerator, PrecomputedGenerator};
pub use introspect::{DeclaredMappings, InterfaceDecl};
pub use loader::{ConfigurationError, GenerationMode, MappingLoader, MappingLoaderBuilder};
pub use local_scope::{BoundMapping, LocalScope, LocalScopeRef, MapContext, UnsupportedContext};
pub use locks::{LockRegistry, NameLock};
pub use manifest::{ArtifactManifest, ManifestKind, ManifestProperty};

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Safe to call multiple times. Does nothing unless `RUST_LOG` is set.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}
