//! Per-schema-type memoization of resolved artifacts.
//!
//! Each schema type gets one slot. A slot is filled at most once; after that
//! every lookup is a lock-free read.
//!
//! # Thread Safety
//! The slot map only serializes slot creation. Computation happens outside
//! the map under the slot's own init lock, so resolving two different types
//! never contends, and a computation may recurse into the cache for another
//! type. Concurrent callers for the same type wait on the init lock and then
//! observe the stored artifact. A failed computation leaves the slot empty
//! so the next caller runs it again.

// Arc keeps a slot alive outside the map shard lock while it is initialized.
#![expect(
    clippy::disallowed_types,
    reason = "Arc keeps cache slots alive outside the shard lock"
)]

use std::fmt;
use std::sync::{Arc, OnceLock};

use cfgmap_ir::{ArtifactRef, SchemaType};
use dashmap::DashMap;
use parking_lot::Mutex;
use rustc_hash::FxBuildHasher;

#[derive(Default)]
struct CacheSlot {
    value: OnceLock<ArtifactRef>,
    init: Mutex<()>,
}

/// Memoized mapping from schema type to artifact.
///
/// Entries are never invalidated or evicted.
pub struct ImplementationCache {
    slots: DashMap<SchemaType, Arc<CacheSlot>, FxBuildHasher>,
}

impl ImplementationCache {
    pub fn new() -> Self {
        ImplementationCache {
            slots: DashMap::with_hasher(FxBuildHasher),
        }
    }

    /// Look up a memoized artifact without computing anything.
    pub fn get(&self, key: &SchemaType) -> Option<ArtifactRef> {
        self.slots.get(key)?.value.get().cloned()
    }

    /// Return the memoized artifact for `key`, computing it with `init` if absent.
    ///
    /// `init` runs at most once to completion per key.
    pub fn get_or_try_init<E>(
        &self,
        key: &SchemaType,
        init: impl FnOnce() -> Result<ArtifactRef, E>,
    ) -> Result<ArtifactRef, E> {
        let slot = self.slot(key);

        // Fast path: already computed
        if let Some(hit) = slot.value.get() {
            tracing::trace!(schema = %key, artifact = hit.name(), "implementation cache hit");
            return Ok(hit.clone());
        }

        // Slow path: compute under the slot's init lock
        let _guard = slot.init.lock();

        // Double-check after acquiring the init lock
        if let Some(hit) = slot.value.get() {
            return Ok(hit.clone());
        }

        tracing::debug!(schema = %key, "implementation cache miss");
        let artifact = init()?;
        Ok(slot.value.get_or_init(|| artifact).clone())
    }

    fn slot(&self, key: &SchemaType) -> Arc<CacheSlot> {
        if let Some(slot) = self.slots.get(key) {
            return Arc::clone(&slot);
        }
        Arc::clone(&self.slots.entry(key.clone()).or_default())
    }

    /// Number of schema types with a computed artifact.
    pub fn len(&self) -> usize {
        self.slots
            .iter()
            .filter(|slot| slot.value().value.get().is_some())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for ImplementationCache {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ImplementationCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImplementationCache")
            .field("len", &self.len())
            .finish()
    }
}
