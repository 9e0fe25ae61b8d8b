//! Keyed mutual exclusion for artifact definition.
//!
//! One lock per artifact name, created on first use and kept for the life of
//! the registry. The set of names is bounded by the application's static
//! set of mappings, so entries are never removed.
//!
//! # Thread Safety
//! Lock creation goes through `DashMap::entry`, which holds the shard write
//! lock while inserting. Two threads racing on a new name always receive the
//! same lock object.

// Arc is the implementation of NameLock - all usage goes through the newtype
#![expect(
    clippy::disallowed_types,
    reason = "Arc is the implementation of NameLock"
)]

use std::fmt;
use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::{Mutex, MutexGuard};
use rustc_hash::FxBuildHasher;

/// Lock guarding definition of one artifact name.
#[derive(Clone, Default)]
pub struct NameLock(Arc<Mutex<()>>);

impl NameLock {
    /// Block until the lock is held.
    pub fn lock(&self) -> MutexGuard<'_, ()> {
        self.0.lock()
    }

    /// Check if two handles refer to the same lock.
    #[inline]
    pub fn ptr_eq(&self, other: &NameLock) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for NameLock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NameLock(locked={})", self.0.is_locked())
    }
}

/// Registry of per-name locks.
pub struct LockRegistry {
    locks: DashMap<String, NameLock, FxBuildHasher>,
}

impl LockRegistry {
    pub fn new() -> Self {
        LockRegistry {
            locks: DashMap::with_hasher(FxBuildHasher),
        }
    }

    /// Get the lock for `name`, creating it on first use.
    pub fn lock_for(&self, name: &str) -> NameLock {
        // Fast path: no allocation for names seen before
        if let Some(lock) = self.locks.get(name) {
            return lock.clone();
        }

        self.locks
            .entry(name.to_owned())
            .or_insert_with(NameLock::default)
            .clone()
    }

    /// Check if a lock exists for `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.locks.contains_key(name)
    }

    /// Number of distinct names ever locked.
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}

impl Default for LockRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for LockRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LockRegistry")
            .field("len", &self.locks.len())
            .finish()
    }
}
