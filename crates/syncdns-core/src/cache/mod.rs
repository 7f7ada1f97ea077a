// # Shared Cache
//
// Process-local cache of resolved zone/record state.
//
// ## Purpose
//
// Steady-state reconcile ticks should not pay two provider lookups just to
// rediscover identifiers that never change. The cache holds the last
// resolved `{zone, record}` pair (serialized to text) per key so a tick can
// skip the lookup round-trips entirely.
//
// ## Model
//
// A fixed set of named regions is registered once at startup and injected
// into both the reconcile engine and the status reporter. Each region is a
// string-keyed, string-valued map. There is no expiry, eviction, or size
// bound: entries live until overwritten or the process exits.
//
// ## Crash Behavior
//
// All state is lost on restart. The first tick after a restart resolves via
// the provider and repopulates the cache, which is harmless.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

/// A single named cache region: a string-keyed map of serialized entries
///
/// `set` replaces a key's value atomically under the write lock; readers
/// never observe a partially written value. There is no coordination beyond
/// that single-key atomicity: concurrent writers race and the last one wins.
#[derive(Debug, Clone, Default)]
pub struct CacheRegion {
    inner: Arc<RwLock<HashMap<String, String>>>,
}

impl CacheRegion {
    /// Create a new empty region
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Check whether a key is present
    pub async fn has(&self, key: &str) -> bool {
        self.inner.read().await.contains_key(key)
    }

    /// Get the value stored under a key
    pub async fn get(&self, key: &str) -> Option<String> {
        self.inner.read().await.get(key).cloned()
    }

    /// Store a value under a key, overwriting unconditionally
    pub async fn set(&self, key: impl Into<String>, value: impl Into<String>) {
        let mut guard = self.inner.write().await;
        guard.insert(key.into(), value.into());
    }

    /// Number of entries in the region
    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    /// Check whether the region is empty
    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }
}

/// The process-wide set of named cache regions
///
/// Regions are fixed at construction; looking up an unregistered namespace
/// yields `None` and it is the caller's job to turn that into an error (the
/// engine's resolve path) or a skip (the engine's refresh path).
///
/// Cloning is cheap and every clone shares the same underlying storage, so
/// one `SharedCache` built at startup can be handed to the engine and the
/// status reporter alike.
#[derive(Debug, Clone, Default)]
pub struct SharedCache {
    regions: Arc<HashMap<String, CacheRegion>>,
}

impl SharedCache {
    /// Build a cache with the given pre-registered region names
    pub fn new<I, S>(region_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let regions = region_names
            .into_iter()
            .map(|name| (name.into(), CacheRegion::new()))
            .collect();

        Self {
            regions: Arc::new(regions),
        }
    }

    /// Look up a region by namespace
    pub fn region(&self, namespace: &str) -> Option<CacheRegion> {
        self.regions.get(namespace).cloned()
    }

    /// Check whether a namespace is registered
    pub fn has_region(&self, namespace: &str) -> bool {
        self.regions.contains_key(namespace)
    }

    /// Names of all registered regions
    pub fn region_names(&self) -> Vec<String> {
        self.regions.keys().cloned().collect()
    }
}
