//! Read-only status reporting over the shared cache
//!
//! The reporter renders the last-known record state from the cache without
//! re-querying the provider. It has no way to reach the provider at all:
//! its only dependencies are the cache and the configured lookup key.

use tracing::debug;

use crate::cache::SharedCache;
use crate::error::{Error, Result};
use crate::types::{CacheEntry, CacheKeySpec};

/// A rendered status response: HTTP status code plus plain-text body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusReport {
    pub status: u16,
    pub body: String,
}

/// Read-only consumer of the shared cache
#[derive(Debug, Clone)]
pub struct StatusReporter {
    cache: SharedCache,
    cache_key: Option<CacheKeySpec>,
}

impl StatusReporter {
    /// Create a reporter over the given cache and configured lookup key
    pub fn new(cache: SharedCache, cache_key: Option<CacheKeySpec>) -> Self {
        Self { cache, cache_key }
    }

    /// Load the cached entry for the configured key
    ///
    /// Fails with [`Error::NoCacheConfigured`] when no cache key is
    /// configured, and with [`Error::CacheMiss`] when the namespace is not
    /// a registered region or the key is absent from it.
    pub async fn entry(&self) -> Result<CacheEntry> {
        let spec = self.cache_key.as_ref().ok_or(Error::NoCacheConfigured)?;

        let raw = match self.cache.region(&spec.namespace) {
            Some(region) => region.get(&spec.key).await,
            None => None,
        };
        let raw = raw.ok_or_else(|| Error::cache_miss(spec.to_string()))?;

        CacheEntry::from_json(&raw)
    }

    /// Render the plain-text status response
    ///
    /// 200 with a fixed-format summary on success; 500 with "No cache
    /// found" when no cache key is configured and "Failed to find cache"
    /// when the lookup misses. The 500 bodies are fixed messages relied on
    /// by callers.
    pub async fn render(&self) -> StatusReport {
        match self.entry().await {
            Ok(entry) => StatusReport {
                status: 200,
                body: format!(
                    "DNS record status\n\
                     record: {} ({})\n\
                     zone: {}\n\
                     last updated: {}\n\
                     content: {}\n",
                    entry.record.name,
                    entry.record.record_type,
                    entry.zone.name,
                    entry.record.modified_on.to_rfc3339(),
                    entry.record.content,
                ),
            },
            Err(Error::NoCacheConfigured) => StatusReport {
                status: 500,
                body: "No cache found".to_string(),
            },
            Err(err) => {
                debug!(error = %err, "status lookup failed");
                StatusReport {
                    status: 500,
                    body: "Failed to find cache".to_string(),
                }
            }
        }
    }
}
