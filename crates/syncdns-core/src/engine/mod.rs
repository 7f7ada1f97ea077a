//! Core reconcile engine
//!
//! The ReconcileEngine runs one reconciliation tick on demand:
//! - Resolve the managed zone/record (from cache, or via the provider)
//! - Fetch the current public IP
//! - Update the record only when its content has drifted
//! - Refresh the cache when it is missing or stale
//!
//! ## Tick Flow
//!
//! ```text
//! ResolveIdentity ─▶ FetchCurrentIP ─▶ Compare ─▶ (UpdateRecord)? ─▶ (RefreshCache)? ─▶ Done
//! ```
//!
//! A single linear path with no branching back. Every network call is a
//! suspension point and they run strictly in issuing order. Any error
//! aborts the tick and propagates to the host, which logs it and lets the
//! next scheduled tick proceed independently — there is no tick-level
//! retry or backoff in here.

use tracing::{debug, info, warn};

use crate::cache::SharedCache;
use crate::config::ReconcileConfig;
use crate::error::{Error, Result};
use crate::traits::{IpSource, RecordApi};
use crate::types::{CacheEntry, DomainRecord, Zone};

/// Result of one reconcile tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// The record content had drifted and was replaced
    Updated {
        /// Content before the update
        previous: String,
        /// Content after the update (the fetched IP)
        content: String,
    },
    /// The record already matched the current IP
    Unchanged {
        /// The record content
        content: String,
    },
}

/// Orchestrates one reconciliation tick
///
/// Dependencies are injected at construction: the provider client, the IP
/// source, and the shared cache store (whose lifecycle is owned by the
/// host process). The engine holds no other state, so concurrent ticks —
/// possible when a tick outlives the timer interval — race only on the
/// cache, where the last write wins.
pub struct ReconcileEngine {
    /// Provider record API
    api: Box<dyn RecordApi>,

    /// Public IP discovery
    ip_source: Box<dyn IpSource>,

    /// Shared cache of resolved zone/record state
    cache: SharedCache,

    /// Managed record parameters
    config: ReconcileConfig,
}

impl ReconcileEngine {
    /// Create a new engine
    ///
    /// Validates the configuration shape. Whether the configured cache
    /// namespace is actually registered is checked per tick, so a cache
    /// wired up after a config reload is picked up without rebuilding the
    /// engine.
    pub fn new(
        api: Box<dyn RecordApi>,
        ip_source: Box<dyn IpSource>,
        cache: SharedCache,
        config: ReconcileConfig,
    ) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            api,
            ip_source,
            cache,
            config,
        })
    }

    /// Run one reconcile tick
    pub async fn tick(&self) -> Result<TickOutcome> {
        let (zone, mut record) = self.resolve_identity().await?;

        let ip = self.ip_source.current().await?;
        let ip_text = ip.to_string();
        debug!(record = %record.name, current = %record.content, ip = %ip_text, "compared record against current IP");

        let original_content = record.content.clone();

        let outcome = if record.content != ip_text {
            record = self.api.update_record(&record, &ip_text).await?;
            info!(record = %record.name, previous = %original_content, content = %ip_text, "record updated");
            TickOutcome::Updated {
                previous: original_content.clone(),
                content: ip_text.clone(),
            }
        } else {
            debug!(record = %record.name, "record already up to date");
            TickOutcome::Unchanged {
                content: ip_text.clone(),
            }
        };

        self.refresh_cache(&zone, &record, &ip_text, &original_content)
            .await?;

        Ok(outcome)
    }

    /// Resolve the managed zone and record
    ///
    /// With a cache key configured, the configured namespace must name a
    /// registered region; a cached entry is loaded verbatim with no
    /// freshness check. On a cache miss (or with no cache key at all) the
    /// pair is resolved via the provider: zone first, then record.
    async fn resolve_identity(&self) -> Result<(Zone, DomainRecord)> {
        if let Some(spec) = &self.config.cache_key {
            let region = self
                .cache
                .region(&spec.namespace)
                .ok_or_else(|| Error::config("cacheZone not found"))?;

            if let Some(raw) = region.get(&spec.key).await {
                let entry = CacheEntry::from_json(&raw)?;
                debug!(namespace = %spec.namespace, key = %spec.key, "resolved zone/record from cache");
                return Ok((entry.zone, entry.record));
            }
        }

        let zone = self.api.find_zone(&self.config.domain).await?;
        let record = self
            .api
            .find_record(&zone, &self.config.record_name, self.config.record_type)
            .await?;
        debug!(zone = %zone.name, record = %record.name, provider = self.api.provider_name(), "resolved zone/record via provider");

        Ok((zone, record))
    }

    /// Write the resolved pair back into the cache when needed
    ///
    /// Runs only with a cache key configured, and only when the write
    /// region lacks this zone's id or the fetched IP differed from the
    /// record's original content. The write key is `(zone.name, zone.id)`,
    /// derived from the zone itself — deliberately independent of the
    /// configured lookup key. An unregistered `zone.name` region skips the
    /// write with a warning rather than failing the tick.
    async fn refresh_cache(
        &self,
        zone: &Zone,
        record: &DomainRecord,
        ip_text: &str,
        original_content: &str,
    ) -> Result<()> {
        if self.config.cache_key.is_none() {
            return Ok(());
        }

        let Some(region) = self.cache.region(&zone.name) else {
            warn!(namespace = %zone.name, "cache refresh skipped: region not registered");
            return Ok(());
        };

        if region.has(&zone.id).await && ip_text == original_content {
            return Ok(());
        }

        let entry = CacheEntry {
            zone: zone.clone(),
            record: record.clone(),
        };
        region.set(zone.id.clone(), entry.to_json()?).await;
        debug!(namespace = %zone.name, key = %zone.id, "cache refreshed");

        Ok(())
    }
}
