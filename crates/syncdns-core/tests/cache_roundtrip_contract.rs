//! Contract Test: Cache Refresh Semantics
//!
//! Verifies how a tick writes resolved state back into the shared cache.
//!
//! Constraints verified:
//! - The write always lands in the `zone.name` region under the `zone.id`
//!   key, independent of the configured lookup key
//! - A refreshed entry is not visible under a different lookup key
//! - No overwrite happens when the key is present and the IP unchanged
//! - A stale entry under the write key is overwritten after an update
//! - An unregistered `zone.name` region skips the write without failing
//!   the tick
//!
//! If any of these fail, cache refresh is broken.

mod common;

use common::*;
use syncdns_core::types::{CacheEntry, CacheKeySpec};
use syncdns_core::{ReconcileConfig, ReconcileEngine, RecordType, SharedCache, TickOutcome};

fn config(cache_key: &str) -> ReconcileConfig {
    ReconcileConfig {
        domain: "example.com".to_string(),
        record_name: "home.example.com".to_string(),
        record_type: RecordType::A,
        cache_key: Some(cache_key.parse::<CacheKeySpec>().unwrap()),
    }
}

/// Regions for the common setup: the lookup namespace plus the zone's own
/// name, which is where refreshes land
fn regions() -> SharedCache {
    SharedCache::new(["syncdns".to_string(), "example.com".to_string()])
}

#[tokio::test]
async fn first_tick_populates_the_write_key() {
    // Cold cache: the lookup key misses, identity resolves via the
    // provider, and the refresh writes under (zone.name, zone.id) even
    // though the record needed no update.

    let cache = regions();
    let api = ScriptedRecordApi::new(sample_zone(), sample_record("1.2.3.4"));
    let ip_source = FixedIpSource::new("1.2.3.4");

    let engine = ReconcileEngine::new(
        Box::new(api),
        Box::new(ip_source),
        cache.clone(),
        config("syncdns.home"),
    )
    .expect("engine construction succeeds");

    let outcome = engine.tick().await.expect("tick succeeds");
    assert_eq!(
        outcome,
        TickOutcome::Unchanged {
            content: "1.2.3.4".to_string(),
        }
    );

    let region = cache.region("example.com").unwrap();
    let raw = region.get("Z1").await.expect("write key populated");
    let entry = CacheEntry::from_json(&raw).unwrap();
    assert_eq!(entry.zone.id, "Z1");
    assert_eq!(entry.record.content, "1.2.3.4");
}

#[tokio::test]
async fn refreshed_entry_is_invisible_to_a_different_lookup_key() {
    // The lookup key is (syncdns, home) but the refresh writes under
    // (example.com, Z1), so the next lookup still misses and resolves via
    // the provider again. The write only feeds a lookup whose configured
    // key happens to coincide with (zone.name, zone.id).

    let cache = regions();
    let api = ScriptedRecordApi::new(sample_zone(), sample_record("1.2.3.4"));
    let api_probe = ScriptedRecordApi::sharing_counters_with(&api);
    let ip_source = FixedIpSource::new("1.2.3.4");

    let engine = ReconcileEngine::new(
        Box::new(api),
        Box::new(ip_source),
        cache.clone(),
        config("syncdns.home"),
    )
    .expect("engine construction succeeds");

    engine.tick().await.expect("first tick succeeds");
    engine.tick().await.expect("second tick succeeds");

    let lookup_region = cache.region("syncdns").unwrap();
    assert!(lookup_region.is_empty().await, "lookup region stays empty");
    let write_region = cache.region("example.com").unwrap();
    assert!(write_region.has("Z1").await, "write key is populated");

    // Both ticks resolved via the provider: the write never fed the lookup
    assert_eq!(api_probe.find_zone_call_count(), 2);
}

#[tokio::test]
async fn lookup_key_coinciding_with_the_write_key_closes_the_loop() {
    // With a single-label zone the configured key can name the write
    // location exactly. Tick 2 then reads what tick 1 wrote and skips the
    // provider.

    let mut zone = sample_zone();
    zone.id = "Z9".to_string();
    zone.name = "internal".to_string();
    let mut record = sample_record("1.2.3.4");
    record.zone_id = "Z9".to_string();
    record.zone_name = "internal".to_string();
    record.name = "host.internal".to_string();

    let cache = SharedCache::new(["internal".to_string()]);
    let api = ScriptedRecordApi::new(zone, record);
    let api_probe = ScriptedRecordApi::sharing_counters_with(&api);
    let ip_source = FixedIpSource::new("1.2.3.4");

    let engine = ReconcileEngine::new(
        Box::new(api),
        Box::new(ip_source),
        cache.clone(),
        ReconcileConfig {
            domain: "internal".to_string(),
            record_name: "host.internal".to_string(),
            record_type: RecordType::A,
            cache_key: Some("internal.Z9".parse::<CacheKeySpec>().unwrap()),
        },
    )
    .expect("engine construction succeeds");

    engine.tick().await.expect("first tick succeeds");
    assert_eq!(api_probe.find_zone_call_count(), 1);

    engine.tick().await.expect("second tick succeeds");
    assert_eq!(
        api_probe.find_zone_call_count(),
        1,
        "second tick resolved from cache"
    );
}

#[tokio::test]
async fn no_overwrite_when_key_present_and_ip_unchanged() {
    // Pre-seed the write key with a distinguishable entry. The tick sees
    // an up-to-date record, so the refresh leaves the seeded entry alone.

    let cache = regions();
    let seeded = CacheEntry {
        zone: sample_zone(),
        record: sample_record("9.9.9.9"),
    };
    cache
        .region("example.com")
        .unwrap()
        .set("Z1".to_string(), seeded.to_json().unwrap())
        .await;

    let api = ScriptedRecordApi::new(sample_zone(), sample_record("1.2.3.4"));
    let ip_source = FixedIpSource::new("1.2.3.4");

    let engine = ReconcileEngine::new(
        Box::new(api),
        Box::new(ip_source),
        cache.clone(),
        config("syncdns.home"),
    )
    .expect("engine construction succeeds");

    engine.tick().await.expect("tick succeeds");

    let raw = cache.region("example.com").unwrap().get("Z1").await.unwrap();
    let entry = CacheEntry::from_json(&raw).unwrap();
    assert_eq!(
        entry.record.content, "9.9.9.9",
        "seeded entry was not overwritten"
    );
}

#[tokio::test]
async fn stale_write_key_is_overwritten_after_an_update() {
    let cache = regions();
    let seeded = CacheEntry {
        zone: sample_zone(),
        record: sample_record("9.9.9.9"),
    };
    cache
        .region("example.com")
        .unwrap()
        .set("Z1".to_string(), seeded.to_json().unwrap())
        .await;

    let api = ScriptedRecordApi::new(sample_zone(), sample_record("1.2.3.4"));
    let ip_source = FixedIpSource::new("5.6.7.8");

    let engine = ReconcileEngine::new(
        Box::new(api),
        Box::new(ip_source),
        cache.clone(),
        config("syncdns.home"),
    )
    .expect("engine construction succeeds");

    let outcome = engine.tick().await.expect("tick succeeds");
    assert!(matches!(outcome, TickOutcome::Updated { .. }));

    let raw = cache.region("example.com").unwrap().get("Z1").await.unwrap();
    let entry = CacheEntry::from_json(&raw).unwrap();
    assert_eq!(entry.record.content, "5.6.7.8", "entry reflects the update");
}

#[tokio::test]
async fn unregistered_zone_region_skips_the_write_without_failing() {
    // Only the lookup namespace is registered; the zone's own name is not,
    // so the refresh has nowhere to write. The tick still succeeds.

    let cache = SharedCache::new(["syncdns".to_string()]);
    let api = ScriptedRecordApi::new(sample_zone(), sample_record("1.2.3.4"));
    let ip_source = FixedIpSource::new("5.6.7.8");

    let engine = ReconcileEngine::new(
        Box::new(api),
        Box::new(ip_source),
        cache.clone(),
        config("syncdns.home"),
    )
    .expect("engine construction succeeds");

    let outcome = engine
        .tick()
        .await
        .expect("tick succeeds despite no write region");
    assert!(matches!(outcome, TickOutcome::Updated { .. }));

    let region = cache.region("syncdns").unwrap();
    assert!(region.is_empty().await, "nothing was written anywhere");
}
