//! Test doubles and common utilities for reconcile contract tests
//!
//! These doubles track call counts so tests can assert which provider
//! operations a tick performed, without any real networking.

use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::{TimeZone, Utc};
use syncdns_core::error::{Error, Result};
use syncdns_core::traits::{IpSource, RecordApi};
use syncdns_core::types::{DomainRecord, RecordType, Zone, ZoneStatus};

/// The canonical test zone
pub fn sample_zone() -> Zone {
    Zone {
        id: "Z1".to_string(),
        name: "example.com".to_string(),
        status: ZoneStatus::Active,
        paused: false,
        plan: HashMap::new(),
    }
}

/// The canonical test record, pointing at `content`
pub fn sample_record(content: &str) -> DomainRecord {
    DomainRecord {
        id: "R1".to_string(),
        zone_id: "Z1".to_string(),
        zone_name: "example.com".to_string(),
        name: "home.example.com".to_string(),
        record_type: RecordType::A,
        content: content.to_string(),
        ttl: 1,
        proxiable: true,
        proxied: false,
        meta: serde_json::json!({}),
        comment: None,
        tags: Vec::new(),
        modified_on: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
    }
}

/// A scripted RecordApi that serves fixed data and tracks calls
///
/// `update_record` returns the input record with the new content applied,
/// mirroring what a real provider echoes back.
pub struct ScriptedRecordApi {
    zone: Zone,
    record: std::sync::Mutex<DomainRecord>,
    fail_find_zone: bool,
    /// Call counter for find_zone()
    find_zone_calls: Arc<AtomicUsize>,
    /// Call counter for find_record()
    find_record_calls: Arc<AtomicUsize>,
    /// Call counter for update_record()
    update_calls: Arc<AtomicUsize>,
    /// Contents passed to update calls
    updated_contents: Arc<std::sync::Mutex<Vec<String>>>,
}

impl ScriptedRecordApi {
    pub fn new(zone: Zone, record: DomainRecord) -> Self {
        Self {
            zone,
            record: std::sync::Mutex::new(record),
            fail_find_zone: false,
            find_zone_calls: Arc::new(AtomicUsize::new(0)),
            find_record_calls: Arc::new(AtomicUsize::new(0)),
            update_calls: Arc::new(AtomicUsize::new(0)),
            updated_contents: Arc::new(std::sync::Mutex::new(Vec::new())),
        }
    }

    /// Make every find_zone call fail with NotFound
    pub fn failing_find_zone(mut self) -> Self {
        self.fail_find_zone = true;
        self
    }

    /// Get the number of times find_zone() was called
    pub fn find_zone_call_count(&self) -> usize {
        self.find_zone_calls.load(Ordering::SeqCst)
    }

    /// Get the number of times find_record() was called
    pub fn find_record_call_count(&self) -> usize {
        self.find_record_calls.load(Ordering::SeqCst)
    }

    /// Get the number of times update_record() was called
    pub fn update_call_count(&self) -> usize {
        self.update_calls.load(Ordering::SeqCst)
    }

    /// Get the contents that update calls wrote
    pub fn updated_contents(&self) -> Vec<String> {
        self.updated_contents.lock().unwrap().clone()
    }

    /// Create a new ScriptedRecordApi that shares counters with an existing
    /// one, so tests can keep a probe after boxing the original into the
    /// engine
    pub fn sharing_counters_with(other: &Self) -> Self {
        Self {
            zone: other.zone.clone(),
            record: std::sync::Mutex::new(other.record.lock().unwrap().clone()),
            fail_find_zone: other.fail_find_zone,
            find_zone_calls: Arc::clone(&other.find_zone_calls),
            find_record_calls: Arc::clone(&other.find_record_calls),
            update_calls: Arc::clone(&other.update_calls),
            updated_contents: Arc::clone(&other.updated_contents),
        }
    }
}

#[async_trait::async_trait]
impl RecordApi for ScriptedRecordApi {
    async fn find_zone(&self, name: &str) -> Result<Zone> {
        self.find_zone_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_find_zone || name != self.zone.name {
            return Err(Error::not_found(format!("zone '{name}'")));
        }
        Ok(self.zone.clone())
    }

    async fn find_record(
        &self,
        _zone: &Zone,
        name: &str,
        record_type: RecordType,
    ) -> Result<DomainRecord> {
        self.find_record_calls.fetch_add(1, Ordering::SeqCst);
        let record = self.record.lock().unwrap().clone();
        if name != record.name || record_type != record.record_type {
            return Err(Error::not_found(format!("dns record '{name}'")));
        }
        Ok(record)
    }

    async fn update_record(&self, record: &DomainRecord, value: &str) -> Result<DomainRecord> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);
        self.updated_contents
            .lock()
            .unwrap()
            .push(value.to_string());

        let mut updated = record.clone();
        updated.content = value.to_string();
        updated.modified_on = Utc::now();
        *self.record.lock().unwrap() = updated.clone();
        Ok(updated)
    }

    async fn create_record(
        &self,
        _zone: &Zone,
        _name: &str,
        _record_type: RecordType,
        _value: &str,
        _ttl: u32,
    ) -> Result<DomainRecord> {
        unimplemented!("the tick workflow never creates records")
    }

    async fn delete_record(&self, _record: &DomainRecord) -> Result<()> {
        unimplemented!("the tick workflow never deletes records")
    }

    fn provider_name(&self) -> &'static str {
        "scripted"
    }
}

/// An IpSource returning a fixed, test-settable address
pub struct FixedIpSource {
    ip: Arc<std::sync::Mutex<IpAddr>>,
    /// Call counter for current()
    current_calls: Arc<AtomicUsize>,
}

impl FixedIpSource {
    pub fn new(ip: &str) -> Self {
        Self {
            ip: Arc::new(std::sync::Mutex::new(ip.parse().unwrap())),
            current_calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Change the IP returned by subsequent probes
    pub fn set_ip(&self, ip: &str) {
        *self.ip.lock().unwrap() = ip.parse().unwrap();
    }

    /// Get the number of times current() was called
    pub fn current_call_count(&self) -> usize {
        self.current_calls.load(Ordering::SeqCst)
    }

    /// Create a new FixedIpSource that shares state with an existing one
    pub fn sharing_state_with(other: &Self) -> Self {
        Self {
            ip: Arc::clone(&other.ip),
            current_calls: Arc::clone(&other.current_calls),
        }
    }
}

#[async_trait::async_trait]
impl IpSource for FixedIpSource {
    async fn current(&self) -> Result<IpAddr> {
        self.current_calls.fetch_add(1, Ordering::SeqCst);
        Ok(*self.ip.lock().unwrap())
    }
}
