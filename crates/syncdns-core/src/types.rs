//! Domain types shared across the syncdns crates
//!
//! These mirror the provider's wire representation of zones and DNS records.
//! The core treats `Zone` as read-only; only `DomainRecord::content` changes
//! through this system.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Activation status of a provider zone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZoneStatus {
    /// Zone is live and serving
    Active,
    /// Zone is disabled at the provider
    Disabled,
}

/// A provider-managed top-level domain container
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Zone {
    /// Opaque provider identifier
    pub id: String,
    /// Domain name (e.g. "example.com")
    pub name: String,
    /// Activation status
    pub status: ZoneStatus,
    /// Whether the zone is paused at the provider
    pub paused: bool,
    /// Plan tier metadata, free-form
    #[serde(default)]
    pub plan: HashMap<String, serde_json::Value>,
}

/// DNS record type
///
/// The fixed enumeration this system understands. Only `A` and `AAAA`
/// records are ever created by the reconcile workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecordType {
    A,
    #[serde(rename = "AAAA")]
    Aaaa,
    #[serde(rename = "CNAME")]
    Cname,
    #[serde(rename = "MX")]
    Mx,
    #[serde(rename = "NS")]
    Ns,
    #[serde(rename = "SRV")]
    Srv,
    #[serde(rename = "TXT")]
    Txt,
}

impl RecordType {
    /// The wire name used in provider payloads and query strings
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordType::A => "A",
            RecordType::Aaaa => "AAAA",
            RecordType::Cname => "CNAME",
            RecordType::Mx => "MX",
            RecordType::Ns => "NS",
            RecordType::Srv => "SRV",
            RecordType::Txt => "TXT",
        }
    }

    /// Whether this type carries an IP address as its content
    pub fn is_address(&self) -> bool {
        matches!(self, RecordType::A | RecordType::Aaaa)
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "A" => Ok(RecordType::A),
            "AAAA" => Ok(RecordType::Aaaa),
            "CNAME" => Ok(RecordType::Cname),
            "MX" => Ok(RecordType::Mx),
            "NS" => Ok(RecordType::Ns),
            "SRV" => Ok(RecordType::Srv),
            "TXT" => Ok(RecordType::Txt),
            other => Err(Error::config(format!("unknown record type '{other}'"))),
        }
    }
}

/// A single DNS resource record within a zone
///
/// `id` and the zone linkage are stable once created; `content` (and the
/// provider-side `modified_on`) change on update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainRecord {
    /// Opaque provider identifier
    pub id: String,
    /// Identifier of the owning zone
    pub zone_id: String,
    /// Name of the owning zone
    pub zone_name: String,
    /// Record name (provider returns the fully qualified form)
    pub name: String,
    /// Record type
    #[serde(rename = "type")]
    pub record_type: RecordType,
    /// Record value; the IP address text for A/AAAA records
    pub content: String,
    /// Time-to-live in seconds (1 = provider-managed "automatic")
    pub ttl: u32,
    /// Whether the record could be proxied
    #[serde(default)]
    pub proxiable: bool,
    /// Whether the record is proxied
    #[serde(default)]
    pub proxied: bool,
    /// Free-form provider metadata
    #[serde(default)]
    pub meta: serde_json::Value,
    /// Optional descriptive comment
    #[serde(default)]
    pub comment: Option<String>,
    /// Provider tags
    #[serde(default)]
    pub tags: Vec<String>,
    /// Last modification timestamp at the provider
    pub modified_on: DateTime<Utc>,
}

/// The cached pairing of a resolved zone and record
///
/// Invariant: an entry present in the cache reflected provider truth at
/// write time. It may go stale when the provider content diverges;
/// staleness is resolved lazily by the next successful reconcile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    pub zone: Zone,
    pub record: DomainRecord,
}

impl CacheEntry {
    /// Serialize for storage in a string-valued cache region
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse an entry back out of a cache region value
    pub fn from_json(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }
}

/// A `(namespace, key)` pair identifying where resolved state is cached
///
/// Parsed from the configured `"<namespace>.<key>"` string. The namespace
/// must name a pre-registered cache region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheKeySpec {
    pub namespace: String,
    pub key: String,
}

impl FromStr for CacheKeySpec {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.split_once('.') {
            Some((namespace, key)) if !namespace.is_empty() && !key.is_empty() => Ok(Self {
                namespace: namespace.to_string(),
                key: key.to_string(),
            }),
            _ => Err(Error::config(format!(
                "invalid cache key spec '{s}', expected '<namespace>.<key>'"
            ))),
        }
    }
}

impl fmt::Display for CacheKeySpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.namespace, self.key)
    }
}

// Serializes as the "<namespace>.<key>" string form used on the
// configuration surface.
impl Serialize for CacheKeySpec {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for CacheKeySpec {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
