//! Configuration types for the reconcile engine

use serde::{Deserialize, Serialize};

use crate::types::{CacheKeySpec, RecordType};

/// Parameters for one managed record
///
/// The provider credential and the IP source URL do not live here: they
/// belong to the injected `RecordApi` and `IpSource` collaborators.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconcileConfig {
    /// Top-level domain to look the zone up by (e.g. "example.com")
    pub domain: String,

    /// Name of the managed record (e.g. "home.example.com")
    pub record_name: String,

    /// Type of the managed record
    pub record_type: RecordType,

    /// Optional cache key for resolved zone/record state
    ///
    /// When absent, every tick resolves via the provider.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_key: Option<CacheKeySpec>,
}

impl ReconcileConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.domain.is_empty() {
            return Err(crate::Error::config("domain cannot be empty"));
        }
        if self.record_name.is_empty() {
            return Err(crate::Error::config("record name cannot be empty"));
        }
        Ok(())
    }
}
