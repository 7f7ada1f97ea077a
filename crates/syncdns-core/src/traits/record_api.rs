// # Record API Trait
//
// Defines the interface onto a DNS provider's record-management API.
//
// Implementations are pure request/response mappers: one HTTP call per
// operation, success/failure classified from the provider's response
// envelope, errors propagated to the caller. No caching, no retries, no
// backoff — those concerns belong to the engine and its host.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{DomainRecord, RecordType, Zone};

/// TTL passed to `create_record` by default (provider-managed "automatic")
pub const DEFAULT_CREATE_TTL: u32 = 1;

/// Trait for a provider's record CRUD operations
///
/// All operations are network calls and all may fail. Implementations must
/// be thread-safe and usable across async tasks.
#[async_trait]
pub trait RecordApi: Send + Sync {
    /// Look up a zone by exact domain name
    ///
    /// Fails with [`Error::NotFound`](crate::Error::NotFound) when the
    /// provider reports an unsuccessful envelope or zero matching zones.
    /// If several zones match, the first in provider response order wins.
    async fn find_zone(&self, name: &str) -> Result<Zone>;

    /// Look up a record under `zone` by name and type
    ///
    /// The provider is queried by name only; the result set is filtered
    /// client-side to the first record whose type equals `record_type`.
    /// Fails with [`Error::NotFound`](crate::Error::NotFound) when the name
    /// query returns nothing, and also when results exist but none carry
    /// the requested type.
    async fn find_record(
        &self,
        zone: &Zone,
        name: &str,
        record_type: RecordType,
    ) -> Result<DomainRecord>;

    /// Replace a record's content with `value`
    ///
    /// The entire record object is round-tripped back to the provider (a
    /// full-record `PUT`, not a partial patch). Returns the provider's
    /// resulting record. Fails with
    /// [`Error::UpdateFailed`](crate::Error::UpdateFailed) on an
    /// unsuccessful envelope.
    async fn update_record(&self, record: &DomainRecord, value: &str) -> Result<DomainRecord>;

    /// Create a new, non-proxied address record
    ///
    /// Only `A` and `AAAA` types are accepted. Not invoked by the tick
    /// workflow, which only updates existing records. Fails with
    /// [`Error::CreateFailed`](crate::Error::CreateFailed) on an
    /// unsuccessful envelope.
    async fn create_record(
        &self,
        zone: &Zone,
        name: &str,
        record_type: RecordType,
        value: &str,
        ttl: u32,
    ) -> Result<DomainRecord>;

    /// Delete a record
    ///
    /// Not invoked by the tick workflow. Fails with
    /// [`Error::DeleteFailed`](crate::Error::DeleteFailed) on an
    /// unsuccessful envelope.
    async fn delete_record(&self, record: &DomainRecord) -> Result<()>;

    /// Provider name for logging/debugging (e.g. "cloudflare")
    fn provider_name(&self) -> &'static str;
}
