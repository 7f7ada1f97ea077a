// # Cloudflare Record API Client
//
// `RecordApi` implementation over the Cloudflare API v4.
//
// This is a pure request/response mapper:
// - One HTTP request per operation, bearer-authenticated
// - Success/failure classified from the `{success, result, errors}`
//   response envelope at the decode boundary
// - Full error propagation to the caller; no retries, no backoff, no
//   caching (the engine and its cache own those concerns)
//
// ## API Reference
//
// - Cloudflare API v4: https://developers.cloudflare.com/api/
// - List Zones: GET `/zones?name=...`
// - List DNS Records: GET `/zones/:zone_id/dns_records?name=...`
// - Overwrite DNS Record: PUT `/zones/:zone_id/dns_records/:record_id`
// - Create DNS Record: POST `/zones/:zone_id/dns_records`
// - Delete DNS Record: DELETE `/zones/:zone_id/dns_records/:record_id`
//
// ## Security
//
// The API token never appears in logs; the Debug implementation redacts it.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use syncdns_core::traits::RecordApi;
use syncdns_core::types::{DomainRecord, RecordType, Zone};
use syncdns_core::{Error, Result};

/// Cloudflare API base URL
const CLOUDFLARE_API_BASE: &str = "https://api.cloudflare.com/client/v4";

/// HTTP timeout for API requests
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Comment attached to records created by this client
const CREATED_RECORD_COMMENT: &str = "Managed by syncdns";

/// Cloudflare's standard response envelope
///
/// Decoded strictly before any payload is trusted: `success` must be
/// present, and an unsuccessful envelope is turned into an explicit
/// failure reason at this boundary rather than leaking partial values.
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: serde::Deserialize<'de>"))]
struct Envelope<T> {
    success: bool,
    #[serde(default)]
    result: Option<T>,
    #[serde(default)]
    errors: Vec<serde_json::Value>,
}

impl<T> Envelope<T> {
    /// Convert the envelope into an explicit ok/err result
    fn into_result(self) -> std::result::Result<Option<T>, String> {
        if self.success {
            Ok(self.result)
        } else if self.errors.is_empty() {
            Err("provider reported success=false".to_string())
        } else {
            Err(format!("provider errors: {:?}", self.errors))
        }
    }
}

/// Cloudflare record API client
pub struct CloudflareApi {
    /// Cloudflare API token; never logged
    api_token: String,

    /// API base URL (overridable for tests)
    base_url: String,

    /// HTTP client for API requests
    client: reqwest::Client,
}

// Custom Debug implementation that hides the API token
impl std::fmt::Debug for CloudflareApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudflareApi")
            .field("api_token", &"<REDACTED>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl CloudflareApi {
    /// Create a new client
    ///
    /// Fails with a configuration error when the token is empty and with
    /// an HTTP error when the underlying client cannot be built.
    pub fn new(api_token: impl Into<String>) -> Result<Self> {
        let api_token = api_token.into();
        if api_token.is_empty() {
            return Err(Error::config("Cloudflare API token cannot be empty"));
        }

        let client = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .map_err(|e| Error::http(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            api_token,
            base_url: CLOUDFLARE_API_BASE.to_string(),
            client,
        })
    }

    /// Point the client at a different base URL (tests)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Build a bearer-authenticated request for an API path
    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}/{}", self.base_url, path);
        self.client
            .request(method, url)
            .bearer_auth(&self.api_token)
            .header("Content-Type", "application/json")
    }

    /// Send a request and decode the response envelope
    async fn send<T: DeserializeOwned>(
        &self,
        builder: reqwest::RequestBuilder,
    ) -> Result<Envelope<T>> {
        let response = builder
            .send()
            .await
            .map_err(|e| Error::http(format!("request failed: {e}")))?;

        response
            .json::<Envelope<T>>()
            .await
            .map_err(|e| Error::http(format!("failed to decode response envelope: {e}")))
    }
}

#[async_trait]
impl RecordApi for CloudflareApi {
    async fn find_zone(&self, name: &str) -> Result<Zone> {
        tracing::debug!(zone = name, "looking up zone");

        let envelope: Envelope<Vec<Zone>> = self
            .send(self.request(reqwest::Method::GET, &format!("zones?name={name}")))
            .await?;

        let zones = envelope
            .into_result()
            .map_err(|_| Error::not_found(format!("zone '{name}'")))?
            .unwrap_or_default();

        // Multiple matches: provider response order decides
        zones
            .into_iter()
            .next()
            .ok_or_else(|| Error::not_found(format!("zone '{name}'")))
    }

    async fn find_record(
        &self,
        zone: &Zone,
        name: &str,
        record_type: RecordType,
    ) -> Result<DomainRecord> {
        tracing::debug!(zone = %zone.name, record = name, %record_type, "looking up record");

        let envelope: Envelope<Vec<DomainRecord>> = self
            .send(self.request(
                reqwest::Method::GET,
                &format!("zones/{}/dns_records?name={}", zone.id, name),
            ))
            .await?;

        let records = envelope
            .into_result()
            .map_err(|_| Error::not_found(format!("dns record '{name}'")))?
            .unwrap_or_default();

        if records.is_empty() {
            return Err(Error::not_found(format!("dns record '{name}'")));
        }

        // The name query is type-agnostic; filter client-side. A name match
        // without a type match is still a lookup failure.
        records
            .into_iter()
            .find(|rr| rr.record_type == record_type)
            .ok_or_else(|| {
                Error::not_found(format!("dns record '{name}' with type {record_type}"))
            })
    }

    async fn update_record(&self, record: &DomainRecord, value: &str) -> Result<DomainRecord> {
        tracing::debug!(record = %record.name, content = value, "updating record");

        // Full-record replace: the whole object goes back, content swapped
        let mut body = record.clone();
        body.content = value.to_string();

        let envelope: Envelope<DomainRecord> = self
            .send(
                self.request(
                    reqwest::Method::PUT,
                    &format!("zones/{}/dns_records/{}", record.zone_id, record.id),
                )
                .json(&body),
            )
            .await?;

        envelope
            .into_result()
            .map_err(Error::update_failed)?
            .ok_or_else(|| Error::update_failed("provider returned no record"))
    }

    async fn create_record(
        &self,
        zone: &Zone,
        name: &str,
        record_type: RecordType,
        value: &str,
        ttl: u32,
    ) -> Result<DomainRecord> {
        if !record_type.is_address() {
            return Err(Error::config(format!(
                "create_record only supports A and AAAA, got {record_type}"
            )));
        }

        tracing::debug!(zone = %zone.name, record = name, %record_type, "creating record");

        let body = serde_json::json!({
            "type": record_type.as_str(),
            "name": name,
            "content": value,
            "ttl": ttl,
            "proxied": false,
            "comment": CREATED_RECORD_COMMENT,
        });

        let envelope: Envelope<DomainRecord> = self
            .send(
                self.request(
                    reqwest::Method::POST,
                    &format!("zones/{}/dns_records", zone.id),
                )
                .json(&body),
            )
            .await?;

        envelope
            .into_result()
            .map_err(Error::create_failed)?
            .ok_or_else(|| Error::create_failed("provider returned no record"))
    }

    async fn delete_record(&self, record: &DomainRecord) -> Result<()> {
        tracing::debug!(record = %record.name, "deleting record");

        let envelope: Envelope<serde_json::Value> = self
            .send(self.request(
                reqwest::Method::DELETE,
                &format!("zones/{}/dns_records/{}", record.zone_id, record.id),
            ))
            .await?;

        envelope.into_result().map_err(Error::delete_failed)?;
        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        "cloudflare"
    }
}
