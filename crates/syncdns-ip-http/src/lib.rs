// # HTTP IP Source
//
// `IpSource` implementation that asks a plain-text "what is my IP" HTTP
// endpoint (e.g. https://api.ipify.org or an nginx location returning
// `$remote_addr`).
//
// One GET per probe. The body is trimmed and parsed as an IP address;
// anything else is an error. No retries here, the reconcile tick owns the
// failure.

use std::net::IpAddr;
use std::time::Duration;

use async_trait::async_trait;
use syncdns_core::traits::IpSource;
use syncdns_core::{Error, Result};
use tracing::debug;

/// HTTP timeout for IP probes
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// IP source backed by a plain-text HTTP endpoint
#[derive(Debug)]
pub struct HttpIpSource {
    /// Endpoint URL returning the caller's IP as the response body
    url: String,

    /// HTTP client for probes
    client: reqwest::Client,
}

impl HttpIpSource {
    /// Create a source probing the given URL
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .map_err(|e| Error::http(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            url: url.into(),
            client,
        })
    }
}

#[async_trait]
impl IpSource for HttpIpSource {
    async fn current(&self) -> Result<IpAddr> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| Error::ip_source(format!("IP probe failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::ip_source(format!(
                "IP endpoint returned status {status}"
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::ip_source(format!("failed to read IP response: {e}")))?;

        let ip: IpAddr = body
            .trim()
            .parse()
            .map_err(|_| Error::ip_source(format!("not an IP address: {:?}", body.trim())))?;

        debug!(%ip, url = %self.url, "fetched current IP");
        Ok(ip)
    }
}
