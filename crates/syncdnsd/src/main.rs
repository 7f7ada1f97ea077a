// # syncdnsd - DNS Record Reconcile Daemon
//
// Thin integration shell around syncdns-core:
// 1. Read configuration from environment variables
// 2. Initialize logging and the runtime
// 3. Wire up the provider client, IP source, cache and engine
// 4. Run the timer-driven reconcile loop (plus the optional status endpoint)
//
// All reconcile logic lives in syncdns-core; this binary only translates
// environment into components and schedules ticks.
//
// ## Configuration
//
// All configuration is done via environment variables:
//
// ### Provider
// - `SYNCDNS_API_TOKEN`: Cloudflare API token (required)
//
// ### Managed record
// - `SYNCDNS_DOMAIN`: Zone apex domain, e.g. example.com (required)
// - `SYNCDNS_RECORD_NAME`: Full record name, e.g. home.example.com (required)
// - `SYNCDNS_RECORD_TYPE`: Record type (default: A)
//
// ### IP source
// - `SYNCDNS_IP_URL`: Plain-text "what is my IP" endpoint (required)
//
// ### Cache
// - `SYNCDNS_CACHE_REGIONS`: Comma-separated cache region names to register.
//   Include the zone's own domain name so cache refreshes have somewhere
//   to land.
// - `SYNCDNS_CACHE_KEY`: Lookup key as `namespace.key`, split at the first
//   dot (optional; caching is disabled entirely when unset)
//
// ### Scheduling
// - `SYNCDNS_TICK_INTERVAL_SECS`: Seconds between reconcile ticks
//   (default: 300)
//
// ### Status endpoint
// - `SYNCDNS_STATUS_ADDR`: Listen address for GET /status, e.g.
//   127.0.0.1:8053 (optional; endpoint disabled when unset)
//
// ### Logging
// - `SYNCDNS_LOG_LEVEL`: trace, debug, info, warn, error (default: info)
//
// ## Example
//
// ```bash
// export SYNCDNS_API_TOKEN=your_cloudflare_api_token_here_1234567890
// export SYNCDNS_DOMAIN=example.com
// export SYNCDNS_RECORD_NAME=home.example.com
// export SYNCDNS_IP_URL=https://api.ipify.org
// export SYNCDNS_CACHE_REGIONS=syncdns,example.com
// export SYNCDNS_CACHE_KEY=syncdns.home
// export SYNCDNS_STATUS_ADDR=127.0.0.1:8053
//
// syncdnsd
// ```

use anyhow::Result;
use std::env;
use std::net::SocketAddr;
use std::process::ExitCode;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

use syncdns_core::{
    CacheKeySpec, ReconcileConfig, ReconcileEngine, RecordType, SharedCache, StatusReporter,
};
use syncdns_ip_http::HttpIpSource;
use syncdns_provider_cloudflare::CloudflareApi;

#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};

/// Exit codes for different termination scenarios
///
/// These codes follow systemd conventions:
/// - 0: Clean shutdown
/// - 1: Configuration or startup error
/// - 2: Runtime error (unexpected)
#[derive(Debug, Clone, Copy)]
enum SyncdnsExitCode {
    /// Clean shutdown (normal exit)
    CleanShutdown = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// Runtime error (unexpected failure)
    RuntimeError = 2,
}

impl From<SyncdnsExitCode> for ExitCode {
    fn from(code: SyncdnsExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Application configuration
struct Config {
    api_token: String,
    domain: String,
    record_name: String,
    record_type: String,
    ip_url: String,
    cache_regions: Vec<String>,
    cache_key: Option<String>,
    tick_interval_secs: u64,
    status_addr: Option<String>,
    log_level: String,
}

impl Config {
    /// Load configuration from environment variables
    fn from_env() -> Result<Self> {
        Ok(Self {
            api_token: env::var("SYNCDNS_API_TOKEN").unwrap_or_default(),
            domain: env::var("SYNCDNS_DOMAIN").unwrap_or_default(),
            record_name: env::var("SYNCDNS_RECORD_NAME").unwrap_or_default(),
            record_type: env::var("SYNCDNS_RECORD_TYPE").unwrap_or_else(|_| "A".to_string()),
            ip_url: env::var("SYNCDNS_IP_URL").unwrap_or_default(),
            cache_regions: env::var("SYNCDNS_CACHE_REGIONS")
                .unwrap_or_default()
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            cache_key: env::var("SYNCDNS_CACHE_KEY").ok().filter(|s| !s.is_empty()),
            tick_interval_secs: env::var("SYNCDNS_TICK_INTERVAL_SECS")
                .ok()
                .map(|s| s.parse().unwrap_or(300))
                .unwrap_or(300),
            status_addr: env::var("SYNCDNS_STATUS_ADDR")
                .ok()
                .filter(|s| !s.is_empty()),
            log_level: env::var("SYNCDNS_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        })
    }

    /// Validate the configuration
    ///
    /// Covers required field presence, value formats (API token, domain
    /// names, URL scheme), numeric ranges and the log level enumeration.
    fn validate(&self) -> Result<()> {
        if self.api_token.is_empty() {
            anyhow::bail!(
                "SYNCDNS_API_TOKEN is required. \
                Set it via: export SYNCDNS_API_TOKEN=your_token"
            );
        }

        // Cloudflare API tokens are typically 40 characters alphanumeric
        if self.api_token.len() < 20 {
            anyhow::bail!(
                "SYNCDNS_API_TOKEN appears too short ({} chars). \
                Cloudflare tokens are typically 40 characters. \
                Verify your token is correct.",
                self.api_token.len()
            );
        }

        // Check for obvious placeholder tokens (common mistake)
        let token_lower = self.api_token.to_lowercase();
        if token_lower.contains("your_token")
            || token_lower.contains("replace_me")
            || token_lower.contains("example")
            || token_lower == "token"
        {
            anyhow::bail!(
                "SYNCDNS_API_TOKEN appears to be a placeholder. \
                Use an actual API token from your DNS provider."
            );
        }

        if self.domain.is_empty() {
            anyhow::bail!(
                "SYNCDNS_DOMAIN is required. \
                Set it via: export SYNCDNS_DOMAIN=example.com"
            );
        }
        validate_domain_name(&self.domain)?;

        if self.record_name.is_empty() {
            anyhow::bail!(
                "SYNCDNS_RECORD_NAME is required. \
                Set it via: export SYNCDNS_RECORD_NAME=home.example.com"
            );
        }
        validate_domain_name(&self.record_name)?;

        if RecordType::from_str(&self.record_type).is_err() {
            anyhow::bail!(
                "SYNCDNS_RECORD_TYPE '{}' is not a supported record type",
                self.record_type
            );
        }

        if self.ip_url.is_empty() {
            anyhow::bail!(
                "SYNCDNS_IP_URL is required. \
                Set it via: export SYNCDNS_IP_URL=https://api.ipify.org"
            );
        }
        if !self.ip_url.starts_with("https://") && !self.ip_url.starts_with("http://") {
            anyhow::bail!(
                "SYNCDNS_IP_URL must use HTTP or HTTPS scheme. Got: {}",
                self.ip_url
            );
        }
        if self.ip_url.starts_with("http://") {
            eprintln!(
                "WARNING: SYNCDNS_IP_URL uses HTTP (not HTTPS). \
                      This is less secure. Consider using HTTPS."
            );
        }

        if let Some(ref key) = self.cache_key {
            let spec = CacheKeySpec::from_str(key)
                .map_err(|e| anyhow::anyhow!("SYNCDNS_CACHE_KEY is invalid: {}", e))?;
            if !self.cache_regions.contains(&spec.namespace) {
                anyhow::bail!(
                    "SYNCDNS_CACHE_KEY namespace '{}' is not listed in \
                    SYNCDNS_CACHE_REGIONS",
                    spec.namespace
                );
            }
        }

        if !(10..=86400).contains(&self.tick_interval_secs) {
            anyhow::bail!(
                "SYNCDNS_TICK_INTERVAL_SECS must be between 10 and 86400 seconds. Got: {}",
                self.tick_interval_secs
            );
        }

        if let Some(ref addr) = self.status_addr
            && addr.parse::<SocketAddr>().is_err()
        {
            anyhow::bail!(
                "SYNCDNS_STATUS_ADDR is not a valid socket address. Got: {}",
                addr
            );
        }

        match self.log_level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => anyhow::bail!(
                "SYNCDNS_LOG_LEVEL '{}' is not valid. \
                Valid levels: trace, debug, info, warn, error",
                self.log_level
            ),
        }

        Ok(())
    }
}

/// Validate that a string is a valid domain name
///
/// Basic DNS domain name validation per RFC 1035. Not comprehensive but
/// catches common errors.
fn validate_domain_name(domain: &str) -> Result<()> {
    if domain.is_empty() {
        anyhow::bail!("Domain name cannot be empty");
    }

    // Total length limit (RFC 1035: 253 chars max)
    if domain.len() > 253 {
        anyhow::bail!(
            "Domain name too long: {} chars (max 253). Got: {}",
            domain.len(),
            domain
        );
    }

    for label in domain.split('.') {
        if label.is_empty() {
            anyhow::bail!("Domain name has empty label: '{}'", domain);
        }

        if label.len() > 63 {
            anyhow::bail!(
                "Domain label too long: {} chars (max 63). Label: '{}'",
                label.len(),
                label
            );
        }

        if !label.chars().all(|c| c.is_alphanumeric() || c == '-') {
            anyhow::bail!(
                "Domain label contains invalid characters. Label: '{}'. \
                Valid: alphanumeric and hyphen only.",
                label
            );
        }

        if label.starts_with('-') || label.ends_with('-') {
            anyhow::bail!(
                "Domain label cannot start or end with hyphen. Label: '{}'",
                label
            );
        }
    }

    Ok(())
}

fn main() -> ExitCode {
    // Load configuration from environment
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return SyncdnsExitCode::ConfigError.into();
        }
    };

    // Validate configuration
    if let Err(e) = config.validate() {
        eprintln!("Configuration validation error: {}", e);
        return SyncdnsExitCode::ConfigError.into();
    }

    // Initialize tracing
    let log_level = match config.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder().with_max_level(log_level).finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return SyncdnsExitCode::ConfigError.into();
    }

    info!("Starting syncdnsd daemon");
    info!(
        "Managing record {} ({}) in zone {}",
        config.record_name, config.record_type, config.domain
    );

    // Enter tokio runtime
    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return SyncdnsExitCode::RuntimeError.into();
        }
    };

    let result = rt.block_on(async {
        if let Err(e) = run_daemon(config).await {
            error!("Daemon error: {}", e);
            SyncdnsExitCode::RuntimeError
        } else {
            SyncdnsExitCode::CleanShutdown
        }
    });

    result.into()
}

/// Run the daemon
async fn run_daemon(config: Config) -> Result<()> {
    // Cache regions must be registered up front; the core never creates
    // regions on its own.
    let cache = SharedCache::new(config.cache_regions.iter().cloned());
    for name in cache.region_names() {
        info!("Registered cache region: {}", name);
    }

    let cache_key = match &config.cache_key {
        // Already validated in Config::validate
        Some(raw) => Some(CacheKeySpec::from_str(raw).map_err(|e| anyhow::anyhow!("{}", e))?),
        None => None,
    };

    let api = CloudflareApi::new(config.api_token.clone())?;
    let ip_source = HttpIpSource::new(config.ip_url.clone())?;

    let reconcile_config = ReconcileConfig {
        domain: config.domain.clone(),
        record_name: config.record_name.clone(),
        record_type: RecordType::from_str(&config.record_type)
            .map_err(|e| anyhow::anyhow!("{}", e))?,
        cache_key: cache_key.clone(),
    };

    let engine = Arc::new(ReconcileEngine::new(
        Box::new(api),
        Box::new(ip_source),
        cache.clone(),
        reconcile_config,
    )?);

    // Optional status endpoint
    if let Some(addr) = &config.status_addr {
        let reporter = StatusReporter::new(cache.clone(), cache_key.clone());
        let addr: SocketAddr = addr.parse()?;
        tokio::spawn(serve_status(addr, reporter));
    }

    info!(
        "Reconcile loop starting (every {}s)",
        config.tick_interval_secs
    );

    let mut ticker = tokio::time::interval(Duration::from_secs(config.tick_interval_secs));

    #[cfg(unix)]
    let mut sigterm = signal(SignalKind::terminate())
        .map_err(|e| anyhow::anyhow!("Failed to setup SIGTERM handler: {}", e))?;
    #[cfg(unix)]
    let mut sigint = signal(SignalKind::interrupt())
        .map_err(|e| anyhow::anyhow!("Failed to setup SIGINT handler: {}", e))?;

    loop {
        #[cfg(unix)]
        let received = tokio::select! {
            _ = ticker.tick() => None,
            _ = sigterm.recv() => Some("SIGTERM"),
            _ = sigint.recv() => Some("SIGINT"),
        };

        #[cfg(not(unix))]
        let received = tokio::select! {
            _ = ticker.tick() => None,
            _ = tokio::signal::ctrl_c() => Some("SIGINT"),
        };

        match received {
            Some(sig) => {
                info!("Received shutdown signal: {}", sig);
                info!("Shutting down daemon");
                return Ok(());
            }
            None => {
                // A failed tick is logged and dropped; the next tick starts
                // from scratch.
                match engine.tick().await {
                    Ok(outcome) => info!("Tick complete: {:?}", outcome),
                    Err(e) => error!("Tick failed: {}", e),
                }
            }
        }
    }
}

/// Serve the plain-text status endpoint
async fn serve_status(addr: SocketAddr, reporter: StatusReporter) {
    use axum::Router;
    use axum::extract::State;
    use axum::http::StatusCode;
    use axum::routing::get;

    async fn status(State(reporter): State<StatusReporter>) -> (StatusCode, String) {
        let report = reporter.render().await;
        let status =
            StatusCode::from_u16(report.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, report.body)
    }

    let app = Router::new()
        .route("/status", get(status))
        .with_state(reporter);

    info!("Status endpoint listening on http://{}/status", addr);

    match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => {
            if let Err(e) = axum::serve(listener, app).await {
                error!("Status endpoint error: {}", e);
            }
        }
        Err(e) => error!("Failed to bind status endpoint on {}: {}", addr, e),
    }
}
