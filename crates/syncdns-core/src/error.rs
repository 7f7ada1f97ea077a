//! Error types for the syncdns system
//!
//! This module defines all error types used throughout the crate.

use thiserror::Error;

/// Result type alias for syncdns operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the syncdns system
///
/// Every error is constructed at the point of detection and propagated
/// unmodified up the call chain. There is no retry or recovery in the core;
/// the tick invocation boundary is the single top-level handler.
#[derive(Error, Debug)]
pub enum Error {
    /// Zone or record lookup yielded nothing
    #[error("not found: {0}")]
    NotFound(String),

    /// Provider rejected a record update
    #[error("update failed: {0}")]
    UpdateFailed(String),

    /// Provider rejected a record creation
    #[error("create failed: {0}")]
    CreateFailed(String),

    /// Provider rejected a record deletion
    #[error("delete failed: {0}")]
    DeleteFailed(String),

    /// Configuration errors (missing parameter, unregistered cache region)
    #[error("configuration error: {0}")]
    Config(String),

    /// Status read without a configured cache key
    #[error("no cache configured")]
    NoCacheConfigured,

    /// Status read found no cached entry
    #[error("cache miss: {0}")]
    CacheMiss(String),

    /// External IP discovery failed
    #[error("IP source error: {0}")]
    IpSource(String),

    /// HTTP transport or response decoding failure
    #[error("HTTP error: {0}")]
    Http(String),

    /// JSON serialization/deserialization errors (cache blobs)
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a "not found" error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create an update failure error
    pub fn update_failed(msg: impl Into<String>) -> Self {
        Self::UpdateFailed(msg.into())
    }

    /// Create a create failure error
    pub fn create_failed(msg: impl Into<String>) -> Self {
        Self::CreateFailed(msg.into())
    }

    /// Create a delete failure error
    pub fn delete_failed(msg: impl Into<String>) -> Self {
        Self::DeleteFailed(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a cache miss error
    pub fn cache_miss(msg: impl Into<String>) -> Self {
        Self::CacheMiss(msg.into())
    }

    /// Create an IP source error
    pub fn ip_source(msg: impl Into<String>) -> Self {
        Self::IpSource(msg.into())
    }

    /// Create an HTTP error
    pub fn http(msg: impl Into<String>) -> Self {
        Self::Http(msg.into())
    }
}
