//! Trait seams for external collaborators
//!
//! The engine only talks to the provider and the IP source through these
//! traits; implementations live in their own crates.

pub mod ip_source;
pub mod record_api;

pub use ip_source::IpSource;
pub use record_api::{DEFAULT_CREATE_TTL, RecordApi};
