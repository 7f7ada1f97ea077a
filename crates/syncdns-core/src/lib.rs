// # syncdns-core
//
// Core library for the syncdns record reconciler.
//
// ## Architecture Overview
//
// This library provides the core functionality for reconciling a single DNS
// record against the caller's current public IP:
// - **RecordApi**: Trait for a provider's record CRUD operations
// - **IpSource**: Trait for discovering the current public IP
// - **SharedCache**: Process-local named cache regions for resolved state
// - **ReconcileEngine**: One reconcile tick (resolve, compare, update, refresh)
// - **StatusReporter**: Read-only plain-text snapshot of the cached state
//
// ## Design Principles
//
// 1. **Separation of Concerns**: Core logic is separate from implementations
// 2. **Tick-Driven**: The host invokes one tick per timer fire; no scheduling
//    or retry logic lives in the core
// 3. **Explicit Dependencies**: Cache, provider client, and IP source are
//    injected at construction time
// 4. **Library-First**: All core functionality can be used as a library

pub mod cache;
pub mod config;
pub mod engine;
pub mod error;
pub mod status;
pub mod traits;
pub mod types;

// Re-export core types for convenience
pub use cache::{CacheRegion, SharedCache};
pub use config::ReconcileConfig;
pub use engine::{ReconcileEngine, TickOutcome};
pub use error::{Error, Result};
pub use status::{StatusReport, StatusReporter};
pub use traits::{IpSource, RecordApi};
pub use types::{CacheEntry, CacheKeySpec, DomainRecord, RecordType, Zone, ZoneStatus};
