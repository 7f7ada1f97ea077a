// # IP Source Trait
//
// Defines the interface for discovering the caller's current public IP.
//
// The reconcile workflow performs exactly one probe per tick; there is no
// change monitoring and no retry at this layer. A transport failure
// propagates to the tick, which aborts and leaves the next tick to try
// again.

use std::net::IpAddr;

use async_trait::async_trait;

use crate::error::Result;

/// Trait for public IP discovery
#[async_trait]
pub trait IpSource: Send + Sync {
    /// Fetch the current public IP address
    async fn current(&self) -> Result<IpAddr>;
}
