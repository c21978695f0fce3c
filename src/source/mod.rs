//! Path lookup sources.
//!
//! The path itself is computed by an external path-trace service. A source
//! delivers its result for a request, from a live call or a capture.

pub mod memory;

#[cfg(feature = "fs")]
pub mod file;

use async_trait::async_trait;

use crate::types::{LookupRequest, PathLookupResult, ZoneInterfaceIndex};

/// Trait for path lookup backends.
///
/// A lookup is a single request/response; retries belong to the caller.
#[async_trait]
pub trait PathLookupSource: Send + Sync {
    /// Error type for source operations.
    type Error: std::error::Error + Send + Sync;

    /// Run a unicast path lookup.
    async fn lookup(&self, request: &LookupRequest) -> Result<PathLookupResult, Self::Error>;

    /// Interface → zone assignments, if the source has any.
    async fn zone_interfaces(&self) -> Result<Option<ZoneInterfaceIndex>, Self::Error>;
}

pub use memory::{InMemorySource, InMemorySourceError};

#[cfg(feature = "fs")]
pub use file::{FileSource, FileSourceError};
