//! In-memory lookup source for testing.

use std::collections::BTreeMap;

use async_trait::async_trait;

use super::PathLookupSource;
use crate::types::{LookupRequest, PathLookupResult, ZoneInterfaceIndex};

/// Error type for in-memory source.
#[derive(Debug, Clone, thiserror::Error)]
pub enum InMemorySourceError {
    /// No result registered for the flow.
    #[error("No lookup result for {starting_point} -> {destination_point}")]
    NotFound {
        /// Requested source.
        starting_point: String,
        /// Requested destination.
        destination_point: String,
    },
}

/// Canned results keyed by (starting point, destination point).
///
/// Uses BTreeMap for deterministic iteration order.
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    results: BTreeMap<(String, String), PathLookupResult>,
    zones: Option<ZoneInterfaceIndex>,
}

impl InMemorySource {
    /// Create a new empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the result for a flow.
    pub fn add_result(
        &mut self,
        starting_point: impl Into<String>,
        destination_point: impl Into<String>,
        result: PathLookupResult,
    ) {
        self.results
            .insert((starting_point.into(), destination_point.into()), result);
    }

    /// Attach zone data.
    pub fn with_zones(mut self, zones: ZoneInterfaceIndex) -> Self {
        self.zones = Some(zones);
        self
    }

    /// Number of registered flows.
    pub fn num_results(&self) -> usize {
        self.results.len()
    }
}

#[async_trait]
impl PathLookupSource for InMemorySource {
    type Error = InMemorySourceError;

    async fn lookup(&self, request: &LookupRequest) -> Result<PathLookupResult, Self::Error> {
        let key = (
            request.starting_point.clone(),
            request.destination_point.clone(),
        );
        self.results
            .get(&key)
            .cloned()
            .ok_or_else(|| InMemorySourceError::NotFound {
                starting_point: key.0,
                destination_point: key.1,
            })
    }

    async fn zone_interfaces(&self) -> Result<Option<ZoneInterfaceIndex>, Self::Error> {
        Ok(self.zones.clone())
    }
}
