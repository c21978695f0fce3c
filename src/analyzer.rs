//! End-to-end path analysis.
//!
//! Runs linearization, correlation and display projection over one lookup
//! result, and optionally drives the lookup itself through a
//! [`PathLookupSource`], including the pivot lookup.

use serde::Serialize;
use tracing::{debug, info};

use crate::builder::{filter_for_display, HopGraphBuilder};
use crate::fingerprint::PathFingerprint;
use crate::linearizer::{LinearPath, PathLinearizer};
use crate::pivot::seed_from_pivot;
use crate::policy::{FirstOption, SuccessorPolicy};
use crate::source::PathLookupSource;
use crate::summary::{summarize, SummaryReport};
use crate::types::{
    DisplayRow, HopRecord, LookupRequest, PathLookupResult, RequestError, ZoneInterfaceIndex,
};

/// Error type for analyzer operations.
#[derive(Debug, thiserror::Error)]
pub enum AnalyzerError {
    /// The request failed validation.
    #[error("Invalid request: {0}")]
    Request(#[from] RequestError),
    /// Source error.
    #[error("Source error: {0}")]
    Source(String),
    /// The hop records could not be serialized for fingerprinting.
    #[error("Fingerprint error: {0}")]
    Fingerprint(#[from] serde_json::Error),
}

impl AnalyzerError {
    /// Create a source error from any error type.
    pub fn from_source<E: std::error::Error>(e: E) -> Self {
        Self::Source(e.to_string())
    }
}

/// Analysis options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnalysisConfig {
    /// Collapse interior switching hops for display.
    pub collapse_l2: bool,
}

/// Result of analyzing one lookup.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathReport {
    /// Successor policy used by the linearizer.
    pub policy: String,
    /// Event summary digest.
    pub summary: SummaryReport,
    /// Linearized edge ids.
    pub path: LinearPath,
    /// One record per device.
    pub hops: Vec<HopRecord>,
    /// Display projection of `hops`.
    pub rows: Vec<DisplayRow>,
    /// Fingerprint of `hops`.
    pub fingerprint: PathFingerprint,
}

impl PathReport {
    /// Whether the service found a path.
    pub fn has_path(&self) -> bool {
        !self.path.is_empty()
    }
}

/// Path analysis pipeline.
#[derive(Debug, Clone, Default)]
pub struct PathAnalyzer<P = FirstOption> {
    linearizer: PathLinearizer<P>,
    config: AnalysisConfig,
}

impl PathAnalyzer<FirstOption> {
    /// Analyzer following the first option at every branch.
    pub fn new(config: AnalysisConfig) -> Self {
        Self::with_policy(FirstOption, config)
    }
}

impl<P: SuccessorPolicy> PathAnalyzer<P> {
    /// Analyzer with a custom successor policy.
    pub fn with_policy(policy: P, config: AnalysisConfig) -> Self {
        Self {
            linearizer: PathLinearizer::with_policy(policy),
            config,
        }
    }

    /// Get the config.
    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Analyze a lookup result.
    pub fn analyze(
        &self,
        result: &PathLookupResult,
        zones: Option<&ZoneInterfaceIndex>,
    ) -> Result<PathReport, AnalyzerError> {
        let path = self.linearizer.linearize(&result.edges);
        let hops = HopGraphBuilder::new(&result.decisions, zones).build(&path);
        let rows = filter_for_display(&hops, self.config.collapse_l2);
        let fingerprint = PathFingerprint::of(&hops)?;

        debug!(
            edges = path.len(),
            hops = hops.len(),
            rows = rows.len(),
            truncated = path.is_truncated(),
            fingerprint = %fingerprint,
            "analyzed path"
        );

        Ok(PathReport {
            policy: self.linearizer.policy().policy_id().to_string(),
            summary: summarize(&result.events_summary),
            path,
            hops,
            rows,
            fingerprint,
        })
    }

    /// Validate `request`, look it up and analyze the result.
    ///
    /// With a `pivot`, the request is first seeded from the pivot's entry
    /// point.
    pub async fn run<S>(
        &self,
        source: &S,
        request: &LookupRequest,
        pivot: Option<&str>,
    ) -> Result<PathReport, AnalyzerError>
    where
        S: PathLookupSource + ?Sized,
    {
        request.validate()?;

        let request = match pivot {
            Some(pivot) => seed_from_pivot(source, request, pivot)
                .await
                .map_err(AnalyzerError::from_source)?,
            None => request.clone(),
        };
        info!(
            source = %request.starting_point,
            destination = %request.destination_point,
            protocol = %request.protocol,
            "running path lookup"
        );

        let result = source.lookup(&request).await.map_err(AnalyzerError::from_source)?;
        let zones = source.zone_interfaces().await.map_err(AnalyzerError::from_source)?;
        self.analyze(&result, zones.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DecisionTable, Edge, EdgeId, PathGraph};

    #[test]
    fn test_empty_result_has_no_path() {
        let result = PathLookupResult::new(PathGraph::new(), DecisionTable::new());
        let report = PathAnalyzer::new(AnalysisConfig::default()).analyze(&result, None).unwrap();
        assert!(!report.has_path());
        assert!(report.hops.is_empty());
        assert_eq!(report.policy, "first_option");
    }

    #[test]
    fn test_single_terminal_edge_has_path() {
        let graph = PathGraph::from_edges(vec![Edge::terminal("D1!r1@eth0--accepted--#0")]);
        let result = PathLookupResult::new(graph, DecisionTable::new());
        let report = PathAnalyzer::new(AnalysisConfig::default()).analyze(&result, None).unwrap();
        assert!(report.has_path());
        assert_eq!(report.rows.len(), 1);
    }

    #[test]
    fn test_fingerprint_repeats() {
        let graph = PathGraph::from_edges(vec![
            Edge::new("D1!r1@eth0--D2!r2@eth1--#0", vec![EdgeId::from("D2!r2@eth2--accepted--#0")]),
            Edge::terminal("D2!r2@eth2--accepted--#0"),
        ]);
        let result = PathLookupResult::new(graph, DecisionTable::new());
        let analyzer = PathAnalyzer::new(AnalysisConfig { collapse_l2: true });
        let a = analyzer.analyze(&result, None).unwrap();
        let b = analyzer.analyze(&result, None).unwrap();
        assert_eq!(a.fingerprint, b.fingerprint);
        assert_eq!(a, b);
    }
}
