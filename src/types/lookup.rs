//! Input boundary: a complete path lookup result.
//!
//! The document is validated once here. Required keys that are missing fail
//! with the dotted key path; everything below that point is typed.

use std::io::Read;

use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;
use tracing::warn;

use super::decision::DecisionTable;
use super::graph::{NodeTable, PathGraph};
use super::summary::EventsSummary;

/// Dotted path of the edge map.
pub const EDGES_KEY: &str = "graphResult.graphData.edges";

/// Dotted path of the decision table.
pub const DECISIONS_KEY: &str = "pathlookup.decisions";

/// Error type for input parsing.
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    /// The document is not valid JSON for the expected shape.
    #[error("Malformed path lookup document: {0}")]
    Json(#[from] serde_json::Error),
    /// A required key is absent.
    #[error("Missing required key: {0}")]
    MissingKey(&'static str),
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDocument {
    #[serde(default)]
    graph_result: Option<RawGraphResult>,
    #[serde(default)]
    pathlookup: Option<RawPathlookup>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawGraphResult {
    #[serde(default)]
    graph_data: Option<RawGraphData>,
}

#[derive(Debug, Default, Deserialize)]
struct RawGraphData {
    #[serde(default)]
    edges: Option<PathGraph>,
    #[serde(default)]
    nodes: Option<NodeTable>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPathlookup {
    #[serde(default)]
    decisions: Option<DecisionTable>,
    #[serde(default)]
    events_summary: Option<Box<RawValue>>,
}

/// Typed path lookup result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PathLookupResult {
    /// Edge map in document order.
    pub edges: PathGraph,
    /// Device id → node metadata.
    pub nodes: NodeTable,
    /// Device id → decision traces.
    pub decisions: DecisionTable,
    /// Topic/global counters.
    pub events_summary: EventsSummary,
}

impl PathLookupResult {
    /// Assemble from parts.
    pub fn new(edges: PathGraph, decisions: DecisionTable) -> Self {
        Self {
            edges,
            decisions,
            ..Self::default()
        }
    }

    /// Attach node metadata.
    pub fn with_nodes(mut self, nodes: NodeTable) -> Self {
        self.nodes = nodes;
        self
    }

    /// Attach event counters.
    pub fn with_events_summary(mut self, events_summary: EventsSummary) -> Self {
        self.events_summary = events_summary;
        self
    }

    /// Parse a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self, InputError> {
        Self::from_raw(serde_json::from_str(json)?)
    }

    /// Parse JSON bytes.
    pub fn from_json_slice(bytes: &[u8]) -> Result<Self, InputError> {
        Self::from_raw(serde_json::from_slice(bytes)?)
    }

    /// Parse JSON from a reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, InputError> {
        Self::from_raw(serde_json::from_reader(reader)?)
    }

    fn from_raw(raw: RawDocument) -> Result<Self, InputError> {
        let graph_data = raw.graph_result.and_then(|g| g.graph_data);
        let (edges, nodes) = match graph_data {
            Some(RawGraphData { edges: Some(edges), nodes }) => (edges, nodes.unwrap_or_default()),
            _ => return Err(InputError::MissingKey(EDGES_KEY)),
        };
        let (decisions, events_summary) = match raw.pathlookup {
            Some(RawPathlookup {
                decisions: Some(decisions),
                events_summary,
            }) => (decisions, events_summary.map(parse_events_summary).unwrap_or_default()),
            _ => return Err(InputError::MissingKey(DECISIONS_KEY)),
        };
        Ok(Self {
            edges,
            nodes,
            decisions,
            events_summary,
        })
    }

    /// Whether the service found any path.
    pub fn has_edges(&self) -> bool {
        !self.edges.is_empty()
    }
}

/// The summary is informational; a malformed one is dropped, not fatal.
fn parse_events_summary(raw: Box<RawValue>) -> EventsSummary {
    serde_json::from_str(raw.get()).unwrap_or_else(|error| {
        warn!(%error, "ignoring malformed events summary");
        EventsSummary::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_document() {
        let result = PathLookupResult::from_json_str(
            r#"{"graphResult": {"graphData": {"edges": {}, "nodes": {}}},
                "pathlookup": {"decisions": {}}}"#,
        )
        .unwrap();
        assert!(!result.has_edges());
        assert!(result.events_summary.topics.is_empty());
    }

    #[test]
    fn test_missing_edges_fails_fast() {
        let err = PathLookupResult::from_json_str(r#"{"pathlookup": {"decisions": {}}}"#).unwrap_err();
        assert!(matches!(err, InputError::MissingKey(EDGES_KEY)));
        assert!(err.to_string().contains("graphResult.graphData.edges"));
    }

    #[test]
    fn test_missing_decisions_fails_fast() {
        let err = PathLookupResult::from_json_str(
            r#"{"graphResult": {"graphData": {"edges": {}}}, "pathlookup": {}}"#,
        )
        .unwrap_err();
        assert!(matches!(err, InputError::MissingKey(DECISIONS_KEY)));
    }

    #[test]
    fn test_invalid_json() {
        let err = PathLookupResult::from_json_str("{not json").unwrap_err();
        assert!(matches!(err, InputError::Json(_)));
    }

    const ONE_EDGE: &str = r#""graphResult": {"graphData": {"edges": {
        "D1!r1@eth0--accepted--#0": {"id": "D1!r1@eth0--accepted--#0", "nextEdgeIds": []}}}}"#;

    fn with_summary(summary: &str) -> PathLookupResult {
        PathLookupResult::from_json_str(&format!(
            r#"{{{ONE_EDGE}, "pathlookup": {{"decisions": {{}}, "eventsSummary": {summary}}}}}"#
        ))
        .unwrap()
    }

    #[test]
    fn test_malformed_summary_keeps_edges() {
        let result = with_summary(r#"{"topics": {"ACL": {"30": "many"}}}"#);
        assert!(result.has_edges());
        assert_eq!(result.events_summary, EventsSummary::default());

        let result = with_summary(r#"["not", "an", "object"]"#);
        assert!(result.has_edges());
        assert!(result.events_summary.global.is_empty());
    }

    #[test]
    fn test_summary_entry_without_severity_is_kept() {
        let result = with_summary(
            r#"{"topics": {"ZBF": {"0": 1}, "ACL": {"30": 2}},
                "global": [{"name": "mtu"}, {"name": "ttl", "severity": 25.0}]}"#,
        );
        assert!(result.has_edges());
        let topics: Vec<&str> = result.events_summary.topics.iter().map(|(topic, _)| topic.as_str()).collect();
        assert_eq!(topics, ["ZBF", "ACL"]);
        assert_eq!(result.events_summary.global.len(), 2);
        assert_eq!(result.events_summary.global[0].severity.symbol(), "❓");
        assert_eq!(result.events_summary.global[1].severity.symbol(), "❓");

        let result = with_summary("null");
        assert_eq!(result.events_summary, EventsSummary::default());
    }
}
