//! Event summary counters attached to a lookup result.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::decision::Severity;
use super::ordered::OrderedMap;

/// Per-topic counters keyed by severity code (`"0"`, `"10"`, ...).
pub type TopicCounters = BTreeMap<String, u64>;

/// A path-wide finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalEvent {
    /// Finding name.
    #[serde(default)]
    pub name: String,
    /// Free-form details.
    #[serde(default)]
    pub details: Vec<String>,
    /// Severity code, unknown when absent.
    #[serde(default)]
    pub severity: Severity,
}

/// `pathlookup.eventsSummary`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventsSummary {
    /// Topic counters in document order.
    #[serde(default)]
    pub topics: OrderedMap<String, TopicCounters>,
    /// Path-wide findings.
    #[serde(default)]
    pub global: Vec<GlobalEvent>,
}
