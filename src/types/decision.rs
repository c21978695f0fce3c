//! Per-device decision traces.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::ident::EdgeId;

/// Code of a severity that is not an integer at all.
pub const UNKNOWN_SEVERITY_CODE: i64 = -1;

/// Ranked severity of a security decision.
///
/// The service uses the codes 0/10/20/30. Any other integer is kept as
/// [`Severity::Unknown`]; strings, floats, `null` and missing values become
/// `Unknown(UNKNOWN_SEVERITY_CODE)`. Deserialization never fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "i64")]
pub enum Severity {
    /// 0, green.
    Clear,
    /// 10, blue.
    Info,
    /// 20, amber.
    Warning,
    /// 30, red.
    Blocking,
    /// Any other code.
    Unknown(i64),
}

impl Severity {
    /// The four ranked levels, lowest first.
    pub const RANKED: [Severity; 4] = [Self::Clear, Self::Info, Self::Warning, Self::Blocking];

    /// Map a numeric code.
    pub fn from_code(code: i64) -> Self {
        match code {
            0 => Self::Clear,
            10 => Self::Info,
            20 => Self::Warning,
            30 => Self::Blocking,
            other => Self::Unknown(other),
        }
    }

    /// Numeric code.
    pub fn code(&self) -> i64 {
        match self {
            Self::Clear => 0,
            Self::Info => 10,
            Self::Warning => 20,
            Self::Blocking => 30,
            Self::Unknown(code) => *code,
        }
    }

    /// Display symbol.
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Clear => "✅",
            Self::Info => "🔵",
            Self::Warning => "🟠",
            Self::Blocking => "❌",
            Self::Unknown(_) => "❓",
        }
    }

    /// Colour name used in event summaries.
    pub fn colour(&self) -> &'static str {
        match self {
            Self::Clear => "Green",
            Self::Info => "Blue",
            Self::Warning => "Amber",
            Self::Blocking => "Red",
            Self::Unknown(_) => "Unknown",
        }
    }
}

impl Default for Severity {
    fn default() -> Self {
        Self::Unknown(UNKNOWN_SEVERITY_CODE)
    }
}

impl<'de> Deserialize<'de> for Severity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(value.as_i64().map(Self::from_code).unwrap_or_default())
    }
}

impl From<i64> for Severity {
    fn from(code: i64) -> Self {
        Self::from_code(code)
    }
}

impl From<Severity> for i64 {
    fn from(severity: Severity) -> Self {
        severity.code()
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Severity wrapper as it appears on events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityInfo {
    /// Severity code.
    #[serde(default)]
    pub severity: Severity,
}

/// A single decision event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    /// Event type, e.g. `security.acl`.
    #[serde(rename = "type", default)]
    pub event_type: String,
    /// Protocol header the event inspected.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header_type: Option<String>,
    /// Policy that decided the packet's fate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deciding_policy_name: Option<String>,
    /// Severity, for security events.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity_info: Option<SeverityInfo>,
}

/// One processing chain on a device.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceStep {
    /// Chain name, e.g. `switching-nexthop`.
    #[serde(default)]
    pub chain: String,
    /// Events in processing order.
    #[serde(default)]
    pub events: Vec<Event>,
}

/// A packet's passage through a device.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TraceRecord {
    /// Edge the packet arrived on.
    #[serde(default)]
    pub source_packet_id: Option<EdgeId>,
    /// Edge the packet left on.
    #[serde(default)]
    pub target_packet_id: Option<EdgeId>,
    /// Processing steps.
    #[serde(default)]
    pub trace: Vec<TraceStep>,
}

/// Traces recorded for one device.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceDecisions {
    /// Traces in document order.
    #[serde(default)]
    pub traces: Vec<TraceRecord>,
}

/// Device id → decisions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DecisionTable(HashMap<String, DeviceDecisions>);

impl DecisionTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register decisions for a device.
    pub fn insert(&mut self, device_id: impl Into<String>, decisions: DeviceDecisions) {
        self.0.insert(device_id.into(), decisions);
    }

    /// Decisions of a device.
    pub fn get(&self, device_id: &str) -> Option<&DeviceDecisions> {
        self.0.get(device_id)
    }

    /// Number of devices.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no device has decisions.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, DeviceDecisions)> for DecisionTable {
    fn from_iter<I: IntoIterator<Item = (String, DeviceDecisions)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
