//! Decision correlation.
//!
//! Attaches protocol and security metadata to a hop by finding the traces the
//! device recorded for the edge that carried the packet.
//!
//! ## Lookup order
//!
//! A hop may be recorded from either side of an edge, so traces are matched by
//! [`TraceMatch::SourcePacket`] first and [`TraceMatch::TargetPacket`] second.
//! The first strategy that matches at least one trace wins; all of its matches
//! contribute, in document order.

use tracing::trace;

use crate::types::{
    DecisionTable, EdgeId, Protocol, SecurityVerdict, Severity, TraceRecord, TraceStep,
    ZoneInterfaceIndex,
};

/// Chain name of pure layer-2 forwarding.
pub const SWITCHING_CHAIN: &str = "switching-nexthop";

/// Substring identifying security events.
pub const SECURITY_EVENT_MARKER: &str = "security";

/// Policy label when a security event names none.
const UNNAMED_POLICY: &str = "n/a";

/// How a trace record is matched to an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceMatch {
    /// The packet entered the device on the edge.
    SourcePacket,
    /// The packet left the device on the edge.
    TargetPacket,
}

impl TraceMatch {
    fn matches(&self, record: &TraceRecord, edge: &EdgeId) -> bool {
        let packet = match self {
            Self::SourcePacket => record.source_packet_id.as_ref(),
            Self::TargetPacket => record.target_packet_id.as_ref(),
        };
        packet == Some(edge)
    }
}

/// Strategy order used by [`DecisionCorrelator::lookup`].
pub const MATCH_ORDER: [TraceMatch; 2] = [TraceMatch::SourcePacket, TraceMatch::TargetPacket];

/// Metadata attached to one hop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HopAnnotation {
    /// Protocol classification.
    pub protocol: Protocol,
    /// Security decision with zone.
    pub security: Option<SecurityVerdict>,
    /// Zone of the egress interface.
    pub zone: Option<String>,
}

impl Default for HopAnnotation {
    fn default() -> Self {
        Self {
            protocol: Protocol::NotAvailable,
            security: None,
            zone: None,
        }
    }
}

/// Correlates hops with the decision table.
#[derive(Debug, Clone, Copy)]
pub struct DecisionCorrelator<'a> {
    decisions: &'a DecisionTable,
    zones: Option<&'a ZoneInterfaceIndex>,
}

impl<'a> DecisionCorrelator<'a> {
    /// Create a correlator. `zones` may be absent.
    pub fn new(decisions: &'a DecisionTable, zones: Option<&'a ZoneInterfaceIndex>) -> Self {
        Self { decisions, zones }
    }

    /// Trace steps recorded by `device_id` for `edge`.
    ///
    /// Empty when the device has no entry or nothing matches.
    pub fn lookup(&self, device_id: &str, edge: &EdgeId) -> Vec<&'a TraceStep> {
        let Some(device) = self.decisions.get(device_id) else {
            trace!(device_id, "no decisions for device");
            return Vec::new();
        };

        for strategy in MATCH_ORDER {
            let matched: Vec<&'a TraceRecord> = device
                .traces
                .iter()
                .filter(|record| strategy.matches(record, edge))
                .collect();
            if !matched.is_empty() {
                trace!(device_id, edge = %edge, ?strategy, traces = matched.len(), "matched traces");
                return matched.into_iter().flat_map(|record| record.trace.iter()).collect();
            }
        }

        trace!(device_id, edge = %edge, "no trace for edge");
        Vec::new()
    }

    /// Zone label of `interface` on `device_name`.
    pub fn zone_for(&self, device_name: &str, interface: Option<&str>) -> Option<String> {
        self.zones?.lookup(device_name, interface?)
    }

    /// Full annotation for one hop.
    ///
    /// Without a device id the hop is annotated `n/a`, with the zone still
    /// resolved from the egress interface.
    pub fn annotate(
        &self,
        device_id: Option<&str>,
        device_name: &str,
        edge: &EdgeId,
        egress: Option<&str>,
    ) -> HopAnnotation {
        let zone = self.zone_for(device_name, egress);
        let Some(device_id) = device_id else {
            return HopAnnotation {
                zone,
                ..HopAnnotation::default()
            };
        };

        let steps = self.lookup(device_id, edge);
        let security = extract_security(&steps).map(|verdict| SecurityVerdict {
            zone: zone.clone(),
            ..verdict
        });
        HopAnnotation {
            protocol: classify_protocol(&steps),
            security,
            zone,
        }
    }
}

/// Classify the protocol of a hop.
///
/// A `switching-nexthop` chain anywhere means `l2`. Otherwise the first entry
/// of [`Protocol::HEADER_PRIORITY`] seen in any event wins; `n/a` if none.
pub fn classify_protocol(steps: &[&TraceStep]) -> Protocol {
    if steps.iter().any(|step| step.chain == SWITCHING_CHAIN) {
        return Protocol::L2;
    }

    let header_types: Vec<&str> = steps
        .iter()
        .flat_map(|step| step.events.iter())
        .filter_map(|event| event.header_type.as_deref())
        .collect();

    Protocol::HEADER_PRIORITY
        .into_iter()
        .find(|protocol| header_types.contains(&protocol.as_str()))
        .unwrap_or(Protocol::NotAvailable)
}

/// First security decision in document order, without zone.
pub fn extract_security(steps: &[&TraceStep]) -> Option<SecurityVerdict> {
    let event = steps
        .iter()
        .flat_map(|step| step.events.iter())
        .find(|event| event.event_type.contains(SECURITY_EVENT_MARKER))?;

    Some(SecurityVerdict {
        severity: event
            .severity_info
            .map(|info| info.severity)
            .unwrap_or_default(),
        policy: event
            .deciding_policy_name
            .clone()
            .unwrap_or_else(|| UNNAMED_POLICY.to_string()),
        zone: None,
    })
}
