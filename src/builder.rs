//! Hop graph builder.
//!
//! Turns a [`LinearPath`] into one [`HopRecord`] per device, annotated by the
//! [`DecisionCorrelator`], and projects the records into display rows.
//!
//! ## Record layout
//!
//! ```text
//! E1 = A@a0--B@b0   E2 = B@b1--C@c0   E3 = C@c1--accepted
//!
//! [A  -> a0] [b0 -> B -> b1] [c0 -> C -> c1, accepted]
//! ```
//!
//! The first record is the source of the first edge and has no ingress. Each
//! edge with a destination adds one record whose egress is taken from the
//! next edge. Edges without a destination only set the outcome of the last
//! record.

use tracing::{debug, warn};

use crate::correlator::DecisionCorrelator;
use crate::linearizer::LinearPath;
use crate::types::{
    device_id_hint, DecisionTable, DeviceToken, DisplayRow, EdgeId, HopRecord, Marker,
    ZoneInterfaceIndex,
};

/// A device position before correlation.
struct Slot<'p> {
    token: DeviceToken,
    ingress: Option<String>,
    egress: Option<String>,
    /// Edge the decisions are looked up against.
    via: &'p EdgeId,
    outcome: Option<Marker>,
}

impl Slot<'_> {
    fn device_id(&self) -> Option<String> {
        self.token
            .device_id()
            .map(str::to_string)
            .or_else(|| device_id_hint(self.token.raw()))
    }
}

/// Builds hop records from linear paths.
#[derive(Debug, Clone, Copy)]
pub struct HopGraphBuilder<'a> {
    correlator: DecisionCorrelator<'a>,
}

impl<'a> HopGraphBuilder<'a> {
    /// Builder over a decision table and optional zone data.
    pub fn new(decisions: &'a DecisionTable, zones: Option<&'a ZoneInterfaceIndex>) -> Self {
        Self::from_correlator(DecisionCorrelator::new(decisions, zones))
    }

    /// Builder around an existing correlator.
    pub fn from_correlator(correlator: DecisionCorrelator<'a>) -> Self {
        Self { correlator }
    }

    /// Get the correlator.
    pub fn correlator(&self) -> &DecisionCorrelator<'a> {
        &self.correlator
    }

    /// Build hop records for `path`. An empty path gives no records.
    pub fn build(&self, path: &LinearPath) -> Vec<HopRecord> {
        let slots = layout(path);
        debug!(edges = path.len(), hops = slots.len(), "built hop layout");

        slots
            .into_iter()
            .map(|slot| {
                let device_id = slot.device_id();
                let device_name = slot.token.display_name().to_string();
                let annotation = self.correlator.annotate(
                    device_id.as_deref(),
                    &device_name,
                    slot.via,
                    slot.egress.as_deref(),
                );
                HopRecord {
                    ingress_interface: slot.ingress,
                    device_name,
                    device_id,
                    egress_interface: slot.egress,
                    protocol: annotation.protocol,
                    security: annotation.security,
                    zone: annotation.zone,
                    outcome: slot.outcome,
                }
            })
            .collect()
    }
}

fn layout(path: &LinearPath) -> Vec<Slot<'_>> {
    let mut slots: Vec<Slot<'_>> = Vec::with_capacity(path.len() + 1);

    for edge_id in path {
        let decoded = edge_id.decode();
        let outcome = decoded.outcome();

        match slots.last_mut() {
            None => slots.push(Slot {
                token: decoded.source.token.clone(),
                ingress: None,
                egress: decoded.source.interface.clone(),
                via: edge_id,
                outcome: None,
            }),
            Some(last) => {
                if last.token.device_key() != decoded.source.token.device_key() {
                    warn!(
                        expected = last.token.device_key(),
                        found = decoded.source.token.device_key(),
                        edge = %edge_id,
                        "edge does not leave the previous device"
                    );
                }
                if last.egress.is_none() {
                    last.egress = decoded.source.interface.clone();
                }
            }
        }

        match decoded.destination {
            Some(destination) => slots.push(Slot {
                token: destination.token,
                ingress: destination.interface,
                egress: None,
                via: edge_id,
                outcome: None,
            }),
            None => {
                if let Some(last) = slots.last_mut() {
                    last.outcome = outcome;
                }
            }
        }
    }

    slots
}

/// Project hop records into display rows.
///
/// With `collapse_l2`, each contiguous run of interior collapsible hops is
/// replaced by a single [`DisplayRow::Collapsed`]. The first and last hops are
/// always kept.
pub fn filter_for_display(hops: &[HopRecord], collapse_l2: bool) -> Vec<DisplayRow> {
    let last = hops.len().saturating_sub(1);
    let mut rows: Vec<DisplayRow> = Vec::with_capacity(hops.len());

    for (i, hop) in hops.iter().enumerate() {
        let interior = i != 0 && i != last;
        if collapse_l2 && interior && hop.is_collapsible() {
            match rows.last_mut() {
                Some(DisplayRow::Collapsed { skipped }) => *skipped += 1,
                _ => rows.push(DisplayRow::Collapsed { skipped: 1 }),
            }
        } else {
            rows.push(DisplayRow::Hop(hop.clone()));
        }
    }

    rows
}
