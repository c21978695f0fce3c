//! Device hostname resolution.
//!
//! Successor ids that end a trace (`...--dropped--#0`) are often emitted with a
//! bare device id because the service never materialized them as edges. The
//! hostname is recovered from other ids that name the same device.

use tracing::debug;

use crate::types::{decode_token, DecodedEdge, EdgeId, PathGraph};

/// Display name for a device token: embedded hostname, else the raw token.
pub fn resolve_hostname(token: &str) -> String {
    decode_token(token).display_name().to_string()
}

/// Where a missing hostname is looked for, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostnameSource {
    /// The predecessor edge id.
    Predecessor,
    /// Every edge id of the graph, in document order.
    Graph,
}

/// Strategy order used by [`DeviceResolver::infer_missing_hostname`].
pub const INFERENCE_ORDER: [HostnameSource; 2] = [HostnameSource::Predecessor, HostnameSource::Graph];

/// Resolves hostnames against one graph.
#[derive(Debug, Clone, Copy)]
pub struct DeviceResolver<'g> {
    graph: &'g PathGraph,
}

impl<'g> DeviceResolver<'g> {
    /// Create a resolver over `graph`.
    pub fn new(graph: &'g PathGraph) -> Self {
        Self { graph }
    }

    /// Fill in the hostname of an unresolved successor.
    ///
    /// Returns `successor` unchanged when it is already resolved or when no
    /// source in [`INFERENCE_ORDER`] knows the device.
    pub fn infer_missing_hostname(&self, predecessor: &EdgeId, successor: &EdgeId) -> EdgeId {
        let decoded = successor.decode();
        if decoded.source.token.is_resolved() {
            return successor.clone();
        }
        let device_id = decoded.source.token.device_key();
        if device_id.is_empty() {
            return successor.clone();
        }

        for source in INFERENCE_ORDER {
            let hostname = match source {
                HostnameSource::Predecessor => hostname_in(&predecessor.decode(), device_id),
                HostnameSource::Graph => self
                    .graph
                    .iter()
                    .find_map(|edge| hostname_in(&edge.id.decode(), device_id)),
            };
            if let Some(hostname) = hostname {
                debug!(device_id, hostname = %hostname, ?source, "inferred missing hostname");
                return decoded.with_hostname(device_id, &hostname).encode();
            }
        }

        debug!(device_id, successor = %successor, "hostname not recoverable");
        successor.clone()
    }
}

fn hostname_in(edge: &DecodedEdge, device_id: &str) -> Option<String> {
    edge.endpoints()
        .filter(|endpoint| endpoint.token.device_id() == Some(device_id))
        .find_map(|endpoint| endpoint.token.hostname())
        .map(str::to_string)
}
