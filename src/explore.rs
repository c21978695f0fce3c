//! Listing of every edge in a path graph.
//!
//! Unlike the linearizer this does not choose between egress options: every
//! successor is listed, and successors of a branching edge are flagged.

use std::collections::HashSet;

use serde::Serialize;

use crate::types::{DecodedEdge, EdgeId, Endpoint, PathGraph, COMPONENT_SEPARATOR};

/// One listed edge.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct EdgeListing {
    /// Edge id as found in the graph.
    pub edge: EdgeId,
    /// Edge rendered with display names.
    pub label: String,
    /// The edge is one of several egress options.
    pub multiple_egress: bool,
}

/// List the first edge and every successor, without duplicates.
pub fn enumerate_edges(graph: &PathGraph) -> Vec<EdgeListing> {
    let Some(first) = graph.first() else {
        return Vec::new();
    };

    let mut candidates: Vec<(&EdgeId, bool)> = vec![(&first.id, false)];
    for edge in graph.iter() {
        let multiple = edge.has_alternates();
        candidates.extend(edge.next_edge_ids.iter().map(|next| (next, multiple)));
    }

    let mut seen: HashSet<(String, bool)> = HashSet::new();
    candidates
        .into_iter()
        .filter_map(|(edge, multiple_egress)| {
            let label = display_label(&edge.decode());
            seen.insert((label.clone(), multiple_egress)).then(|| EdgeListing {
                edge: edge.clone(),
                label,
                multiple_egress,
            })
        })
        .collect()
}

/// Render an edge with hostnames in place of device tokens.
pub fn display_label(decoded: &DecodedEdge) -> String {
    let endpoint = |endpoint: &Endpoint| match &endpoint.interface {
        Some(iface) => format!("{}@{iface}", endpoint.token.display_name()),
        None => endpoint.token.display_name().to_string(),
    };

    let mut parts: Vec<String> = decoded.endpoints().map(endpoint).collect();
    parts.extend(decoded.suffix.clone());
    parts.join(COMPONENT_SEPARATOR)
}
