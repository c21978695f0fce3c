//! Deterministic path linearizer.
//!
//! Walks the branching edge graph from its first edge down to a single
//! ordered sequence of edge ids.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::policy::{FirstOption, SuccessorPolicy};
use crate::resolver::DeviceResolver;
use crate::types::{EdgeId, PathGraph};

/// Ordered edge ids of one path.
///
/// An empty path means the graph had no edges ("no path available"), which
/// is distinct from a one-edge path that ends immediately.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LinearPath {
    edges: Vec<EdgeId>,
    /// The walk stopped on an edge already on the path.
    #[serde(default)]
    truncated: bool,
}

impl LinearPath {
    /// Path from explicit edge ids.
    pub fn new(edges: Vec<EdgeId>) -> Self {
        Self {
            edges,
            truncated: false,
        }
    }

    /// Edge ids in traversal order.
    pub fn as_slice(&self) -> &[EdgeId] {
        &self.edges
    }

    /// Iterate edge ids.
    pub fn iter(&self) -> impl Iterator<Item = &EdgeId> {
        self.edges.iter()
    }

    /// Number of edge ids.
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// Whether there is no path.
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Whether the cycle guard ended the walk.
    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    /// Consume into edge ids.
    pub fn into_vec(self) -> Vec<EdgeId> {
        self.edges
    }
}

impl<'a> IntoIterator for &'a LinearPath {
    type Item = &'a EdgeId;
    type IntoIter = std::slice::Iter<'a, EdgeId>;

    fn into_iter(self) -> Self::IntoIter {
        self.edges.iter()
    }
}

/// Single-pass linearizer parameterized by a successor policy.
///
/// ## Algorithm
///
/// 1. Start at the first edge of the graph (document order)
/// 2. Append the current edge id
/// 3. Ask the policy for a successor; none ends the path
/// 4. A successor that is a graph key becomes the current edge
/// 5. Any other successor is a terminal token: its hostname is inferred,
///    it is appended, and the path ends
///
/// An edge id seen twice ends the walk and marks the path truncated.
#[derive(Debug, Clone, Default)]
pub struct PathLinearizer<P = FirstOption> {
    policy: P,
}

impl PathLinearizer<FirstOption> {
    /// Linearizer following the first option at every branch.
    pub fn new() -> Self {
        Self::with_policy(FirstOption)
    }
}

impl<P: SuccessorPolicy> PathLinearizer<P> {
    /// Linearizer with a custom successor policy.
    pub fn with_policy(policy: P) -> Self {
        Self { policy }
    }

    /// Get the policy.
    pub fn policy(&self) -> &P {
        &self.policy
    }

    /// Linearize `graph`.
    pub fn linearize(&self, graph: &PathGraph) -> LinearPath {
        let Some(mut current) = graph.first() else {
            debug!("empty edge graph, no path");
            return LinearPath::default();
        };

        let resolver = DeviceResolver::new(graph);
        let mut edges: Vec<EdgeId> = Vec::new();
        let mut visited: HashSet<&EdgeId> = HashSet::new();
        let mut truncated = false;

        loop {
            if !visited.insert(&current.id) {
                warn!(edge = %current.id, "cycle in edge graph, truncating path");
                truncated = true;
                break;
            }
            edges.push(current.id.clone());

            let Some(next_id) = self.policy.select(current) else {
                break;
            };
            if current.has_alternates() {
                debug!(
                    edge = %current.id,
                    options = current.next_edge_ids.len(),
                    chosen = %next_id,
                    policy = self.policy.policy_id(),
                    "multiple egress options"
                );
            }

            match graph.get(next_id.as_str()) {
                Some(next) => current = next,
                None => {
                    edges.push(resolver.infer_missing_hostname(&current.id, next_id));
                    break;
                }
            }
        }

        LinearPath { edges, truncated }
    }
}
