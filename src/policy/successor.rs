//! Successor selection for path linearization.
//!
//! When an edge lists several `nextEdgeIds` the linearizer follows exactly one
//! of them. Which one is decided by a [`SuccessorPolicy`]; the others are
//! alternate egress options and are not visited.

use serde::{Deserialize, Serialize};

use crate::types::{Edge, EdgeId};

/// Policy id of [`FirstOption`].
pub const FIRST_OPTION_POLICY: &str = "first_option";

/// Picks the successor to follow from an edge.
pub trait SuccessorPolicy {
    /// Stable identifier, recorded alongside linearized paths.
    fn policy_id(&self) -> &str;

    /// Successor to follow, or `None` to end the path.
    ///
    /// Implementations must be deterministic for a given edge.
    fn select<'e>(&self, edge: &'e Edge) -> Option<&'e EdgeId>;
}

impl<P: SuccessorPolicy + ?Sized> SuccessorPolicy for &P {
    fn policy_id(&self) -> &str {
        (**self).policy_id()
    }

    fn select<'e>(&self, edge: &'e Edge) -> Option<&'e EdgeId> {
        (**self).select(edge)
    }
}

/// Always follow the first listed successor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FirstOption;

impl SuccessorPolicy for FirstOption {
    fn policy_id(&self) -> &str {
        FIRST_OPTION_POLICY
    }

    fn select<'e>(&self, edge: &'e Edge) -> Option<&'e EdgeId> {
        edge.next_edge_ids.first()
    }
}
