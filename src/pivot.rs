//! Pivot entry point resolution.
//!
//! A pivot is a host from which the network can reach the real source. The
//! reverse lookup (pivot → source) crosses into the source's segment on a
//! `transit` edge; that edge's source side is where the primary lookup should
//! start.

use tracing::{info, warn};

use crate::source::PathLookupSource;
use crate::types::{EntryPoint, LookupRequest, PathLookupResult};

/// Entry point of the first transit edge, in document order.
///
/// `None` when the pivot has no route into the source's segment.
pub fn find_entry_point(pivot_result: &PathLookupResult) -> Option<EntryPoint> {
    pivot_result.edges.iter().find_map(|edge| {
        let decoded = edge.id.decode();
        if !decoded.is_transit() {
            return None;
        }

        let token = &decoded.source.token;
        let device_id = edge.source.as_deref().unwrap_or(token.device_key());
        let interface = edge
            .source_iface_name
            .clone()
            .or_else(|| decoded.source.interface.clone())
            .unwrap_or_default();

        Some(EntryPoint {
            serial: pivot_result.nodes.serial(device_id).unwrap_or_default().to_string(),
            interface,
            hostname: token.display_name().to_string(),
        })
    })
}

/// Seed `request` with the entry point found through `pivot`.
///
/// Issues the reversed lookup and returns `request` with a user-defined
/// first hop. Without a transit edge the request is returned unchanged.
pub async fn seed_from_pivot<S>(
    source: &S,
    request: &LookupRequest,
    pivot: &str,
) -> Result<LookupRequest, S::Error>
where
    S: PathLookupSource + ?Sized,
{
    let reverse = request.pivot_request(pivot);
    let pivot_result = source.lookup(&reverse).await?;

    match find_entry_point(&pivot_result) {
        Some(entry_point) => {
            info!(
                pivot,
                entry_point = %entry_point,
                serial = %entry_point.serial,
                "seeding lookup from pivot entry point"
            );
            Ok(request.clone().with_entry_point(entry_point))
        }
        None => {
            warn!(pivot, source = %request.starting_point, "pivot has no transit edge, using automatic first hop");
            Ok(request.clone())
        }
    }
}
