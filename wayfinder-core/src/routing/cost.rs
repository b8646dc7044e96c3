//! Edge traversal cost

use hashbrown::HashSet;

use crate::Seconds;
use crate::model::{Edge, Settings};

/// Walking time over an edge, or `None` when the edge is blocked by its
/// own flag or by the override list.
///
/// Walking time is `length / speed`, plus the edge's fixed penalty, plus the
/// configured penalty of every flag set on the edge.
pub fn edge_cost(edge: &Edge, settings: &Settings, blocked_edges: &HashSet<String>) -> Option<Seconds> {
    if edge.flags.blocked || blocked_edges.contains(edge.id.as_str()) {
        return None;
    }

    let penalties = &settings.penalties;
    let mut cost = edge.length_m / settings.walking_speed_mps + edge.penalty_s.unwrap_or(0.0);
    if edge.flags.stairs {
        cost += penalties.stairs_s;
    }
    if edge.flags.steep {
        cost += penalties.steep_s;
    }
    if edge.flags.covered {
        cost += penalties.covered_s;
    }

    Some(cost)
}
