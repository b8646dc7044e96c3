//! Walkway graph components - nodes, edges, buildings and routing settings

use geo::Coord;

use crate::Seconds;

/// Walkway graph node
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: String,
    /// Pixel coordinate on the campus map
    pub position: Coord<f64>,
}

/// Declared properties of a walkway segment
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EdgeFlags {
    pub blocked: bool,
    pub stairs: bool,
    pub steep: bool,
    pub covered: bool,
}

/// Walkway segment. Stored once, traversable in both directions.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub id: String,
    pub from: String,
    pub to: String,
    pub length_m: f64,
    /// Fixed time added on top of the walking time
    pub penalty_s: Option<Seconds>,
    pub flags: EdgeFlags,
}

/// Building with the nodes it can be entered from
#[derive(Debug, Clone, PartialEq)]
pub struct Building {
    pub code: String,
    pub name: String,
    pub entrances: Vec<String>,
}

impl Building {
    /// Buildings without entrances never take part in a route
    pub fn is_routable(&self) -> bool {
        !self.entrances.is_empty()
    }
}

/// Extra seconds charged for each flagged edge
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Penalties {
    pub stairs_s: Seconds,
    pub steep_s: Seconds,
    pub covered_s: Seconds,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Settings {
    /// Always positive, enforced at load
    pub walking_speed_mps: f64,
    pub penalties: Penalties,
}

/// Size of the background map the pixel coordinates refer to
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ImageMeta {
    pub width_px: Option<f64>,
    pub height_px: Option<f64>,
}
