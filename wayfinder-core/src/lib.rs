//! Campus walkway path planning.
//!
//! Loads a static walkway graph (nodes, edges, buildings and their entrances),
//! derives a penalty-weighted adjacency from it and stitches minimum-time
//! routes between ordered lists of buildings.

mod error;
pub mod loading;
pub mod model;
pub mod planner;
pub mod prelude;
pub mod routing;

pub use error::{Error, RouteError};
pub use loading::{LoadDiagnostic, LoadOptions};
pub use model::CampusGraph;
pub use planner::Planner;

/// Travel time in seconds
pub type Seconds = f64;
