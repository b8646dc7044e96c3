// Re-export key components
pub use crate::loading::{LoadDiagnostic, LoadOptions, load_campus_graph};
pub use crate::model::{Building, CampusGraph, Edge, EdgeFlags, ImageMeta, Node, Settings};
pub use crate::planner::Planner;
pub use crate::routing::{Adjacency, LegSearch, RouteLeg, RoutePlan, ShortestPath, plan_route};
pub use crate::{Error, RouteError, Seconds};
