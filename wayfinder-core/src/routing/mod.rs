//! Edge costs, walking graph, shortest paths and building-to-building routes

pub mod adjacency;
pub mod cost;
pub mod dijkstra;
pub mod route_plan;
mod to_geojson;

pub use adjacency::Adjacency;
pub use cost::edge_cost;
pub use dijkstra::{ShortestPath, shortest_path, shortest_path_multi};
pub use route_plan::{LegSearch, RouteLeg, RoutePlan, plan_route};
