use itertools::Itertools;
use thiserror::Error;

/// Failures while loading the campus graph. These are startup-time errors,
/// a planner is never constructed from a graph that failed to load.
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Malformed campus graph: {0}")]
    ParseError(#[from] serde_json::Error),
    #[error("Invalid data: {0}")]
    InvalidData(String),
    #[error("Strict load rejected {count} malformed item(s), first: {first}")]
    StrictLoad { count: usize, first: String },
    #[error("GeoJSON error: {0}")]
    GeoJsonError(String),
}

/// Failures of a single route request
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RouteError {
    #[error("Request must include a list of building codes.")]
    InvalidRequest,
    #[error("Unknown building codes: {}", .0.iter().join(", "))]
    UnknownBuilding(Vec<String>),
    #[error("Provide at least two building codes to plan a route.")]
    InsufficientEndpoints,
    #[error("No available path between {from} and {to}.")]
    NoPathFound { from: String, to: String },
}
