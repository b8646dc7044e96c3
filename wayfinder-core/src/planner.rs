//! Planner service owning the loaded graph and its walking graph

use std::path::Path;
use std::sync::OnceLock;

use crate::loading::{self, LoadOptions};
use crate::routing::{Adjacency, LegSearch, RoutePlan, plan_route};
use crate::{CampusGraph, Error, RouteError};

/// Loaded once at startup and shared by reference between requests. The
/// walking graph is derived on first use, exactly once even when several
/// threads ask for it at the same time.
#[derive(Debug)]
pub struct Planner {
    graph: CampusGraph,
    adjacency: OnceLock<Adjacency>,
    search: LegSearch,
}

impl Planner {
    pub fn new(graph: CampusGraph) -> Self {
        Self {
            graph,
            adjacency: OnceLock::new(),
            search: LegSearch::default(),
        }
    }

    /// # Errors
    ///
    /// Returns an error if the graph file cannot be loaded
    pub fn load(path: impl AsRef<Path>, options: &LoadOptions) -> Result<Self, Error> {
        loading::load_campus_graph(path.as_ref(), options).map(Self::new)
    }

    #[must_use]
    pub fn with_leg_search(mut self, search: LegSearch) -> Self {
        self.search = search;
        self
    }

    pub fn graph(&self) -> &CampusGraph {
        &self.graph
    }

    pub fn adjacency(&self) -> &Adjacency {
        self.adjacency.get_or_init(|| Adjacency::build(&self.graph))
    }

    pub fn leg_search(&self) -> LegSearch {
        self.search
    }

    /// Plans the fastest route visiting the buildings in order
    ///
    /// # Errors
    ///
    /// See [`plan_route`]
    pub fn route<S: AsRef<str>>(&self, codes: &[S]) -> Result<RoutePlan, RouteError> {
        plan_route(&self.graph, self.adjacency(), codes, self.search)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use serde_json::json;

    use super::*;

    fn graph_json() -> String {
        json!({
            "nodes": [{"id": "A", "x": 0, "y": 0}, {"id": "B", "x": 4, "y": 0}],
            "edges": [{"id": "AB", "from": "A", "to": "B", "length_m": 8}],
            "buildings": [
                {"id": "W", "name": "West", "entranceNodeIds": ["A"]},
                {"id": "E", "name": "East", "entranceNodeIds": ["B"]}
            ],
            "settings": {"walking_speed_mps": 2.0}
        })
        .to_string()
    }

    #[test]
    fn adjacency_is_built_once() {
        let planner = Planner::new(CampusGraph::from_json_str(&graph_json()).unwrap());
        let first: *const Adjacency = planner.adjacency();
        let second: *const Adjacency = planner.adjacency();
        assert_eq!(first, second);
    }

    #[test]
    fn concurrent_first_use_shares_one_adjacency() {
        let planner = Planner::new(CampusGraph::from_json_str(&graph_json()).unwrap());
        let addresses: Vec<usize> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| scope.spawn(|| std::ptr::from_ref(planner.adjacency()) as usize))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });
        assert!(addresses.windows(2).all(|w| w[0] == w[1]));
    }

    #[test]
    fn loads_from_disk_and_routes() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(graph_json().as_bytes()).unwrap();

        let planner = Planner::load(file.path(), &LoadOptions::default()).unwrap();
        let plan = planner.route(&["W", "E"]).unwrap();
        assert_eq!(plan.total_time_s, 4.0);
        assert_eq!(plan.path, vec!["A", "B"]);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = Planner::load(dir.path().join("absent.json"), &LoadOptions::default());
        assert!(matches!(result, Err(Error::IoError(_))));
    }

    #[test]
    fn leg_search_is_configurable() {
        let planner = Planner::new(CampusGraph::from_json_str(&graph_json()).unwrap())
            .with_leg_search(LegSearch::CrossProduct);
        assert_eq!(planner.leg_search(), LegSearch::CrossProduct);
        assert_eq!(planner.route(&["E", "W"]).unwrap().total_time_s, 4.0);
    }
}
