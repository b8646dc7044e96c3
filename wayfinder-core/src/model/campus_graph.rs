//! Loaded campus graph and its lookup indices

use std::io::Read;
use std::path::Path;

use hashbrown::{HashMap, HashSet};

use super::components::{Building, Edge, ImageMeta, Node, Settings};
use crate::loading::{self, LoadDiagnostic, LoadOptions};
use crate::Error;

/// Static walkway graph. Immutable once loaded.
#[derive(Debug, Clone)]
pub struct CampusGraph {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    buildings: Vec<Building>,
    settings: Settings,
    /// Edge ids treated as impassable regardless of their flags
    blocked_edges: HashSet<String>,
    image: ImageMeta,
    node_index: HashMap<String, usize>,
    building_index: HashMap<String, usize>,
    diagnostics: Vec<LoadDiagnostic>,
}

impl CampusGraph {
    /// Loads a campus graph with default (lenient) options
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or does not describe a
    /// usable graph
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        loading::load_campus_graph(path.as_ref(), &LoadOptions::default())
    }

    /// # Errors
    ///
    /// See [`CampusGraph::load`]
    pub fn from_reader(reader: impl Read) -> Result<Self, Error> {
        loading::campus_graph_from_reader(reader, &LoadOptions::default())
    }

    /// # Errors
    ///
    /// See [`CampusGraph::load`]
    pub fn from_json_str(json: &str) -> Result<Self, Error> {
        loading::campus_graph_from_str(json, &LoadOptions::default())
    }

    /// Assembles a graph from already validated parts. Ids must be unique.
    pub(crate) fn from_parts(
        nodes: Vec<Node>,
        edges: Vec<Edge>,
        buildings: Vec<Building>,
        settings: Settings,
        blocked_edges: HashSet<String>,
        image: ImageMeta,
        diagnostics: Vec<LoadDiagnostic>,
    ) -> Self {
        let node_index = nodes
            .iter()
            .enumerate()
            .map(|(idx, node)| (node.id.clone(), idx))
            .collect();
        let building_index = buildings
            .iter()
            .enumerate()
            .map(|(idx, building)| (building.code.clone(), idx))
            .collect();

        Self {
            nodes,
            edges,
            buildings,
            settings,
            blocked_edges,
            image,
            node_index,
            building_index,
            diagnostics,
        }
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.node_index.get(id).map(|&idx| &self.nodes[idx])
    }

    pub fn building(&self, code: &str) -> Option<&Building> {
        self.building_index.get(code).map(|&idx| &self.buildings[idx])
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Buildings in file order
    pub fn buildings(&self) -> &[Building] {
        &self.buildings
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn blocked_edges(&self) -> &HashSet<String> {
        &self.blocked_edges
    }

    pub fn image(&self) -> ImageMeta {
        self.image
    }

    /// Items dropped while loading, in the order they were found
    pub fn diagnostics(&self) -> &[LoadDiagnostic] {
        &self.diagnostics
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn building_count(&self) -> usize {
        self.buildings.len()
    }
}
