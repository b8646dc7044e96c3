//! Undirected walking graph derived from the campus edges

use hashbrown::{HashMap, HashSet};
use log::{debug, info};
use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;

use super::cost::edge_cost;
use super::dijkstra::{self, ShortestPath};
use crate::{CampusGraph, Seconds};

/// Walking graph: node weights are node ids, edge weights are traversal
/// times in seconds
type WalkGraph = UnGraph<String, Seconds>;

/// Neighbor lists for every node of the campus graph. Blocked edges are
/// left out entirely.
#[derive(Debug, Clone)]
pub struct Adjacency {
    graph: WalkGraph,
    index: HashMap<String, NodeIndex>,
}

impl Adjacency {
    /// Builds the walking graph. Every known node gets an entry, isolated
    /// ones included; edges that are blocked or touch an unknown node are
    /// skipped.
    pub fn build(campus: &CampusGraph) -> Self {
        let mut graph = WalkGraph::with_capacity(campus.node_count(), campus.edge_count());
        let mut index = HashMap::with_capacity(campus.node_count());

        for node in campus.nodes() {
            let idx = graph.add_node(node.id.clone());
            index.insert(node.id.clone(), idx);
        }

        let mut blocked = 0;
        let mut dangling = 0;
        for edge in campus.edges() {
            let Some(cost) = edge_cost(edge, campus.settings(), campus.blocked_edges()) else {
                blocked += 1;
                continue;
            };
            let (Some(&from), Some(&to)) = (index.get(&edge.from), index.get(&edge.to)) else {
                debug!(
                    "Skipping edge {}: endpoint {} or {} is not a known node",
                    edge.id, edge.from, edge.to
                );
                dangling += 1;
                continue;
            };
            graph.add_edge(from, to, cost);
        }

        info!(
            "Built walking graph: {} nodes, {} edges ({} blocked, {} with unknown endpoints)",
            graph.node_count(),
            graph.edge_count(),
            blocked,
            dangling
        );

        Self { graph, index }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of traversable edges, each counted once
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Neighbors of a node with the time to reach each of them, or `None`
    /// for an unknown node
    pub fn neighbors(&self, id: &str) -> Option<Vec<(&str, Seconds)>> {
        let idx = *self.index.get(id)?;
        Some(
            self.successors(idx)
                .map(|(next, cost)| (self.graph[next].as_str(), cost))
                .collect(),
        )
    }

    /// Fastest walk between two nodes, `None` when either is unknown or no
    /// walk exists
    pub fn shortest_path(&self, start: &str, goal: &str) -> Option<ShortestPath<String>> {
        let start = *self.index.get(start)?;
        let goal = *self.index.get(goal)?;
        let path = dijkstra::shortest_path(start, goal, |node| self.successors(node));
        path.map(|path| self.resolve(path))
    }

    /// Fastest walk from any of `sources` to any of `goals`
    pub fn shortest_path_between<S, G>(&self, sources: &[S], goals: &[G]) -> Option<ShortestPath<String>>
    where
        S: AsRef<str>,
        G: AsRef<str>,
    {
        let goals: HashSet<NodeIndex> = goals
            .iter()
            .filter_map(|id| self.index.get(id.as_ref()).copied())
            .collect();
        if goals.is_empty() {
            return None;
        }
        let sources = sources
            .iter()
            .filter_map(|id| self.index.get(id.as_ref()).copied());

        let path = dijkstra::shortest_path_multi(sources, |node| goals.contains(node), |node| {
            self.successors(node)
        });
        path.map(|path| self.resolve(path))
    }

    fn successors(&self, node: NodeIndex) -> impl Iterator<Item = (NodeIndex, Seconds)> + '_ {
        self.graph.edges(node).map(move |edge| {
            let next = if edge.source() == node {
                edge.target()
            } else {
                edge.source()
            };
            (next, *edge.weight())
        })
    }

    fn resolve(&self, path: ShortestPath<NodeIndex>) -> ShortestPath<String> {
        ShortestPath {
            cost: path.cost,
            nodes: path
                .nodes
                .into_iter()
                .map(|idx| self.graph[idx].clone())
                .collect(),
        }
    }
}
