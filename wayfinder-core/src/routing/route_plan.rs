//! Multi-leg routes between buildings

use geo::{Centroid, Coord, MultiPoint, Point};
use itertools::Itertools;
use log::debug;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::adjacency::Adjacency;
use super::dijkstra::ShortestPath;
use crate::model::Building;
use crate::{CampusGraph, RouteError, Seconds};

/// How the fastest walk between two buildings is searched for
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LegSearch {
    /// One search seeded with every entrance of the origin building
    #[default]
    MultiSource,
    /// One search per (origin entrance, destination entrance) pair
    CrossProduct,
}

/// Part of a route between two consecutive buildings
#[derive(Debug, Clone, PartialEq)]
pub struct RouteLeg {
    pub from_building: String,
    pub to_building: String,
    pub time_s: Seconds,
    /// Node ids from an entrance of `from_building` to one of `to_building`
    pub nodes: Vec<String>,
    pub polyline: Vec<Coord<f64>>,
    /// Mean of the polyline coordinates, used to place the leg's label
    pub label_position: Coord<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RoutePlan {
    pub legs: Vec<RouteLeg>,
    /// All legs joined, without repeating the node where two legs meet
    pub path: Vec<String>,
    pub total_time_s: Seconds,
}

impl RoutePlan {
    /// Coordinates of the joined path
    pub fn polyline(&self, graph: &CampusGraph) -> Vec<Coord<f64>> {
        self.path
            .iter()
            .filter_map(|id| graph.node(id).map(|node| node.position))
            .collect()
    }
}

/// Plans the fastest route visiting `codes` in order.
///
/// # Errors
///
/// Fails when the list is empty, names unknown buildings, has fewer than two
/// entries, or when any leg has no walkable path. No partial route is ever
/// returned.
pub fn plan_route<S: AsRef<str>>(
    graph: &CampusGraph,
    adjacency: &Adjacency,
    codes: &[S],
    search: LegSearch,
) -> Result<RoutePlan, RouteError> {
    if codes.is_empty() {
        return Err(RouteError::InvalidRequest);
    }

    let mut buildings = Vec::with_capacity(codes.len());
    let mut unknown = Vec::new();
    for code in codes.iter().map(AsRef::as_ref) {
        match graph.building(code) {
            Some(building) => buildings.push(building),
            None => unknown.push(code.to_string()),
        }
    }
    if !unknown.is_empty() {
        return Err(RouteError::UnknownBuilding(unknown));
    }

    if buildings.len() < 2 {
        return Err(RouteError::InsufficientEndpoints);
    }

    let mut legs = Vec::with_capacity(buildings.len() - 1);
    let mut path: Vec<String> = Vec::new();
    let mut total_time_s = 0.0;

    for (from, to) in buildings.into_iter().tuple_windows() {
        let (from_code, to_code) = (from.code.as_str(), to.code.as_str());
        let leg = fastest_leg(adjacency, from, to, search).ok_or_else(|| RouteError::NoPathFound {
            from: from_code.to_string(),
            to: to_code.to_string(),
        })?;
        debug!(
            "Leg {from_code} -> {to_code}: {:.1}s over {} nodes",
            leg.cost,
            leg.nodes.len()
        );

        total_time_s += leg.cost;

        let skip = usize::from(path.last().is_some_and(|last| leg.nodes.first() == Some(last)));
        path.extend(leg.nodes.iter().skip(skip).cloned());

        let polyline: Vec<Coord<f64>> = leg
            .nodes
            .iter()
            .filter_map(|id| graph.node(id).map(|node| node.position))
            .collect();

        legs.push(RouteLeg {
            from_building: from_code.to_string(),
            to_building: to_code.to_string(),
            time_s: leg.cost,
            label_position: label_anchor(&polyline),
            nodes: leg.nodes,
            polyline,
        });
    }

    Ok(RoutePlan {
        legs,
        path,
        total_time_s,
    })
}

/// Fastest walk from any entrance of `from` to any entrance of `to`
fn fastest_leg(
    adjacency: &Adjacency,
    from: &Building,
    to: &Building,
    search: LegSearch,
) -> Option<ShortestPath<String>> {
    if !from.is_routable() || !to.is_routable() {
        return None;
    }

    match search {
        LegSearch::MultiSource => adjacency.shortest_path_between(&from.entrances, &to.entrances),
        LegSearch::CrossProduct => from
            .entrances
            .iter()
            .cartesian_product(to.entrances.iter())
            .collect::<Vec<_>>()
            .into_par_iter()
            .filter_map(|(start, goal)| adjacency.shortest_path(start, goal))
            .min_by(|a, b| a.cost.total_cmp(&b.cost)),
    }
}

fn label_anchor(polyline: &[Coord<f64>]) -> Coord<f64> {
    let points: MultiPoint<f64> = polyline.iter().copied().map(Point::from).collect();
    points
        .centroid()
        .map_or(Coord { x: 0.0, y: 0.0 }, Coord::from)
}
