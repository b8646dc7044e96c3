//! Dijkstra over any graph with non-negative edge weights.
//!
//! The search is independent of the campus model: nodes are any small
//! copyable identifier and the graph is described by a successor function.

mod state;

use std::collections::BinaryHeap;
use std::hash::Hash;

use hashbrown::{HashMap, hash_map::Entry};

use crate::Seconds;
use state::State;

/// Cheapest path found by the search
#[derive(Debug, Clone, PartialEq)]
pub struct ShortestPath<N> {
    pub cost: Seconds,
    /// Nodes from the source to the goal, both inclusive
    pub nodes: Vec<N>,
}

/// Dijkstra's algorithm between two nodes.
///
/// Returns `None` when `goal` cannot be reached from `start`; a node is
/// always reachable from itself at zero cost.
pub fn shortest_path<N, F, I>(start: N, goal: N, successors: F) -> Option<ShortestPath<N>>
where
    N: Copy + Eq + Hash,
    F: FnMut(N) -> I,
    I: IntoIterator<Item = (N, Seconds)>,
{
    shortest_path_multi([start], |node| *node == goal, successors)
}

/// Dijkstra's algorithm seeded with several sources at distance zero.
///
/// Stops at the first node accepted by `is_goal`, which is the goal closest
/// to any of the sources. Among paths of equal cost the one returned is
/// unspecified.
pub fn shortest_path_multi<N, S, G, F, I>(
    sources: S,
    mut is_goal: G,
    mut successors: F,
) -> Option<ShortestPath<N>>
where
    N: Copy + Eq + Hash,
    S: IntoIterator<Item = N>,
    G: FnMut(&N) -> bool,
    F: FnMut(N) -> I,
    I: IntoIterator<Item = (N, Seconds)>,
{
    let mut distances: HashMap<N, Seconds> = HashMap::new();
    let mut predecessors: HashMap<N, N> = HashMap::new();
    let mut heap = BinaryHeap::new();

    for source in sources {
        if distances.insert(source, 0.0).is_none() {
            heap.push(State {
                cost: 0.0,
                node: source,
            });
        }
    }

    while let Some(State { cost, node }) = heap.pop() {
        // Skip if we've found a better path
        if let Some(&best) = distances.get(&node)
            && cost > best
        {
            continue;
        }

        if is_goal(&node) {
            return Some(ShortestPath {
                cost,
                nodes: reconstruct_path(&predecessors, node),
            });
        }

        for (next, weight) in successors(node) {
            debug_assert!(weight >= 0.0, "negative edge weight {weight}");
            let next_cost = cost + weight;

            match distances.entry(next) {
                Entry::Vacant(entry) => {
                    entry.insert(next_cost);
                    heap.push(State {
                        cost: next_cost,
                        node: next,
                    });
                    predecessors.insert(next, node);
                }
                Entry::Occupied(mut entry) => {
                    if next_cost < *entry.get() {
                        *entry.get_mut() = next_cost;
                        heap.push(State {
                            cost: next_cost,
                            node: next,
                        });
                        predecessors.insert(next, node);
                    }
                }
            }
        }
    }

    None
}

fn reconstruct_path<N>(predecessors: &HashMap<N, N>, goal: N) -> Vec<N>
where
    N: Copy + Eq + Hash,
{
    let mut path = vec![goal];
    let mut current = goal;
    while let Some(&prev) = predecessors.get(&current) {
        path.push(prev);
        current = prev;
    }
    path.reverse();
    path
}
