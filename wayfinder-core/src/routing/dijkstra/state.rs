use std::cmp::Ordering;

use crate::Seconds;

#[derive(Copy, Clone, Debug)]
pub(super) struct State<N> {
    pub(super) cost: Seconds,
    pub(super) node: N,
}

// Equality follows the ordering, which only looks at the cost
impl<N> PartialEq for State<N> {
    fn eq(&self, other: &Self) -> bool {
        self.cost.total_cmp(&other.cost) == Ordering::Equal
    }
}

impl<N> Eq for State<N> {}

// Implement Ord for State to use in BinaryHeap
impl<N> Ord for State<N> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Min-heap by cost (reversed from standard Rust BinaryHeap)
        other.cost.total_cmp(&self.cost)
    }
}

impl<N> PartialOrd for State<N> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
