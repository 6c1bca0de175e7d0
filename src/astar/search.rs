// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};

use super::error::SearchError;
use crate::{earth_distance, Graph, Node};

/// Result of a shortest-path search between two [Node]s of a [Graph].
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    /// Every node on the shortest path, start and goal inclusive.
    /// Empty if no path exists.
    pub waypoints: Vec<Node>,

    /// Total length of the path in kilometers,
    /// or [f64::INFINITY] if no path exists.
    pub distance: f64,
}

impl Route {
    /// Returns `true` if the goal was actually reached.
    pub fn is_found(&self) -> bool {
        self.distance.is_finite()
    }

    fn not_found() -> Self {
        Self {
            waypoints: Vec::default(),
            distance: f64::INFINITY,
        }
    }
}

/// Entry of the A* priority queue. Entries are never updated in place,
/// a cheaper way to a node is simply pushed as another entry, and whichever
/// pops first wins. `from` remembers the node this entry was expanded from,
/// so that the parent is only committed once the node is settled.
#[derive(Debug, Clone, Copy)]
struct QueueItem {
    at: i64,
    from: i64,
    cost: f64,
    score: f64,
}

impl PartialEq for QueueItem {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for QueueItem {}

impl PartialOrd for QueueItem {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueueItem {
    fn cmp(&self, other: &Self) -> Ordering {
        // NOTE: We revert the order of comparison, as lower scores
        // are considered better ("higher"), due to Rust's BinaryHeap
        // being a max-heap. Equal scores compare by the cost so far,
        // cheapest first.
        other
            .score
            .total_cmp(&self.score)
            .then_with(|| other.cost.total_cmp(&self.cost))
    }
}

/// Finds the shortest path between two nodes of `g` using the
/// [A* search algorithm](https://en.wikipedia.org/wiki/A*_search_algorithm)
/// with the crow-flies distance to the goal as the heuristic.
///
/// An unreachable goal is not an error: the search simply runs out of nodes
/// to expand and returns a [Route] for which [Route::is_found] is `false`.
/// [SearchError::InvalidReference] is only returned if `from_id` or `to_id`
/// is not a node of the graph.
///
/// `step_limit` limits how many nodes may be expanded during the search
/// before returning [SearchError::StepLimitExceeded]. Concluding that no route exists requires
/// expanding all nodes accessible from the start, which is usually very time-consuming,
/// especially on large datasets (like the whole planet). The recommended value is
/// [DEFAULT_STEP_LIMIT](crate::DEFAULT_STEP_LIMIT).
pub fn find_path(
    g: &Graph,
    from_id: i64,
    to_id: i64,
    step_limit: usize,
) -> Result<Route, SearchError> {
    let to = g
        .get_node(to_id)
        .ok_or(SearchError::InvalidReference(to_id))?;
    let from = g
        .get_node(from_id)
        .ok_or(SearchError::InvalidReference(from_id))?;

    if from_id == to_id {
        return Ok(Route {
            waypoints: vec![from],
            distance: 0.0,
        });
    }

    let mut queue: BinaryHeap<QueueItem> = BinaryHeap::default();
    let mut closed: HashSet<i64> = HashSet::default();
    let mut came_from: HashMap<i64, i64> = HashMap::default();
    let mut steps: usize = 0;

    queue.push(QueueItem {
        at: from_id,
        from: from_id,
        cost: 0.0,
        score: earth_distance(from.lat, from.lon, to.lat, to.lon),
    });

    while let Some(item) = queue.pop() {
        // A node may sit in the queue multiple times. Only the first,
        // cheapest entry counts, anything popped later is stale.
        if !closed.insert(item.at) {
            continue;
        }
        if item.at != item.from {
            came_from.insert(item.at, item.from);
        }

        if item.at == to_id {
            return Ok(Route {
                waypoints: reconstruct_path(g, &came_from, to_id),
                distance: item.cost,
            });
        }

        steps += 1;
        if steps > step_limit {
            return Err(SearchError::StepLimitExceeded);
        }

        for edge in g.get_edges(item.at) {
            if closed.contains(&edge.to) {
                continue;
            }

            // Check if the referred node exists
            if let Some(neighbor) = g.get_node(edge.to) {
                let neighbor_cost = item.cost + edge.cost;
                queue.push(QueueItem {
                    at: edge.to,
                    from: item.at,
                    cost: neighbor_cost,
                    score: neighbor_cost
                        + earth_distance(neighbor.lat, neighbor.lon, to.lat, to.lon),
                });
            }
        }
    }

    Ok(Route::not_found())
}

/// Walks the parent pointers from `last` back to the start
/// and returns the corresponding nodes in forward order.
fn reconstruct_path(g: &Graph, came_from: &HashMap<i64, i64>, mut last: i64) -> Vec<Node> {
    let mut ids = vec![last];
    while let Some(&previous) = came_from.get(&last) {
        ids.push(previous);
        last = previous;
    }
    ids.reverse();
    ids.into_iter()
        .map(|id| {
            g.get_node(id)
                .expect("parent pointers only refer to nodes of the graph")
        })
        .collect()
}
