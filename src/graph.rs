// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use crate::overpass::RoadData;
use crate::{earth_distance, Edge, Node};
use std::collections::btree_map::{BTreeMap, Entry};

/// Error returned by [Graph::find_nearest_node] when invoked on a [Graph]
/// without any [Nodes](Node).
///
/// An empty graph is a valid value (an empty snapshot produces one), but
/// asking it for the nearest node is a precondition violation on the caller's
/// side, reported explicitly instead of through a sentinel node id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("graph contains no nodes")]
pub struct EmptyGraphError;

/// Represents a road network as a set of [Nodes](Node)
/// and undirected [Edges](Edge) between them.
///
/// Nodes are stored in a [BTreeMap], so every traversal of the graph
/// visits nodes in ascending id order, independent of insertion order.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Graph(BTreeMap<i64, (Node, Vec<Edge>)>);

impl Graph {
    /// Builds a [Graph] from raw road-network records.
    ///
    /// The node table is populated first (a duplicate node record overwrites
    /// the earlier position), then every consecutive pair of a way's nodes
    /// becomes a pair of mirrored [Edges](Edge) with cost equal to the
    /// [earth_distance] between the two endpoints. Ways sharing a segment
    /// produce parallel duplicate edges; they are kept as-is.
    ///
    /// Pairs referencing a node missing from the node table are skipped -
    /// snapshots are clipped to a bounding region upstream, so dangling
    /// references are expected, not an error. Ways with fewer than two nodes
    /// contribute no edges. Empty input produces an empty, valid [Graph].
    pub fn from_road_data(data: &RoadData) -> Self {
        let mut g = Self::default();

        for &node in &data.nodes {
            g.set_node(node);
        }

        let mut skipped_pairs: usize = 0;
        for way in &data.ways {
            for pair in way.nodes.windows(2) {
                match (g.get_node(pair[0]), g.get_node(pair[1])) {
                    (Some(left), Some(right)) => {
                        let cost = earth_distance(left.lat, left.lon, right.lat, right.lon);
                        g.add_edge(left.id, Edge { to: right.id, cost });
                        g.add_edge(right.id, Edge { to: left.id, cost });
                    }
                    _ => skipped_pairs += 1,
                }
            }
        }

        if skipped_pairs > 0 {
            log::debug!(
                "skipped {} way segment(s) referencing nodes outside the snapshot",
                skipped_pairs
            );
        }

        g
    }

    /// Returns the number of nodes in the graph.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the graph contains no nodes.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns an iterator over all [Nodes](Node) in the graph,
    /// in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.0.iter().map(|(_, (node, _))| node)
    }

    /// Retrieves a [Node] with the provided id.
    pub fn get_node(&self, id: i64) -> Option<Node> {
        self.0.get(&id).map(|&(node, _)| node)
    }

    /// Creates or updates a [Node] with `node.id`.
    ///
    /// All outgoing and incoming edges are preserved. Updating a [Node]
    /// position might result in violation of the [Edge] cost invariant
    /// (and thus break route finding) and is therefore disallowed.
    pub fn set_node(&mut self, node: Node) {
        match self.0.entry(node.id) {
            Entry::Vacant(e) => {
                e.insert((node, Vec::default()));
            }
            Entry::Occupied(mut e) => {
                debug_assert_eq!(e.get().0.id, node.id);
                e.get_mut().0 = node;
            }
        }
    }

    /// Adds an outgoing [Edge] from a node with a given id.
    ///
    /// Edges are appended, never merged: adding a second edge to the same
    /// target keeps both, so overlapping ways retain their parallel edges.
    /// If no node with `from_id` exists, the edge is discarded.
    pub fn add_edge(&mut self, from_id: i64, edge: Edge) {
        if let Some((_, edges)) = self.0.get_mut(&from_id) {
            edges.push(edge);
        }
    }

    /// Gets all outgoing [Edges](Edge) from a node with a given id.
    ///
    /// A node without any outgoing edges (or an id not present in the graph)
    /// yields an empty slice - a dead end, not an error.
    pub fn get_edges(&self, from_id: i64) -> &[Edge] {
        self.0
            .get(&from_id)
            .map(|(_, e)| e.as_slice())
            .unwrap_or_default()
    }

    /// Gets the cost of an [Edge] from one node to another.
    /// If such an edge doesn't exist, returns [f64::INFINITY].
    /// If parallel edges exist, returns the cost of the first one added.
    pub fn get_edge(&self, from_id: i64, to_id: i64) -> f64 {
        self.0
            .get(&from_id)
            .and_then(|(_, e)| {
                e.iter().find_map(|edge| {
                    if edge.to == to_id {
                        Some(edge.cost)
                    } else {
                        None
                    }
                })
            })
            .unwrap_or(f64::INFINITY)
    }

    /// Finds the closest [Node] to the given position.
    ///
    /// When several nodes are exactly equidistant from the position, the one
    /// with the lowest id wins - the result never depends on traversal order.
    ///
    /// This function requires computing the distance to every [Node] in the
    /// graph. For repeated lookups over a large graph, build a
    /// [KDTree](crate::KDTree) instead.
    pub fn find_nearest_node(&self, lat: f64, lon: f64) -> Result<Node, EmptyGraphError> {
        self.0
            .values()
            .map(|&(nd, _)| (earth_distance(lat, lon, nd.lat, nd.lon), nd))
            .min_by(|(a_dist, a), (b_dist, b)| a_dist.total_cmp(b_dist).then(a.id.cmp(&b.id)))
            .map(|(_, nd)| nd)
            .ok_or(EmptyGraphError)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overpass::Way;
    use std::collections::HashMap;

    macro_rules! assert_almost_eq {
        ($a:expr, $b:expr) => {
            assert!(
                (($a - $b).abs() < 1e-12),
                "assertion failed: {} ≈ {}",
                $a,
                $b
            )
        };
    }

    fn node(id: i64, lat: f64, lon: f64) -> Node {
        Node { id, lat, lon }
    }

    fn way(id: i64, nodes: &[i64]) -> Way {
        Way {
            id,
            nodes: nodes.to_vec(),
            tags: HashMap::default(),
        }
    }

    #[test]
    fn build_simple_way() {
        let data = RoadData {
            nodes: vec![node(1, 0.0, 0.0), node(2, 0.0, 1.0), node(3, 1.0, 1.0)],
            ways: vec![way(-100, &[1, 2, 3])],
        };
        let g = Graph::from_road_data(&data);

        let d12 = earth_distance(0.0, 0.0, 0.0, 1.0);
        let d23 = earth_distance(0.0, 1.0, 1.0, 1.0);

        assert_eq!(g.len(), 3);
        assert_eq!(g.get_edges(1), &[Edge { to: 2, cost: d12 }]);
        assert_eq!(
            g.get_edges(2),
            &[Edge { to: 1, cost: d12 }, Edge { to: 3, cost: d23 }]
        );
        assert_eq!(g.get_edges(3), &[Edge { to: 2, cost: d23 }]);
    }

    #[test]
    fn every_edge_has_a_mirror() {
        let data = RoadData {
            nodes: vec![
                node(1, 52.0, 21.0),
                node(2, 52.001, 21.002),
                node(3, 52.002, 21.001),
                node(4, 52.003, 21.003),
            ],
            ways: vec![way(-100, &[1, 2, 3]), way(-101, &[2, 4]), way(-102, &[3, 4])],
        };
        let g = Graph::from_road_data(&data);

        for nd in g.iter() {
            for edge in g.get_edges(nd.id) {
                let mirror = g.get_edge(edge.to, nd.id);
                assert_eq!(mirror, edge.cost, "no mirror for {} -> {}", nd.id, edge.to);

                let to = g.get_node(edge.to).unwrap();
                let expected = earth_distance(nd.lat, nd.lon, to.lat, to.lon);
                assert_almost_eq!(edge.cost, expected);
            }
        }
    }

    #[test]
    fn dangling_references_are_skipped() {
        let data = RoadData {
            nodes: vec![node(1, 0.0, 0.0), node(2, 0.0, 1.0)],
            ways: vec![way(-100, &[1, 2, 99]), way(-101, &[98, 97])],
        };
        let g = Graph::from_road_data(&data);

        assert_eq!(g.len(), 2);
        assert_eq!(g.get_edges(1).len(), 1);
        assert_eq!(g.get_edges(2).len(), 1);
        assert!(g.get_node(99).is_none());
        assert!(g.get_edge(2, 99).is_infinite());
    }

    #[test]
    fn too_short_ways_contribute_no_edges() {
        let data = RoadData {
            nodes: vec![node(1, 0.0, 0.0), node(2, 0.0, 1.0)],
            ways: vec![way(-100, &[1]), way(-101, &[])],
        };
        let g = Graph::from_road_data(&data);

        assert_eq!(g.len(), 2);
        assert!(g.get_edges(1).is_empty());
        assert!(g.get_edges(2).is_empty());
    }

    #[test]
    fn empty_input_builds_an_empty_graph() {
        let data = RoadData::default();
        let g = Graph::from_road_data(&data);

        assert_eq!(g.len(), 0);
        assert!(g.is_empty());
        assert_eq!(g.find_nearest_node(0.0, 0.0), Err(EmptyGraphError));
    }

    #[test]
    fn overlapping_ways_keep_parallel_edges() {
        let data = RoadData {
            nodes: vec![node(1, 0.0, 0.0), node(2, 0.0, 1.0)],
            ways: vec![way(-100, &[1, 2]), way(-101, &[1, 2])],
        };
        let g = Graph::from_road_data(&data);

        assert_eq!(g.get_edges(1).len(), 2);
        assert_eq!(g.get_edges(2).len(), 2);
        assert_eq!(g.get_edges(1)[0], g.get_edges(1)[1]);
    }

    #[test]
    fn duplicate_node_records_overwrite() {
        let data = RoadData {
            nodes: vec![node(1, 0.0, 0.0), node(1, 2.0, 2.0)],
            ways: vec![],
        };
        let g = Graph::from_road_data(&data);

        assert_eq!(g.len(), 1);
        assert_eq!(g.get_node(1), Some(node(1, 2.0, 2.0)));
    }

    #[test]
    fn isolated_nodes_are_kept() {
        let data = RoadData {
            nodes: vec![node(1, 0.0, 0.0), node(2, 0.0, 1.0), node(3, 50.0, 50.0)],
            ways: vec![way(-100, &[1, 2])],
        };
        let g = Graph::from_road_data(&data);

        assert_eq!(g.len(), 3);
        assert!(g.get_edges(3).is_empty());

        // An isolated node is still a valid nearest-node candidate.
        let nearest = g.find_nearest_node(49.0, 49.0).unwrap();
        assert_eq!(nearest.id, 3);
    }

    #[test]
    fn nearest_node_exact_match() {
        let data = RoadData {
            nodes: vec![node(1, 0.0, 0.0), node(2, 0.0, 1.0), node(3, 1.0, 1.0)],
            ways: vec![way(-100, &[1, 2, 3])],
        };
        let g = Graph::from_road_data(&data);

        assert_eq!(g.find_nearest_node(0.0, 1.0).unwrap().id, 2);
        assert_eq!(g.find_nearest_node(1.0, 1.0).unwrap().id, 3);
    }

    #[test]
    fn nearest_node_prefers_closer_over_lower_id() {
        let data = RoadData {
            nodes: vec![node(1, 5.0, 5.0), node(10, 0.1, 0.1)],
            ways: vec![],
        };
        let g = Graph::from_road_data(&data);

        assert_eq!(g.find_nearest_node(0.0, 0.0).unwrap().id, 10);
    }

    #[test]
    fn nearest_node_ties_break_on_lowest_id() {
        // Two nodes at the very same position - the distances are
        // bit-identical, so only the id comparator can decide.
        let data = RoadData {
            nodes: vec![node(7, 1.0, 1.0), node(2, 1.0, 1.0), node(5, 1.0, 1.0)],
            ways: vec![],
        };
        let g = Graph::from_road_data(&data);

        assert_eq!(g.find_nearest_node(1.5, 1.5).unwrap().id, 2);
    }
}
