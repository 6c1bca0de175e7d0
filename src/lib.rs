// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

//! Shortest-path routing over [Overpass API](https://wiki.openstreetmap.org/wiki/Overpass_API)
//! road-network snapshots.
//!
//! A saved Overpass JSON response is converted into a standard weighted
//! undirected graph, with every way segment weighted by its great-circle
//! length, and A* finds shortest paths between graph nodes. Every street
//! is assumed walkable in both directions; tags are preserved on the way
//! level, but do not influence the graph.
//!
//! # Example
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let data = overpath::overpass::road_data_from_file(
//!     overpath::overpass::Format::Json,
//!     "path/to/snapshot.json",
//! )?;
//! let g = overpath::Graph::from_road_data(&data);
//!
//! let start_node = g.find_nearest_node(52.2297, 21.0122)?;
//! let end_node = g.find_nearest_node(52.2305, 21.0141)?;
//! let route = overpath::find_path(&g, start_node.id, end_node.id, overpath::DEFAULT_STEP_LIMIT)?;
//!
//! if route.is_found() {
//!     println!("{:.3} km over {} nodes", route.distance, route.waypoints.len());
//! } else {
//!     println!("no route");
//! }
//! # Ok(())
//! # }
//! ```

mod astar;
mod distance;
mod graph;
mod kd;
pub mod overpass;

pub use astar::{find_path, Route, SearchError, DEFAULT_STEP_LIMIT};
pub use distance::earth_distance;
pub use graph::{EmptyGraphError, Graph};
pub use kd::KDTree;

/// Represents an element of the [Graph]: an OpenStreetMap node
/// with its WGS84 position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Node {
    pub id: i64,
    pub lat: f64,
    pub lon: f64,
}

/// Represents a connection from a specific [Node] to the node `to`.
///
/// `cost` is the traversal cost in kilometers and must not be smaller
/// than the crow-flies distance between the two nodes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub to: i64,
    pub cost: f64,
}
