// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::collections::HashMap;

use crate::Node;

/// Represents an [OSM way](https://wiki.openstreetmap.org/wiki/Way),
/// an ordered list of nodes forming a street or another linear feature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Way {
    pub id: i64,
    pub nodes: Vec<i64>,
    pub tags: HashMap<String, String>,
}

/// All road features extracted from an Overpass snapshot.
///
/// References between ways and nodes are not checked at this level:
/// a [Way] may refer to nodes outside of `nodes`, and
/// [Graph::from_road_data](crate::Graph::from_road_data) will skip
/// the segments it can't resolve.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RoadData {
    pub nodes: Vec<Node>,
    pub ways: Vec<Way>,
}
