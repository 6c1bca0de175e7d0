// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::collections::HashMap;
use std::io;

use serde::Deserialize;

use super::model::{RoadData, Way};
use crate::Node;

/// Top-level shape of an [Overpass API](https://wiki.openstreetmap.org/wiki/Overpass_API)
/// response. Metadata fields (`version`, `generator`, `osm3s`) are ignored.
#[derive(Debug, Deserialize)]
struct Response {
    #[serde(default)]
    elements: Vec<Element>,
}

/// A single element of an Overpass response, before validation.
/// Every field is optional at this level, so that one incomplete
/// record can't fail the whole batch.
#[derive(Debug, Deserialize)]
struct Element {
    #[serde(rename = "type")]
    kind: Option<String>,
    id: Option<i64>,
    lat: Option<f64>,
    lon: Option<f64>,
    nodes: Option<Vec<i64>>,
    tags: Option<HashMap<String, String>>,
}

/// Parses a complete Overpass JSON response from a reader.
///
/// The reader is consumed whole - wrap it in a [io::BufReader] if it
/// does not buffer already.
pub(super) fn parse_from_io<R: io::Read>(reader: R) -> Result<RoadData, serde_json::Error> {
    serde_json::from_reader(reader).map(road_data)
}

/// Parses a complete Overpass JSON response from an in-memory buffer.
pub(super) fn parse_from_buffer(data: &[u8]) -> Result<RoadData, serde_json::Error> {
    serde_json::from_slice(data).map(road_data)
}

/// Validates every element of a [Response] and collects the usable ones
/// into a [RoadData]. Incomplete nodes and ways are skipped with a warning,
/// relations are ignored, as they carry no road geometry of their own.
fn road_data(response: Response) -> RoadData {
    let mut data = RoadData::default();

    for mut element in response.elements {
        // The kind has to be detached, as the "way" arm consumes the element
        let kind = element.kind.take();
        match kind.as_deref() {
            Some("node") => match node_of(&element) {
                Some(node) => data.nodes.push(node),
                None => log::warn!(
                    "skipping node {:?} with missing or non-finite attributes",
                    element.id,
                ),
            },

            Some("way") => {
                let id = element.id;
                match way_of(element) {
                    Some(way) => data.ways.push(way),
                    None => log::warn!("skipping way {:?} with missing attributes", id),
                }
            }

            Some("relation") => {}

            Some(other) => log::debug!("ignoring element of type {:?}", other),

            None => log::warn!("skipping element {:?} without a type", element.id),
        }
    }

    data
}

fn node_of(element: &Element) -> Option<Node> {
    Some(Node {
        id: element.id?,
        lat: element.lat.filter(|v| v.is_finite())?,
        lon: element.lon.filter(|v| v.is_finite())?,
    })
}

fn way_of(element: Element) -> Option<Way> {
    Some(Way {
        id: element.id?,
        nodes: element.nodes?,
        tags: element.tags.unwrap_or_default(),
    })
}
