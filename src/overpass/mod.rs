// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::fs::File;
use std::io;
use std::path::Path;

mod json;
mod model;

pub use model::{RoadData, Way};

/// Format of the input snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Plain [Overpass JSON](https://wiki.openstreetmap.org/wiki/Overpass_API)
    Json,

    /// Overpass JSON with [gzip](https://en.wikipedia.org/wiki/Gzip) compression
    JsonGz,

    /// Overpass JSON with [bzip2](https://en.wikipedia.org/wiki/Bzip2) compression
    JsonBz2,
}

/// Error which can occur when reading an Overpass snapshot.
///
/// Incomplete individual elements are not errors - those are skipped
/// (with a warning) when converting a response into [RoadData].
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("io: {0}")]
    Io(#[from] io::Error),

    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
}

/// Parses an Overpass API snapshot from a reader into a [RoadData]
/// as per the provided [Format].
///
/// The provided stream will be automatically wrapped in a buffered reader.
pub fn road_data_from_io<R: io::Read>(format: Format, reader: R) -> Result<RoadData, Error> {
    match format {
        Format::Json => {
            let b = io::BufReader::new(reader);
            Ok(json::parse_from_io(b)?)
        }

        Format::JsonGz => {
            let d = flate2::read::MultiGzDecoder::new(reader);
            let b = io::BufReader::new(d);
            Ok(json::parse_from_io(b)?)
        }

        Format::JsonBz2 => {
            let d = bzip2::read::MultiBzDecoder::new(reader);
            let b = io::BufReader::new(d);
            Ok(json::parse_from_io(b)?)
        }
    }
}

/// Parses an Overpass API snapshot from a file at the provided path
/// into a [RoadData] as per the provided [Format].
pub fn road_data_from_file<P: AsRef<Path>>(format: Format, path: P) -> Result<RoadData, Error> {
    let f = File::open(path)?;
    road_data_from_io(format, f)
}

/// Parses an Overpass API snapshot from a static buffer into a [RoadData]
/// as per the provided [Format].
pub fn road_data_from_buffer(format: Format, data: &[u8]) -> Result<RoadData, Error> {
    if format == Format::Json {
        // Fast path is available for in-memory JSON data
        Ok(json::parse_from_buffer(data)?)
    } else {
        // Wrap the buffer in a cursor and use the IO path
        road_data_from_io(format, io::Cursor::new(data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check_simple_snapshot(data: &RoadData) {
        assert_eq!(data.nodes.len(), 5);
        assert_eq!(data.ways.len(), 2);

        assert_eq!(data.nodes[0].id, 1);
        assert_eq!(data.nodes[0].lat, 52.2297);
        assert_eq!(data.nodes[0].lon, 21.0122);

        assert_eq!(data.ways[0].id, 100);
        assert_eq!(data.ways[0].nodes, vec![1, 2, 3]);
        assert_eq!(data.ways[0].tags["highway"], "residential");
        assert_eq!(data.ways[1].id, 101);
        assert_eq!(data.ways[1].nodes, vec![3, 4]);
    }

    #[test]
    fn read_snapshot_json() -> Result<(), Error> {
        const DATA: &[u8] = include_bytes!("test_fixtures/simple.json");
        check_simple_snapshot(&road_data_from_buffer(Format::Json, DATA)?);
        Ok(())
    }

    #[test]
    fn read_snapshot_gz() -> Result<(), Error> {
        const DATA: &[u8] = include_bytes!("test_fixtures/simple.json.gz");
        check_simple_snapshot(&road_data_from_buffer(Format::JsonGz, DATA)?);
        Ok(())
    }

    #[test]
    fn read_snapshot_bz2() -> Result<(), Error> {
        const DATA: &[u8] = include_bytes!("test_fixtures/simple.json.bz2");
        check_simple_snapshot(&road_data_from_buffer(Format::JsonBz2, DATA)?);
        Ok(())
    }
}
