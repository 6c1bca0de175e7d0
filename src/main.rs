use std::error::Error;
use std::path::{Path, PathBuf};

use clap::Parser;

use overpath::overpass;

#[derive(Debug, thiserror::Error)]
#[error("{0}: {1}")]
struct SnapshotLoadError(PathBuf, #[source] overpass::Error);

#[derive(Debug, thiserror::Error)]
#[error("no route between the given points")]
struct NoRouteError;

#[derive(Parser)]
struct Cli {
    /// The path to a saved Overpass response (.json, .json.gz or .json.bz2)
    snapshot: PathBuf,

    /// Latitude of the start point
    start_lat: f64,

    /// Longitude of the start point
    start_lon: f64,

    /// Latitude of the end point
    end_lat: f64,

    /// Longitude of the end point
    end_lon: f64,
}

pub fn main() -> Result<(), Box<dyn Error>> {
    colog::init();
    let cli = Cli::parse();

    let g = load_graph(&cli.snapshot)?;
    log::info!("loaded {} nodes from {}", g.len(), cli.snapshot.display());

    let start = g.find_nearest_node(cli.start_lat, cli.start_lon)?;
    let end = g.find_nearest_node(cli.end_lat, cli.end_lon)?;
    log::info!("routing from node {} to node {}", start.id, end.id);

    let route = overpath::find_path(&g, start.id, end.id, overpath::DEFAULT_STEP_LIMIT)?;
    if !route.is_found() {
        return Err(NoRouteError.into());
    }
    log::info!(
        "found a {:.3} km route over {} nodes",
        route.distance,
        route.waypoints.len()
    );

    println!("{{");
    println!("  \"type\": \"FeatureCollection\",");
    println!("  \"features\": [");
    println!("    {{");
    println!("      \"type\": \"Feature\",");
    println!("      \"properties\": {{\"distance_km\": {}}},", route.distance);

    println!("      \"geometry\": {{");
    println!("        \"type\": \"LineString\",");
    println!("        \"coordinates\": [");

    let mut nodes = route.waypoints.iter().peekable();
    while let Some(node) = nodes.next() {
        let suffix = if nodes.peek().is_some() { "," } else { "" };
        println!("          [{}, {}]{}", node.lon, node.lat, suffix);
    }

    println!("        ]");
    println!("      }}");
    println!("    }}");
    println!("  ]");
    println!("}}");

    Ok(())
}

fn guess_format(path: &Path) -> overpass::Format {
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
    if name.ends_with(".gz") {
        overpass::Format::JsonGz
    } else if name.ends_with(".bz2") {
        overpass::Format::JsonBz2
    } else {
        overpass::Format::Json
    }
}

fn load_graph<P: AsRef<Path>>(path: P) -> Result<overpath::Graph, SnapshotLoadError> {
    let path = path.as_ref();
    match overpass::road_data_from_file(guess_format(path), path) {
        Ok(data) => Ok(overpath::Graph::from_road_data(&data)),
        Err(e) => Err(SnapshotLoadError(PathBuf::from(path), e)),
    }
}
