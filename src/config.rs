use std::path::PathBuf;

use crate::gtfs::{JoinStrategy, RouteTypeFilter};

pub const DEFAULT_GTFS_PATH: &str = "GTFS";
pub const DEFAULT_OUTPUT_DIR: &str = "output";
pub const DEFAULT_STOPS_FILE: &str = "map-stops-data.geojson";
pub const DEFAULT_ROUTES_FILE: &str = "map-routes-data.geojson";

/// Settings for one conversion run.
#[derive(Debug, Clone)]
pub struct Config {
    /// Feed directory, zip archive, or sqlite3 database
    pub gtfs_path: PathBuf,
    pub output_dir: PathBuf,
    pub stops_file: String,
    pub routes_file: String,
    /// Route types kept by the stop pass; empty keeps all
    pub route_types: RouteTypeFilter,
    pub join_strategy: JoinStrategy,
    pub pretty: bool,
    /// Print a progress line after every outer row of each pass
    pub progress: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            gtfs_path: PathBuf::from(DEFAULT_GTFS_PATH),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            stops_file: DEFAULT_STOPS_FILE.to_owned(),
            routes_file: DEFAULT_ROUTES_FILE.to_owned(),
            route_types: RouteTypeFilter::default(),
            join_strategy: JoinStrategy::default(),
            pretty: false,
            progress: true,
        }
    }
}

impl Config {
    pub fn stops_output(&self) -> PathBuf {
        self.output_dir.join(&self.stops_file)
    }

    pub fn routes_output(&self) -> PathBuf {
        self.output_dir.join(&self.routes_file)
    }
}
