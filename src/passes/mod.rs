//! The two GeoJSON generation passes and the runner that executes them side
//! by side over the same read-only feed.

pub mod routes;
pub mod stops;

use std::path::{Path, PathBuf};
use std::thread;
use std::time::Instant;

use crate::config::Config;
use crate::error::Error;
use crate::geojson::FeatureCollection;
use crate::gtfs::{RawGtfs, Row};

pub use routes::route_features;
pub use stops::stop_features;

/// Outcome of a pass whose collection was written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassReport {
    pub path: PathBuf,
    pub features: usize,
}

/// Results of the stop pass and the route pass.
#[derive(Debug)]
pub struct Generation {
    pub stops: Result<PassReport, Error>,
    pub routes: Result<PassReport, Error>,
}

impl Generation {
    pub fn is_success(&self) -> bool {
        self.stops.is_ok() && self.routes.is_ok()
    }
}

/// Runs both passes on their own threads and waits for both. A failing or
/// panicking pass does not stop the other one.
pub fn generate(gtfs: &RawGtfs, config: &Config) -> Generation {
    thread::scope(|s| {
        let stops = s.spawn(|| {
            run_pass("stop", &config.stops_output(), config.pretty, || {
                stop_features(gtfs, config)
            })
        });
        let routes = s.spawn(|| {
            run_pass("route", &config.routes_output(), config.pretty, || {
                route_features(gtfs, config)
            })
        });

        Generation {
            stops: stops
                .join()
                .unwrap_or(Err(Error::TaskPanicked("Stop GeoJSON"))),
            routes: routes
                .join()
                .unwrap_or(Err(Error::TaskPanicked("Route GeoJSON"))),
        }
    })
}

fn run_pass<F>(name: &str, path: &Path, pretty: bool, build: F) -> Result<PassReport, Error>
where
    F: FnOnce() -> Result<FeatureCollection, Error>,
{
    let start = Instant::now();
    let collection = build()?;
    log::debug!(
        "{} pass built {} features in {}ms",
        name,
        collection.len(),
        start.elapsed().as_millis()
    );

    collection.write(path, pretty)?;
    println!("Created {}", path.display());
    Ok(PassReport {
        path: path.to_path_buf(),
        features: collection.len(),
    })
}

/// Prints how far a pass has got through its outer table.
pub(crate) struct Progress {
    total: usize,
    enabled: bool,
}

impl Progress {
    pub(crate) fn new(total: usize, enabled: bool) -> Progress {
        Progress { total, enabled }
    }

    /// `done` is the number of outer rows finished so far.
    pub(crate) fn report(&self, done: usize, label: &str) {
        if self.enabled && self.total > 0 {
            println!(
                "{} {} complete -> {} percent complete",
                done,
                label,
                done * 100 / self.total
            );
        }
    }
}

/// Value of an optional column; `None` when the column or the value is missing.
pub(crate) fn field(row: &Row, column: Option<usize>) -> Option<&str> {
    column.and_then(|c| row.get(c))
}

/// Like [`field`], rendering anything missing as an empty string.
pub(crate) fn text(row: &Row, column: Option<usize>) -> &str {
    field(row, column).unwrap_or("")
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::gtfs::{GtfsTable, RawGtfs};

    pub(crate) fn table(name: &str, text: &str) -> GtfsTable {
        GtfsTable::from_reader(name, text.as_bytes()).expect("fixture table loads")
    }

    pub(crate) fn feed(
        stops: &str,
        stop_times: &str,
        routes: &str,
        trips: &str,
        shapes: &str,
    ) -> RawGtfs {
        RawGtfs {
            stops: table("stops.txt", stops),
            stop_times: table("stop_times.txt", stop_times),
            routes: table("routes.txt", routes),
            trips: table("trips.txt", trips),
            shapes: table("shapes.txt", shapes),
        }
    }
}
