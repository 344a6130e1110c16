use clap::Parser;
use std::error::Error as StdError;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use gtfs_geojson::config::{
    DEFAULT_GTFS_PATH, DEFAULT_OUTPUT_DIR, DEFAULT_ROUTES_FILE, DEFAULT_STOPS_FILE,
};
use gtfs_geojson::gtfs::{JoinStrategy, RawGtfs, RouteType, RouteTypeFilter};
use gtfs_geojson::{passes, Config};

/// Converts a GTFS feed into stop and route GeoJSON collections.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Feed directory, zip archive or sqlite3 database
    #[arg(long, default_value = DEFAULT_GTFS_PATH)]
    gtfs_path: PathBuf,

    #[arg(long, default_value = DEFAULT_OUTPUT_DIR)]
    output_dir: PathBuf,

    #[arg(long, default_value = DEFAULT_STOPS_FILE)]
    stops_file: String,

    #[arg(long, default_value = DEFAULT_ROUTES_FILE)]
    routes_file: String,

    /// Comma-separated list of route types to keep in the stop output
    #[arg(long, default_value = "")]
    route_types: RouteTypeFilter,

    /// Join tables by scanning instead of hashing the key columns
    #[arg(long)]
    scan_joins: bool,

    #[arg(long)]
    pretty: bool,

    /// Don't print per-row progress
    #[arg(long)]
    quiet: bool,

    /// Print the known route types and exit
    #[arg(long)]
    list_route_types: bool,
}

impl From<Args> for Config {
    fn from(args: Args) -> Self {
        Config {
            gtfs_path: args.gtfs_path,
            output_dir: args.output_dir,
            stops_file: args.stops_file,
            routes_file: args.routes_file,
            route_types: args.route_types,
            join_strategy: if args.scan_joins {
                JoinStrategy::Scan
            } else {
                JoinStrategy::Indexed
            },
            pretty: args.pretty,
            progress: !args.quiet,
        }
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    if args.list_route_types {
        for route_type in RouteType::ALL {
            println!("{:>2}  {}", route_type.code(), route_type.description());
        }
        return ExitCode::SUCCESS;
    }

    let config = Config::from(args);

    println!("Reading GTFS from path: {}", config.gtfs_path.display());
    let start = Instant::now();
    let gtfs = match RawGtfs::from_path(&config.gtfs_path) {
        Ok(gtfs) => gtfs,
        Err(e) => {
            log::error!("{}", describe(&e));
            return ExitCode::FAILURE;
        }
    };
    log::debug!("GTFS loaded in {}ms", start.elapsed().as_millis());
    gtfs.print_stats();

    let generation = passes::generate(&gtfs, &config);
    for result in [&generation.stops, &generation.routes] {
        match result {
            Ok(report) => log::debug!(
                "{} features written to {}",
                report.features,
                report.path.display()
            ),
            Err(e) => log::error!("{}", describe(e)),
        }
    }

    println!("Both GeoJSON generation tasks are complete.");
    if generation.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

// Error message followed by its sources, e.g. "impossible to read 'stops.txt': ..."
fn describe(err: &dyn StdError) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(e) = source {
        message.push_str(": ");
        message.push_str(&e.to_string());
        source = e.source();
    }
    message
}
