use crate::config::Config;
use crate::error::Error;
use crate::geojson::{coerce_coordinate, Feature, FeatureCollection};
use crate::gtfs::{RawGtfs, Relation};

use super::{field, text, Progress};

/// Builds one point feature per distinct (stop, route) pairing reachable
/// through stop_times and trips.
///
/// For every stop, its stop_times are visited in table order. A stop_time
/// whose trip or route cannot be found is skipped. When the route type filter
/// is active, the first pairing with a route outside the allowlist abandons
/// the remaining stop_times of that stop.
pub fn stop_features(gtfs: &RawGtfs, config: &Config) -> Result<FeatureCollection, Error> {
    let strategy = config.join_strategy;

    let stops = &gtfs.stops;
    let stop_id = stops.require_column("stop_id")?;
    let stop_name = stops.column("stop_name");
    let stop_lat = stops.column("stop_lat");
    let stop_lon = stops.column("stop_lon");

    let stop_times = Relation::on(&gtfs.stop_times, "stop_id", strategy)?;
    let stop_time_trip = gtfs.stop_times.require_column("trip_id")?;

    let trips = Relation::on(&gtfs.trips, "trip_id", strategy)?;
    let trip_route = gtfs.trips.require_column("route_id")?;

    if gtfs.routes.column("trip_id").is_some() {
        log::warn!(
            "{} has a trip_id column; routes are matched on route_id instead",
            gtfs.routes.name()
        );
    }
    let routes = Relation::on(&gtfs.routes, "route_id", strategy)?;
    let route_id = gtfs.routes.column("route_id");
    let route_name = gtfs.routes.column("route_long_name");
    let route_color = gtfs.routes.column("route_color");
    let route_type = gtfs.routes.column("route_type");

    let progress = Progress::new(stops.len(), config.progress);
    let mut collection = FeatureCollection::new();

    for (n, stop) in stops.rows().iter().enumerate() {
        let id = stop.value(stop_id);
        for stop_time in stop_times.matching(id) {
            let Some(trip) = trips.first(stop_time.value(stop_time_trip)) else {
                continue;
            };
            let Some(route) = routes.first(trip.value(trip_route)) else {
                continue;
            };
            if !config.route_types.allows(text(route, route_type)) {
                break;
            }

            let position = [
                coerce_coordinate(field(stop, stop_lat)),
                coerce_coordinate(field(stop, stop_lon)),
            ];
            collection.push(Feature::point(
                position,
                [
                    ("stop_name", text(stop, stop_name)),
                    ("stop_id", id),
                    ("route_long_name", text(route, route_name)),
                    ("route_id", text(route, route_id)),
                    ("route_color", text(route, route_color)),
                ],
            ));
        }
        progress.report(n + 1, text(stop, stop_name));
    }

    Ok(collection)
}
