use std::collections::HashMap;

use crate::config::Config;
use crate::error::Error;
use crate::geojson::{coerce_coordinate, Feature, FeatureCollection, Position};
use crate::gtfs::{RawGtfs, Relation};

use super::{field, text, Progress};

/// Builds one multi-line feature per distinct (route, shape) pairing.
///
/// Every trip of a route contributes the points of its shape, in shapes.txt
/// order, as a single line. Trips sharing a shape produce identical features,
/// which collapse into one.
pub fn route_features(gtfs: &RawGtfs, config: &Config) -> Result<FeatureCollection, Error> {
    let strategy = config.join_strategy;

    let routes = &gtfs.routes;
    let route_id = routes.require_column("route_id")?;
    let route_name = routes.column("route_long_name");
    let route_color = routes.column("route_color");

    let trips = Relation::on(&gtfs.trips, "route_id", strategy)?;
    let trip_shape = gtfs.trips.require_column("shape_id")?;

    let shapes = Relation::on(&gtfs.shapes, "shape_id", strategy)?;
    let shape_lat = gtfs.shapes.column("shape_pt_lat");
    let shape_lon = gtfs.shapes.column("shape_pt_lon");

    // Many trips share a shape, so each line is only walked once
    let mut lines: HashMap<&str, Vec<Position>> = HashMap::new();

    let progress = Progress::new(routes.len(), config.progress);
    let mut collection = FeatureCollection::new();

    for (n, route) in routes.rows().iter().enumerate() {
        let id = route.value(route_id);
        for trip in trips.matching(id) {
            let shape_id = trip.value(trip_shape);
            let line = lines.entry(shape_id).or_insert_with(|| {
                shapes
                    .matching(shape_id)
                    .into_iter()
                    .map(|point| {
                        [
                            coerce_coordinate(field(point, shape_lat)),
                            coerce_coordinate(field(point, shape_lon)),
                        ]
                    })
                    .collect()
            });

            collection.push(Feature::multi_line_string(
                vec![line.clone()],
                [
                    ("shape_id", shape_id),
                    ("route_color", text(route, route_color)),
                    ("route_long_name", text(route, route_name)),
                    ("route_id", id),
                ],
            ));
        }
        progress.report(n + 1, text(route, route_name));
    }

    Ok(collection)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geojson::Geometry;
    use crate::gtfs::JoinStrategy;
    use crate::passes::test_support::feed;
    use rstest::rstest;

    const STOPS: &str = "stop_id,stop_name,stop_lat,stop_lon\n";
    const STOP_TIMES: &str = "trip_id,stop_id\n";
    const ROUTES: &str = "route_id,route_long_name,route_color,route_type\n\
        R1,Blue Line,0000FF,3\n\
        R2,Red Line,FF0000,1\n";
    const SHAPES: &str = "shape_id,shape_pt_lat,shape_pt_lon,shape_pt_sequence\n\
        SH1,10.0,20.0,1\n\
        SH2,30.0,40.0,1\n\
        SH1,11.0,21.0,2\n\
        SH1,12.0,22.0,3\n";

    fn config(join_strategy: JoinStrategy) -> Config {
        Config {
            join_strategy,
            progress: false,
            ..Config::default()
        }
    }

    #[rstest]
    #[case(JoinStrategy::Indexed)]
    #[case(JoinStrategy::Scan)]
    fn trips_sharing_a_shape_yield_one_feature(#[case] strategy: JoinStrategy) {
        let trips = "route_id,trip_id,shape_id\nR1,T1,SH1\nR1,T2,SH1\n";
        let gtfs = feed(STOPS, STOP_TIMES, ROUTES, trips, SHAPES);
        let collection = route_features(&gtfs, &config(strategy)).expect("pass runs");

        assert_eq!(collection.len(), 1);
        let feature = &collection.features()[0];
        assert_eq!(
            feature.geometry,
            Geometry::MultiLineString(vec![vec![[10.0, 20.0], [11.0, 21.0], [12.0, 22.0]]])
        );
        assert_eq!(feature.property("shape_id"), Some("SH1"));
        assert_eq!(feature.property("route_id"), Some("R1"));
        assert_eq!(feature.property("route_long_name"), Some("Blue Line"));
        assert_eq!(feature.property("route_color"), Some("0000FF"));
    }

    #[test]
    fn each_route_shape_pairing_is_kept_in_route_order() {
        let trips = "route_id,trip_id,shape_id\nR2,T3,SH2\nR1,T1,SH1\nR1,T2,SH2\nR2,T4,SH2\n";
        let gtfs = feed(STOPS, STOP_TIMES, ROUTES, trips, SHAPES);
        let collection = route_features(&gtfs, &config(JoinStrategy::Indexed)).expect("pass runs");

        let pairs: Vec<(&str, &str)> = collection
            .features()
            .iter()
            .filter_map(|f| Some((f.property("route_id")?, f.property("shape_id")?)))
            .collect();
        assert_eq!(pairs, vec![("R1", "SH1"), ("R1", "SH2"), ("R2", "SH2")]);
    }

    #[test]
    fn unknown_shape_yields_an_empty_line() {
        let trips = "route_id,trip_id,shape_id\nR1,T1,SH9\n";
        let gtfs = feed(STOPS, STOP_TIMES, ROUTES, trips, SHAPES);
        let collection = route_features(&gtfs, &config(JoinStrategy::Indexed)).expect("pass runs");
        assert_eq!(
            collection.features()[0].geometry,
            Geometry::MultiLineString(vec![vec![]])
        );
    }

    #[test]
    fn bad_shape_points_fall_back_to_zero() {
        let shapes = "shape_id,shape_pt_lat,shape_pt_lon\nSH1,x,20.0\nSH1\n";
        let trips = "route_id,trip_id,shape_id\nR1,T1,SH1\n";
        let gtfs = feed(STOPS, STOP_TIMES, ROUTES, trips, shapes);
        let collection = route_features(&gtfs, &config(JoinStrategy::Indexed)).expect("pass runs");
        assert_eq!(
            collection.features()[0].geometry,
            Geometry::MultiLineString(vec![vec![[0.0, 20.0], [0.0, 0.0]]])
        );
    }

    #[test]
    fn routes_without_trips_emit_nothing() {
        let trips = "route_id,trip_id,shape_id\n";
        let gtfs = feed(STOPS, STOP_TIMES, ROUTES, trips, SHAPES);
        let collection = route_features(&gtfs, &config(JoinStrategy::Indexed)).expect("pass runs");
        assert!(collection.is_empty());
    }
}
