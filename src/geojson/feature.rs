use serde::Serialize;
use std::collections::BTreeMap;

/// A `[lat, lon]` pair, in that order.
pub type Position = [f64; 2];

pub type Properties = BTreeMap<String, String>;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "coordinates")]
pub enum Geometry {
    Point(Position),
    MultiLineString(Vec<Vec<Position>>),
}

impl Geometry {
    fn kind(&self) -> &'static str {
        match self {
            Geometry::Point(_) => "Point",
            Geometry::MultiLineString(_) => "MultiLineString",
        }
    }

    fn lines(&self) -> Vec<Vec<Position>> {
        match self {
            Geometry::Point(position) => vec![vec![*position]],
            Geometry::MultiLineString(lines) => lines.clone(),
        }
    }
}

/// A GeoJSON feature with a flat string property bag.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct Feature {
    pub geometry: Geometry,
    pub properties: Properties,
}

impl Feature {
    pub fn point<'a, I>(position: Position, properties: I) -> Feature
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        Feature {
            geometry: Geometry::Point(position),
            properties: collect_properties(properties),
        }
    }

    pub fn multi_line_string<'a, I>(lines: Vec<Vec<Position>>, properties: I) -> Feature
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        Feature {
            geometry: Geometry::MultiLineString(lines),
            properties: collect_properties(properties),
        }
    }

    pub fn property(&self, name: &str) -> Option<&str> {
        self.properties.get(name).map(String::as_str)
    }

    /// Hashable form of the feature. Two features have the same key exactly
    /// when their geometry type, coordinates and properties are equal.
    pub fn key(&self) -> FeatureKey {
        FeatureKey {
            kind: self.geometry.kind(),
            coordinates: self
                .geometry
                .lines()
                .into_iter()
                .map(|line| {
                    line.into_iter()
                        .map(|[lat, lon]| [coordinate_bits(lat), coordinate_bits(lon)])
                        .collect()
                })
                .collect(),
            properties: self.properties.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FeatureKey {
    kind: &'static str,
    coordinates: Vec<Vec<[u64; 2]>>,
    properties: Properties,
}

fn collect_properties<'a, I>(properties: I) -> Properties
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    properties
        .into_iter()
        .map(|(name, value)| (name.to_owned(), value.to_owned()))
        .collect()
}

// 0.0 and -0.0 compare equal, so they share a key.
fn coordinate_bits(value: f64) -> u64 {
    if value == 0.0 {
        0.0f64.to_bits()
    } else {
        value.to_bits()
    }
}

/// Turns a raw latitude or longitude field into a number.
///
/// A missing field reads as `"0.0"`; a field that does not parse as a finite
/// float becomes `0.0`. `NaN` and infinities have no JSON number form, so they
/// are treated as unparsable. Never fails.
pub fn coerce_coordinate(raw: Option<&str>) -> f64 {
    raw.unwrap_or("0.0")
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(Some("10.0"), 10.0)]
    #[case(Some("-79.3832"), -79.3832)]
    #[case(None, 0.0)]
    #[case(Some("abc"), 0.0)]
    #[case(Some(""), 0.0)]
    #[case(Some(" 10.0"), 0.0)]
    #[case(Some("NaN"), 0.0)]
    #[case(Some("inf"), 0.0)]
    #[case(Some("-infinity"), 0.0)]
    fn coerces_coordinates(#[case] raw: Option<&str>, #[case] expected: f64) {
        assert_eq!(coerce_coordinate(raw), expected);
    }

    #[test]
    fn point_serializes_as_geojson() {
        let feature = Feature::point([10.0, 20.0], [("stop_id", "S1"), ("stop_name", "Main")]);
        let value = serde_json::to_value(&feature).expect("serializes");
        assert_eq!(
            value,
            json!({
                "type": "Feature",
                "geometry": {"type": "Point", "coordinates": [10.0, 20.0]},
                "properties": {"stop_id": "S1", "stop_name": "Main"}
            })
        );
    }

    #[test]
    fn non_finite_fields_serialize_as_numbers() {
        let position = [coerce_coordinate(Some("NaN")), coerce_coordinate(Some("inf"))];
        let feature = Feature::point(position, [("stop_id", "S1")]);
        let value = serde_json::to_value(&feature).expect("serializes");
        assert_eq!(value["geometry"]["coordinates"], json!([0.0, 0.0]));
    }

    #[test]
    fn multi_line_string_serializes_as_geojson() {
        let feature = Feature::multi_line_string(
            vec![vec![[1.0, 2.0], [3.0, 4.0]]],
            [("shape_id", "SH1")],
        );
        let value = serde_json::to_value(&feature).expect("serializes");
        assert_eq!(
            value["geometry"],
            json!({"type": "MultiLineString", "coordinates": [[[1.0, 2.0], [3.0, 4.0]]]})
        );
    }

    #[test]
    fn keys_follow_structural_equality() {
        let a = Feature::point([1.0, 2.0], [("stop_id", "S1")]);
        let b = Feature::point([1.0, 2.0], [("stop_id", "S1")]);
        let other_props = Feature::point([1.0, 2.0], [("stop_id", "S2")]);
        let other_coords = Feature::point([1.0, 2.5], [("stop_id", "S1")]);
        let other_kind = Feature::multi_line_string(vec![vec![[1.0, 2.0]]], [("stop_id", "S1")]);

        assert_eq!(a.key(), b.key());
        assert_ne!(a.key(), other_props.key());
        assert_ne!(a.key(), other_coords.key());
        assert_ne!(a.key(), other_kind.key());
        assert_eq!(
            Feature::point([0.0, 0.0], [("stop_id", "S1")]).key(),
            Feature::point([-0.0, 0.0], [("stop_id", "S1")]).key()
        );
    }
}
