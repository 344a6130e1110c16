pub mod collection;
pub mod feature;

pub use collection::FeatureCollection;
pub use feature::{coerce_coordinate, Feature, Geometry, Position, Properties};
