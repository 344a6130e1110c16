pub mod error;
pub mod raw_gtfs;
pub mod route_type;
pub mod table;

pub use raw_gtfs::RawGtfs;
pub use route_type::{RouteType, RouteTypeFilter};
pub use table::{GtfsTable, JoinStrategy, Relation, Row};
