pub mod config;
pub mod error;
pub mod geojson;
pub mod gtfs;
pub mod passes;

pub use config::Config;
pub use error::Error;
