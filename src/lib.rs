pub mod alerts;
pub mod config;
pub mod distance;
pub mod error;
pub mod exclusion;
pub mod geo_point;
pub mod table;
pub mod units;
pub mod utils;

pub use error::FilterError;
pub use exclusion::{filter, ExclusionFilter};
pub use geo_point::GeoPoint;
pub use table::{Record, Table};
pub use units::{Radius, Unit};
