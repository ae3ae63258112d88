use serde::Serialize;

use super::{Latitude, Longitude};

/// A row of `stops.txt`.
///
/// See <https://gtfs.org/documentation/schedule/reference/#stopstxt>.
#[derive(Debug, Clone, Serialize)]
pub struct Stop {
    pub stop_id: String,
    pub stop_name: String,
    pub stop_lat: Latitude,
    pub stop_lon: Longitude,
}
