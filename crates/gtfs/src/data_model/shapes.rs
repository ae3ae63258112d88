use serde::Serialize;

use super::{Latitude, Longitude};

/// A row of `shapes.txt`, one point of a route's decoded polyline.
#[derive(Debug, Clone, Serialize)]
pub struct ShapePoint {
    pub shape_id: String,
    pub shape_pt_lat: Latitude,
    pub shape_pt_lon: Longitude,
    pub shape_pt_sequence: u32,
}
