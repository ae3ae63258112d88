use serde::Serialize;

/// A row of `trips.txt`.
#[derive(Debug, Clone, Serialize)]
pub struct Trip {
    pub route_id: String,
    pub service_id: String,
    pub trip_id: String,
    pub shape_id: Option<String>,
}
