use serde_repr::Serialize_repr;
use serde::Serialize;

/// See <https://gtfs.org/documentation/schedule/reference/#routestxt>,
/// `route_type`.
#[derive(Debug, Clone, Copy, Serialize_repr)]
#[repr(u8)]
pub enum RouteType {
    Tram = 0,
    Bus = 3,
}

/// A row of `routes.txt`.
#[derive(Debug, Clone, Serialize)]
pub struct Route {
    pub route_id: String,
    pub agency_id: String,
    pub route_short_name: String,
    pub route_long_name: String,
    pub route_type: RouteType,
}
