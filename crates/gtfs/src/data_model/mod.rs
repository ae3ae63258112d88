pub mod agency;
pub mod calendar;
pub mod routes;
pub mod shapes;
pub mod stop_times;
pub mod stops;
pub mod translations;
pub mod trips;

/// Generated from `protobuf/gtfs-realtime.proto` at build time.
///
/// See <https://gtfs.org/documentation/realtime/reference/> for the field
/// semantics.
pub mod realtime {
    #![allow(clippy::all)]
    include!(concat!(env!("OUT_DIR"), "/protobuf/transit_realtime.rs"));
}

pub type Latitude = f64;
pub type Longitude = f64;
