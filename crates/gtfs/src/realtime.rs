use prost::Message;

pub use crate::data_model::realtime::{
    trip_update, Alert, FeedEntity, FeedHeader, FeedMessage, Position, TripDescriptor,
    TripUpdate, VehicleDescriptor, VehiclePosition,
};

pub const GTFS_REALTIME_VERSION: &str = "2.0";

pub fn new_header(timestamp: i64) -> FeedHeader {
    FeedHeader {
        gtfs_realtime_version: GTFS_REALTIME_VERSION.to_owned(),
        incrementality: Some(feed_header::Incrementality::FullDataset as i32),
        timestamp: Some(timestamp as u64),
    }
}

pub mod feed_header {
    pub use crate::data_model::realtime::feed_header::Incrementality;
}

pub fn encode(message: &FeedMessage) -> Vec<u8> {
    message.encode_to_vec()
}

pub fn decode(bytes: &[u8]) -> Result<FeedMessage, prost::DecodeError> {
    FeedMessage::decode(bytes)
}

/// One upstream vehicle's matched stop, ready to become a `StopTimeUpdate`.
#[derive(Debug, Clone)]
pub struct StopMatch {
    pub stop_id: String,
    pub scheduled_arrival: Option<i64>,
    pub actual_arrival: Option<i64>,
    pub scheduled_departure: Option<i64>,
    pub actual_departure: Option<i64>,
}

/// The data needed to build one `FeedEntity` for a single vehicle serving a
/// single trip.
#[derive(Debug, Clone)]
pub struct VehicleEntityInput {
    pub vehicle_id: String,
    pub vehicle_label: Option<String>,
    pub trip_id: String,
    pub route_id: String,
    pub stops: Vec<StopMatch>,
    pub latitude: f64,
    pub longitude: f64,
    pub bearing: Option<f64>,
    pub position_timestamp: i64,
}

/// Builds the `FeedEntity` for one vehicle, following the field-emission
/// rules of the original transformer: a stop with no scheduled arrival is
/// dropped entirely, and a delay is only set once an actual time has been
/// reported.
pub fn build_vehicle_entity(input: VehicleEntityInput) -> FeedEntity {
    let trip = TripDescriptor {
        trip_id: Some(input.trip_id.clone()),
        route_id: Some(input.route_id.clone()),
        ..Default::default()
    };

    let vehicle = VehicleDescriptor {
        id: Some(input.vehicle_id.clone()),
        label: input.vehicle_label.clone(),
        ..Default::default()
    };

    let stop_time_updates = input
        .stops
        .into_iter()
        .filter_map(|stop| {
            let scheduled_arrival = stop.scheduled_arrival?;
            let arrival_time = stop.actual_arrival.unwrap_or(scheduled_arrival);
            let arrival = Some(trip_update::StopTimeEvent {
                delay: stop
                    .actual_arrival
                    .map(|actual| (actual - scheduled_arrival) as i32),
                time: Some(arrival_time),
                uncertainty: None,
            });

            let departure = stop.scheduled_departure.map(|scheduled_departure| {
                let departure_time = stop.actual_departure.unwrap_or(scheduled_departure);
                trip_update::StopTimeEvent {
                    delay: stop
                        .actual_departure
                        .map(|actual| (actual - scheduled_departure) as i32),
                    time: Some(departure_time),
                    uncertainty: None,
                }
            });

            Some(trip_update::StopTimeUpdate {
                stop_id: Some(stop.stop_id),
                arrival,
                departure,
                ..Default::default()
            })
        })
        .collect();

    let trip_update = TripUpdate {
        trip: trip.clone(),
        vehicle: Some(vehicle.clone()),
        stop_time_update: stop_time_updates,
        timestamp: Some(input.position_timestamp as u64),
    };

    let vehicle_position = VehiclePosition {
        trip: Some(trip),
        vehicle: Some(vehicle),
        position: Some(Position {
            latitude: input.latitude as f32,
            longitude: input.longitude as f32,
            bearing: input.bearing.map(|b| b as f32),
            odometer: None,
            speed: None,
        }),
        timestamp: Some(input.position_timestamp as u64),
        ..Default::default()
    };

    FeedEntity {
        id: format!("veh_{}", input.vehicle_id),
        is_deleted: None,
        trip_update: Some(trip_update),
        vehicle: Some(vehicle_position),
        alert: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drops_stop_without_scheduled_arrival() {
        let entity = build_vehicle_entity(VehicleEntityInput {
            vehicle_id: "v1".to_owned(),
            vehicle_label: Some("12".to_owned()),
            trip_id: "100_1".to_owned(),
            route_id: "100".to_owned(),
            stops: vec![
                StopMatch {
                    stop_id: "s1".to_owned(),
                    scheduled_arrival: Some(1_000),
                    actual_arrival: Some(1_060),
                    scheduled_departure: None,
                    actual_departure: None,
                },
                StopMatch {
                    stop_id: "s2".to_owned(),
                    scheduled_arrival: None,
                    actual_arrival: None,
                    scheduled_departure: None,
                    actual_departure: None,
                },
            ],
            latitude: 12.9,
            longitude: 77.5,
            bearing: Some(90.0),
            position_timestamp: 1_000,
        });

        let trip_update = entity.trip_update.unwrap();
        assert_eq!(trip_update.stop_time_update.len(), 1);
        let arrival = trip_update.stop_time_update[0].arrival.as_ref().unwrap();
        assert_eq!(arrival.delay, Some(60));
    }
}
