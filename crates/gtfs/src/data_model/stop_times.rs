use serde::Serialize;

/// A row of `stop_times.txt`. `arrival_time`/`departure_time` are formatted
/// `HH:MM:SS` and may exceed `24:00:00` for trips that continue past
/// midnight of the service day they started in.
#[derive(Debug, Clone, Serialize)]
pub struct StopTime {
    pub trip_id: String,
    pub arrival_time: String,
    pub departure_time: String,
    pub stop_id: String,
    pub stop_sequence: u32,
}
