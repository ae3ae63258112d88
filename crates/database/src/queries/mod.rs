pub mod completed_stop_time;
pub mod vehicle_position;
