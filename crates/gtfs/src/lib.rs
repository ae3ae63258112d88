pub mod data_model;
pub mod polyline;
pub mod realtime;
pub mod static_bundle;
