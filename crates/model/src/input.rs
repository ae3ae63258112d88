use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::route::RouteKey;
use crate::schedule::TripStart;

/// `routes_children_ids.json`: `route_key -> child_id`.
pub type RouteChildrenIds = HashMap<RouteKey, i64>;

/// `routes_parent_ids.json`: `route_key -> parent_id`.
pub type RouteParentIds = HashMap<RouteKey, i64>;

/// `start_times.json`: `route_key -> [{start, duration}]`.
pub type StartTimesFile = HashMap<RouteKey, Vec<TripStart>>;

/// `routelines.json`: `route_key -> encoded polyline`.
pub type RouteLines = HashMap<RouteKey, String>;

/// `client_stops.json`: `route_key -> {stops: [...]}`.
pub type ClientStops = HashMap<RouteKey, StopList>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StopList {
    pub stops: Vec<ClientStop>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientStop {
    pub name: String,
    #[serde(default)]
    pub name_kn: Option<String>,
    /// `[latitude, longitude]`.
    pub loc: [f64; 2],
    /// Cumulative distance in kilometres from the first stop of the route.
    pub distance: f64,
    #[serde(default)]
    pub stop_id: Option<String>,
}

/// `times.json`: `route_key -> per-trip list of minute offsets, one per
/// stop, from the trip's start`. Optional; when absent, the static bundle
/// builder interpolates stop times from `distance` and the trip's duration.
pub type TripTimesFile = HashMap<RouteKey, Vec<Vec<i64>>>;

/// The full set of curated input files, loaded once at startup and once
/// per day thereafter by the static bundle builder.
#[derive(Debug, Clone, Default)]
pub struct InputData {
    pub routes_children: RouteChildrenIds,
    pub routes_parent: RouteParentIds,
    pub start_times: StartTimesFile,
    pub route_lines: RouteLines,
    pub client_stops: ClientStops,
    pub trip_times: Option<TripTimesFile>,
}
