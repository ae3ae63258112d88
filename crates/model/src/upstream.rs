use serde::{Deserialize, Serialize};
use utility::serde::lenient_number;

/// Response body of `POST /SearchByRouteDetails_v4`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RouteDetailsResponse {
    #[serde(default)]
    pub issuccess: bool,
    #[serde(default)]
    pub up: Option<Direction>,
    #[serde(default)]
    pub down: Option<Direction>,
}

impl RouteDetailsResponse {
    /// Flattens the up and down directions into one list of stop records,
    /// matching the upstream-flattening the fetcher performs before
    /// handing data to the transformer.
    pub fn flatten(self) -> Vec<StopRecord> {
        let mut stops = Vec::new();
        if let Some(direction) = self.up {
            stops.extend(direction.data);
        }
        if let Some(direction) = self.down {
            stops.extend(direction.data);
        }
        stops
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Direction {
    #[serde(default)]
    pub data: Vec<StopRecord>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StopRecord {
    #[serde(deserialize_with = "lenient_number::deserialize")]
    pub routeid: i64,
    #[serde(deserialize_with = "lenient_number::deserialize")]
    pub stationid: i64,
    pub stationname: String,
    #[serde(rename = "vehicleDetails", default)]
    pub vehicle_details: Vec<VehicleDetail>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VehicleDetail {
    pub vehicleid: String,
    #[serde(default)]
    pub vehiclenumber: Option<String>,
    /// `"HH:MM"` scheduled departure time for this vehicle's current trip.
    pub sch_tripstarttime: String,
    #[serde(default)]
    pub sch_arrivaltime: Option<String>,
    #[serde(default)]
    pub sch_departuretime: Option<String>,
    #[serde(default)]
    pub actual_arrivaltime: Option<String>,
    #[serde(default)]
    pub actual_departuretime: Option<String>,
    #[serde(deserialize_with = "lenient_number::deserialize")]
    pub centerlat: f64,
    #[serde(deserialize_with = "lenient_number::deserialize")]
    pub centerlong: f64,
    #[serde(default, deserialize_with = "lenient_number::deserialize_option")]
    pub heading: Option<f64>,
    /// `"dd-MM-yyyy HH:mm:ss"`.
    pub lastrefreshon: String,
}

/// Request body of `POST /SearchByRouteDetails_v4`.
#[derive(Debug, Clone, Serialize)]
pub struct RouteDetailsRequest {
    pub routeid: i64,
    pub servicetypeid: i32,
}

impl RouteDetailsRequest {
    pub fn new(parent_id: i64) -> Self {
        Self {
            routeid: parent_id,
            servicetypeid: 0,
        }
    }
}
