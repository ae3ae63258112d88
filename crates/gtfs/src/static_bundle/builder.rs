use std::collections::HashMap;

use chrono::Local;
use model::input::InputData;
use model::schedule::assign_trip_ids;
use sha2::{Digest, Sha256};

use crate::data_model::agency::{Agency, FeedInfo};
use crate::data_model::calendar::Calendar;
use crate::data_model::routes::{Route, RouteType};
use crate::data_model::shapes::ShapePoint;
use crate::data_model::stop_times::StopTime;
use crate::data_model::stops::Stop;
use crate::data_model::translations::Translation;
use crate::data_model::trips::Trip;
use crate::polyline;

const AGENCY_ID: &str = "bmtc";
const SERVICE_ID: &str = "always";

#[derive(Debug, Clone, Default)]
pub struct StaticBundle {
    pub agency: Vec<Agency>,
    pub routes: Vec<Route>,
    pub stops: Vec<Stop>,
    pub trips: Vec<Trip>,
    pub stop_times: Vec<StopTime>,
    pub calendar: Vec<Calendar>,
    pub shapes: Vec<ShapePoint>,
    pub translations: Vec<Translation>,
    pub feed_info: FeedInfo,
}

fn slug(value: &str) -> String {
    value
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

pub fn build(input: &InputData) -> StaticBundle {
    let timed_trips = assign_trip_ids(&input.routes_children, &input.start_times);

    let mut stops_by_id: HashMap<String, Stop> = HashMap::new();
    let mut translations = Vec::new();
    let mut routes = Vec::new();
    let mut trips = Vec::new();
    let mut stop_times = Vec::new();
    let mut shapes = Vec::new();

    let mut route_keys: Vec<&String> = input.routes_children.keys().collect();
    route_keys.sort();

    for route_key in route_keys {
        let child_id = input.routes_children[route_key];
        let route_slug = slug(route_key);

        routes.push(Route {
            route_id: child_id.to_string(),
            agency_id: AGENCY_ID.to_owned(),
            route_short_name: route_key.clone(),
            route_long_name: route_key.clone(),
            route_type: RouteType::Bus,
        });

        let stop_list = input.client_stops.get(route_key);
        if let Some(stop_list) = stop_list {
            for (index, stop) in stop_list.stops.iter().enumerate() {
                let stop_id = stop
                    .stop_id
                    .clone()
                    .unwrap_or_else(|| format!("{}_{}", route_slug, index));
                stops_by_id.entry(stop_id.clone()).or_insert_with(|| Stop {
                    stop_id: stop_id.clone(),
                    stop_name: stop.name.clone(),
                    stop_lat: stop.loc[0],
                    stop_lon: stop.loc[1],
                });
                if let Some(name_kn) = &stop.name_kn {
                    translations.push(Translation {
                        table_name: "stops".to_owned(),
                        field_name: "stop_name".to_owned(),
                        language: "kn".to_owned(),
                        translation: name_kn.clone(),
                        record_id: stop_id,
                    });
                }
            }
        }

        let shape_id = if input.route_lines.contains_key(route_key) {
            Some(format!("shape_{}", route_slug))
        } else {
            None
        };

        if let Some(encoded) = input.route_lines.get(route_key) {
            let shape_id = shape_id.clone().unwrap();
            for (sequence, (lat, lon)) in polyline::decode(encoded).into_iter().enumerate() {
                shapes.push(ShapePoint {
                    shape_id: shape_id.clone(),
                    shape_pt_lat: lat,
                    shape_pt_lon: lon,
                    shape_pt_sequence: sequence as u32,
                });
            }
        }

        let Some(timed) = timed_trips.get(route_key) else {
            continue;
        };

        let precomputed = input
            .trip_times
            .as_ref()
            .and_then(|table| table.get(route_key));

        for (trip_index, timed_trip) in timed.iter().enumerate() {
            trips.push(Trip {
                route_id: child_id.to_string(),
                service_id: SERVICE_ID.to_owned(),
                trip_id: timed_trip.trip_id.clone(),
                shape_id: shape_id.clone(),
            });

            if let Some(stop_list) = stop_list {
                let offsets = precomputed
                    .and_then(|trips| trips.get(trip_index))
                    .cloned()
                    .unwrap_or_else(|| interpolate_offsets(stop_list, timed_trip.duration));

                for (sequence, (stop, offset_minutes)) in
                    stop_list.stops.iter().zip(offsets).enumerate()
                {
                    let stop_id = stop
                        .stop_id
                        .clone()
                        .unwrap_or_else(|| format!("{}_{}", route_slug, sequence));
                    let total_minutes = timed_trip.start / 100 * 60
                        + timed_trip.start % 100
                        + offset_minutes;
                    stop_times.push(StopTime {
                        trip_id: timed_trip.trip_id.clone(),
                        arrival_time: utility::time::format_service_time(total_minutes),
                        departure_time: utility::time::format_service_time_departure(total_minutes),
                        stop_id,
                        stop_sequence: sequence as u32,
                    });
                }
            }
        }
    }

    let today = Local::now().date_naive();
    let calendar = vec![Calendar {
        service_id: SERVICE_ID.to_owned(),
        monday: 1,
        tuesday: 1,
        wednesday: 1,
        thursday: 1,
        friday: 1,
        saturday: 1,
        sunday: 1,
        start_date: today.format("%Y%m%d").to_string(),
        end_date: today.format("%Y%m%d").to_string(),
    }];

    let mut stops: Vec<Stop> = stops_by_id.into_values().collect();
    stops.sort_by(|a, b| a.stop_id.cmp(&b.stop_id));

    let agency = vec![Agency {
        agency_id: AGENCY_ID.to_owned(),
        agency_name: "BMTC".to_owned(),
        agency_url: "https://mybmtc.karnataka.gov.in/".to_owned(),
        agency_timezone: "Asia/Kolkata".to_owned(),
    }];

    let mut bundle = StaticBundle {
        agency,
        routes,
        stops,
        trips,
        stop_times,
        calendar,
        shapes,
        translations,
        feed_info: FeedInfo {
            feed_publisher_name: "BMTC".to_owned(),
            feed_publisher_url: "https://mybmtc.karnataka.gov.in/".to_owned(),
            feed_lang: "en".to_owned(),
            feed_version: String::new(),
        },
    };
    bundle.feed_info.feed_version = content_hash(&bundle);
    bundle
}

/// Distributes stops evenly across a trip's duration when no precomputed
/// per-stop times are available, proportional to cumulative distance.
fn interpolate_offsets(stop_list: &model::input::StopList, duration_minutes: i64) -> Vec<i64> {
    let total_distance = stop_list
        .stops
        .last()
        .map(|stop| stop.distance)
        .filter(|distance| *distance > 0.0);

    match total_distance {
        Some(total_distance) => stop_list
            .stops
            .iter()
            .map(|stop| ((stop.distance / total_distance) * duration_minutes as f64) as i64)
            .collect(),
        None => {
            let count = stop_list.stops.len().max(1);
            (0..stop_list.stops.len())
                .map(|i| (i as i64 * duration_minutes) / count as i64)
                .collect()
        }
    }
}

fn content_hash(bundle: &StaticBundle) -> String {
    let mut hasher = Sha256::new();
    hasher.update(format!("{:?}", bundle.routes));
    hasher.update(format!("{:?}", bundle.stops));
    hasher.update(format!("{:?}", bundle.trips));
    hasher.update(format!("{:?}", bundle.stop_times));
    hasher.update(format!("{:?}", bundle.shapes));
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use model::input::{ClientStop, StopList};

    #[test]
    fn midnight_spanning_trip_keeps_ten_second_departure_dwell() {
        let route_key = "KIA-10 DOWN".to_owned();

        let mut routes_children = HashMap::new();
        routes_children.insert(route_key.clone(), 3813);

        let mut start_times = HashMap::new();
        start_times.insert(
            route_key.clone(),
            vec![model::schedule::TripStart { start: 2350, duration: 60 }],
        );

        let mut client_stops = HashMap::new();
        client_stops.insert(
            route_key.clone(),
            StopList {
                stops: vec![
                    ClientStop {
                        name: "First".to_owned(),
                        name_kn: None,
                        loc: [12.9, 77.5],
                        distance: 0.0,
                        stop_id: Some("s1".to_owned()),
                    },
                    ClientStop {
                        name: "Last".to_owned(),
                        name_kn: None,
                        loc: [13.0, 77.6],
                        distance: 10.0,
                        stop_id: Some("s2".to_owned()),
                    },
                ],
            },
        );

        let input = InputData {
            routes_children,
            routes_parent: HashMap::new(),
            start_times,
            route_lines: HashMap::new(),
            client_stops,
            trip_times: None,
        };

        let bundle = build(&input);
        assert_eq!(bundle.stop_times.len(), 2);
        assert_eq!(bundle.stop_times[0].departure_time, "23:50:10");
        assert_eq!(bundle.stop_times[0].arrival_time, "23:50:00");
        assert_eq!(bundle.stop_times[1].arrival_time, "24:50:00");
        assert_eq!(bundle.stop_times[1].departure_time, "24:50:10");
    }
}
