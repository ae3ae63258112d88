use std::collections::HashMap;
use std::sync::Mutex;

use gtfs::realtime::{build_vehicle_entity, FeedEntity, StopMatch, VehicleEntityInput};
use model::job::Job;
use model::upstream::{StopRecord, VehicleDetail};
use utility::time::{anchor_hh_mm_on_date, parse_upstream_datetime, roll_forward_hh_mm};

const MATCH_WINDOW_SECONDS: i64 = 120;

/// Folds raw upstream stop records into realtime entities for a single job,
/// against a process-wide buffer keyed by `trip_id`. The buffer persists
/// across calls so the feed accumulates every trip seen so far: a `snapshot`
/// taken after transforming one trip still carries every other trip's most
/// recently emitted entity.
#[derive(Default)]
pub struct Transformer {
    buffer: Mutex<HashMap<String, FeedEntity>>,
}

impl Transformer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Matches `stops` against `job` and replaces `job.trip_id`'s slot in
    /// the buffer, returning only the entities newly built for this job
    /// (the caller needs these to decide whether this candidate matched
    /// anything, and to mirror stop events into the relational store).
    pub fn emit(&self, stops: &[StopRecord], job: &Job) -> Vec<FeedEntity> {
        let built = build_entities_for_job(stops, job);
        self.merge(job, built.clone());
        built
    }

    /// Convenience wrapper returning the whole buffer after emitting,
    /// matching the shape used by the end-to-end happy-path tests.
    pub fn transform(&self, stops: &[StopRecord], job: &Job) -> Vec<FeedEntity> {
        self.emit(stops, job);
        self.snapshot()
    }

    fn merge(&self, job: &Job, built: Vec<FeedEntity>) {
        let mut buffer = self.buffer.lock().unwrap();
        buffer.remove(&job.trip_id);
        for entity in built {
            buffer.insert(job.trip_id.clone(), entity);
        }
    }

    pub fn snapshot(&self) -> Vec<FeedEntity> {
        self.buffer.lock().unwrap().values().cloned().collect()
    }
}

/// Pairs a matched vehicle with the stop records it was seen at, preserving
/// the order stops were encountered in the upstream response.
struct VehicleMatch<'a> {
    detail: &'a VehicleDetail,
    stops: Vec<&'a StopRecord>,
}

fn build_entities_for_job(stops: &[StopRecord], job: &Job) -> Vec<FeedEntity> {
    let trip_date = job.trip_time.date_naive();
    let mut by_vehicle: HashMap<&str, VehicleMatch> = HashMap::new();

    for record in stops {
        if record.routeid != job.route_id {
            continue;
        }
        for vehicle in &record.vehicle_details {
            let Some(scheduled) = anchor_hh_mm_on_date(trip_date, &vehicle.sch_tripstarttime) else {
                continue;
            };
            let offset = (scheduled - job.trip_time).num_seconds().abs();
            if offset > MATCH_WINDOW_SECONDS {
                continue;
            }

            by_vehicle
                .entry(vehicle.vehicleid.as_str())
                .or_insert_with(|| VehicleMatch { detail: vehicle, stops: Vec::new() })
                .stops
                .push(record);
        }
    }

    by_vehicle
        .into_values()
        .filter_map(|matched| build_entity(job, matched))
        .collect()
}

fn build_entity(job: &Job, matched: VehicleMatch) -> Option<FeedEntity> {
    let detail = matched.detail;

    let stops = matched
        .stops
        .iter()
        .map(|record| StopMatch {
            stop_id: record.stationid.to_string(),
            scheduled_arrival: detail.sch_arrivaltime.as_deref().and_then(roll_forward_hh_mm),
            actual_arrival: detail.actual_arrivaltime.as_deref().and_then(roll_forward_hh_mm),
            scheduled_departure: detail.sch_departuretime.as_deref().and_then(roll_forward_hh_mm),
            actual_departure: detail.actual_departuretime.as_deref().and_then(roll_forward_hh_mm),
        })
        .collect();

    let position_timestamp = parse_upstream_datetime(&detail.lastrefreshon)?;

    Some(build_vehicle_entity(VehicleEntityInput {
        vehicle_id: detail.vehicleid.clone(),
        vehicle_label: detail.vehiclenumber.clone(),
        trip_id: job.trip_id.clone(),
        route_id: job.route_id.to_string(),
        stops,
        latitude: detail.centerlat,
        longitude: detail.centerlong,
        bearing: detail.heading,
        position_timestamp,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Local;
    use model::upstream::VehicleDetail;
    use utility::time::anchor_hh_mm_on_date;

    fn sample_job() -> Job {
        let trip_time = anchor_hh_mm_on_date(Local::now().date_naive(), "11:10").unwrap();
        Job {
            trip_id: "3813_1".to_owned(),
            trip_time,
            route_id: 3813,
            parent_id: 2124,
        }
    }

    fn vehicle(id: &str) -> VehicleDetail {
        VehicleDetail {
            vehicleid: id.to_owned(),
            vehiclenumber: Some("KA-01-1234".to_owned()),
            sch_tripstarttime: "11:10".to_owned(),
            sch_arrivaltime: Some("11:10".to_owned()),
            sch_departuretime: None,
            actual_arrivaltime: Some("11:11".to_owned()),
            actual_departuretime: None,
            centerlat: 12.9,
            centerlong: 77.5,
            heading: Some(90.0),
            lastrefreshon: "27-07-2026 11:09:00".to_owned(),
        }
    }

    fn stop(station_id: i64, vehicle_detail: VehicleDetail) -> StopRecord {
        StopRecord {
            routeid: 3813,
            stationid: station_id,
            stationname: format!("Stop {station_id}"),
            vehicle_details: vec![vehicle_detail],
        }
    }

    #[test]
    fn groups_one_vehicle_across_two_stops_with_delay() {
        let job = sample_job();
        let stops = vec![stop(1, vehicle("v001")), stop(2, vehicle("v001"))];

        let transformer = Transformer::new();
        let entities = transformer.transform(&stops, &job);

        assert_eq!(entities.len(), 1);
        let entity = &entities[0];
        assert_eq!(entity.id, "veh_v001");
        let trip_update = entity.trip_update.as_ref().unwrap();
        assert_eq!(trip_update.trip.trip_id.as_deref(), Some("3813_1"));
        assert_eq!(trip_update.stop_time_update.len(), 2);
        let arrival = trip_update.stop_time_update[0].arrival.as_ref().unwrap();
        assert_eq!(arrival.delay, Some(60));
    }

    #[test]
    fn vehicle_outside_match_window_is_dropped() {
        let job = sample_job();
        let mut far = vehicle("v002");
        far.sch_tripstarttime = "11:13".to_owned();
        let stops = vec![stop(1, far)];

        let transformer = Transformer::new();
        let entities = transformer.transform(&stops, &job);
        assert!(entities.is_empty());
    }

    #[test]
    fn buffer_accumulates_across_trip_ids() {
        let transformer = Transformer::new();
        let job_a = sample_job();
        let mut job_b = sample_job();
        job_b.trip_id = "3813_2".to_owned();

        transformer.transform(&[stop(1, vehicle("v001"))], &job_a);
        let after_second = transformer.transform(&[stop(1, vehicle("v002"))], &job_b);

        assert_eq!(after_second.len(), 2);
    }
}
