use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::Local;
use database::queries::completed_stop_time::CompletedStopTime;
use database::queries::vehicle_position::VehiclePosition;
use database::Store;
use gtfs::realtime::FeedEntity;
use model::job::Job;
use model::route::ParentId;
use model::schedule::assign_trip_ids;
use utility::time::{anchor_trip_start, hhmm_parts};

use crate::config::Config;
use crate::feed::FeedPublisher;
use crate::fetcher::fetch_route_data;
use crate::state::SharedState;
use crate::transformer::Transformer;

const POLL_INTERVAL: StdDuration = StdDuration::from_secs(20);
const QUIESCENCE_THRESHOLD: u32 = 2;

/// Forever: if the queue is empty or its head isn't due, sleep 1s. Else
/// dequeue. If a poller already owns the job's parent, drop the job; else
/// claim the parent and spawn a poller task for it.
pub async fn receiver_loop(
    state: Arc<SharedState>,
    config: Arc<Config>,
    client: reqwest::Client,
    transformer: Arc<Transformer>,
    feed: Arc<FeedPublisher>,
    store: Arc<Store>,
) {
    loop {
        let now = Local::now();
        let Some((_, job)) = state.queue.pop_due(now) else {
            tokio::time::sleep(StdDuration::from_secs(1)).await;
            continue;
        };

        if !state.active_set.try_claim(job.parent_id) {
            log::debug!("dropping job for already-active parent_id={}", job.parent_id);
            continue;
        }

        log::info!("poller started for parent_id={}", job.parent_id);
        let state = Arc::clone(&state);
        let config = Arc::clone(&config);
        let client = client.clone();
        let transformer = Arc::clone(&transformer);
        let feed = Arc::clone(&feed);
        let store = Arc::clone(&store);

        tokio::spawn(async move {
            poll_route_parent_until_done(job.parent_id, &state, &config, &client, &transformer, &feed, &store)
                .await;
            state.active_set.release(job.parent_id);
            log::info!("poller stopped for parent_id={}", job.parent_id);
        });
    }
}

/// Builds the candidate job list for every trip under `parent_id`, reusing
/// the scheduler's roll-forward rule once per poller invocation rather than
/// once per tick.
fn build_candidate_jobs(state: &SharedState, parent_id: ParentId) -> Vec<Job> {
    let data = state.schedule_data.snapshot();
    let assigned = assign_trip_ids(&data.route_maps.children, &data.start_times);

    let mut jobs = Vec::new();
    for route_key in data.route_maps.route_keys_for_parent(parent_id) {
        let Some(route_id) = data.route_maps.child_id(route_key) else { continue };
        let Some(timed_trips) = assigned.get(route_key) else { continue };

        for trip in timed_trips {
            let (hour, minute) = hhmm_parts(trip.start);
            let Some(trip_time) = anchor_trip_start(hour as u32, minute as u32, 0) else { continue };
            jobs.push(Job {
                trip_id: trip.trip_id.clone(),
                trip_time,
                route_id,
                parent_id,
            });
        }
    }
    jobs
}

/// Repeatedly fetches and transforms until two consecutive polls produce no
/// matching vehicle for any trip under `parent_id`.
pub async fn poll_route_parent_until_done(
    parent_id: ParentId,
    state: &SharedState,
    config: &Config,
    client: &reqwest::Client,
    transformer: &Transformer,
    feed: &FeedPublisher,
    store: &Store,
) {
    let candidate_jobs = build_candidate_jobs(state, parent_id);
    let mut empty_tries = 0u32;

    while empty_tries < QUIESCENCE_THRESHOLD {
        let stops = fetch_route_data(client, config, parent_id).await;

        if stops.is_empty() {
            empty_tries += 1;
            log::debug!("parent_id={parent_id} empty fetch, empty_tries={empty_tries}");
            tokio::time::sleep(POLL_INTERVAL).await;
            continue;
        }

        let mut total_matched = 0usize;
        for job in &candidate_jobs {
            let built = transformer.emit(&stops, job);
            total_matched += built.len();
            mirror_to_database(store, job, &built).await;
        }

        if total_matched > 0 {
            feed.publish(transformer.snapshot());
            empty_tries = 0;
            log::debug!("parent_id={parent_id} matched {total_matched} entities this round");
        } else {
            empty_tries += 1;
            log::debug!("parent_id={parent_id} no vehicle matched, empty_tries={empty_tries}");
        }

        tokio::time::sleep(POLL_INTERVAL).await;
    }
}

/// Best-effort mirror of the entities built for `job` into the relational
/// store. A write failure is logged inside `Store` and never surfaces here.
async fn mirror_to_database(store: &Store, job: &Job, entities: &[FeedEntity]) {
    let date = job.trip_time.format("%Y-%m-%d").to_string();
    let route_id = job.route_id.to_string();

    // `time` is always `actual.unwrap_or(scheduled)`, and `delay` is only
    // set once an actual time was reported (see `build_vehicle_entity`), so
    // the scheduled instant is recoverable as `time - delay`.
    fn split(event: Option<&gtfs::realtime::trip_update::StopTimeEvent>) -> (Option<i64>, Option<i64>) {
        let Some(event) = event else { return (None, None) };
        let Some(time) = event.time else { return (None, None) };
        match event.delay {
            Some(delay) => (Some(time - delay as i64), Some(time)),
            None => (Some(time), None),
        }
    }

    for entity in entities {
        if let Some(trip_update) = &entity.trip_update {
            for stop_time_update in &trip_update.stop_time_update {
                let Some(stop_id) = stop_time_update.stop_id.clone() else { continue };
                let (scheduled_arrival, actual_arrival) = split(stop_time_update.arrival.as_ref());
                let (scheduled_departure, actual_departure) = split(stop_time_update.departure.as_ref());
                if scheduled_arrival.is_none() && scheduled_departure.is_none() {
                    continue;
                }

                store
                    .record_completed_stop_time(CompletedStopTime {
                        stop_id,
                        trip_id: job.trip_id.clone(),
                        route_id: route_id.clone(),
                        date: date.clone(),
                        scheduled_arrival,
                        actual_arrival,
                        scheduled_departure,
                        actual_departure,
                    })
                    .await;
            }
        }

        if let Some(vehicle) = &entity.vehicle {
            let (Some(position), Some(timestamp)) = (&vehicle.position, vehicle.timestamp) else { continue };
            let vehicle_id = vehicle
                .vehicle
                .as_ref()
                .and_then(|descriptor| descriptor.id.clone())
                .unwrap_or_default();

            store
                .record_vehicle_position(VehiclePosition {
                    trip_id: job.trip_id.clone(),
                    vehicle_id,
                    route_id: route_id.clone(),
                    latitude: position.latitude as f64,
                    longitude: position.longitude as f64,
                    timestamp: timestamp as i64,
                })
                .await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use model::route::RouteMaps;
    use model::schedule::TripStart;
    use std::collections::HashMap as Map;

    #[test]
    fn builds_one_candidate_per_trip_under_parent() {
        let state = SharedState::new();
        let mut children = Map::new();
        children.insert("KIA-10 DOWN".to_owned(), 3813);
        children.insert("KIA-11 DOWN".to_owned(), 9999);
        let mut parents = Map::new();
        parents.insert("KIA-10 DOWN".to_owned(), 2124);
        parents.insert("KIA-11 DOWN".to_owned(), 5555);
        let mut start_times = Map::new();
        start_times.insert(
            "KIA-10 DOWN".to_owned(),
            vec![TripStart { start: 450, duration: 120 }, TripStart { start: 600, duration: 90 }],
        );
        start_times.insert("KIA-11 DOWN".to_owned(), vec![TripStart { start: 700, duration: 60 }]);

        state.schedule_data.replace(crate::state::ScheduleData {
            route_maps: RouteMaps { children, parents },
            start_times,
        });

        let jobs = build_candidate_jobs(&state, 2124);
        assert_eq!(jobs.len(), 2);
        assert!(jobs.iter().all(|job| job.parent_id == 2124));
    }
}
