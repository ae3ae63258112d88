use std::time::Duration as StdDuration;

use chrono::{Duration, Local};
use model::route::RouteMaps;
use model::schedule::assign_trip_ids;
use model::job::Job;
use utility::time::{anchor_trip_start, hhmm_parts};

use crate::config::Config;
use crate::error::ScheduleError;
use crate::state::SharedState;

/// Enumerates every trip in the current `start_times` snapshot and inserts
/// a spread of polling opportunities for each into the shared queue.
/// Returns the number of jobs inserted.
pub fn populate_schedule(state: &SharedState, config: &Config) -> usize {
    let data = state.schedule_data.snapshot();
    let assigned = assign_trip_ids(&data.route_maps.children, &data.start_times);

    let today = Local::now().date_naive();
    let horizon_end = today + Duration::days(2);
    let mut inserted = 0usize;

    for (route_key, trips) in &assigned {
        let Some(route_id) = data.route_maps.child_id(route_key) else {
            log::warn!("{}", ScheduleError::MissingChildId(route_key.clone()));
            continue;
        };
        let Some(parent_id) = data.route_maps.parent_id(route_key) else {
            log::warn!("{}", ScheduleError::MissingParentId(route_key.clone()));
            continue;
        };

        for trip in trips {
            let (hour, minute) = hhmm_parts(trip.start);
            let Some(trip_time) = anchor_trip_start(hour as u32, minute as u32, 0) else {
                log::warn!("trip {} has an unparseable start {}", trip.trip_id, trip.start);
                continue;
            };

            for offset in -config.query_amount..=config.query_amount {
                let fire_time = trip_time + Duration::minutes(offset * config.query_interval_minutes);
                if fire_time.date_naive() < today || fire_time.date_naive() >= horizon_end {
                    continue;
                }

                state.queue.insert(
                    fire_time,
                    Job {
                        trip_id: trip.trip_id.clone(),
                        trip_time,
                        route_id,
                        parent_id,
                    },
                );
                inserted += 1;
            }
        }
    }

    log::info!("populate_schedule inserted {inserted} jobs across {} routes", assigned.len());
    inserted
}

/// Runs `populate_schedule` once at startup, then forever: sleep 30s;
/// between 00:10 and 00:15 local time, rerun and sleep an hour to avoid
/// re-triggering inside the same window.
pub async fn schedule_thread(state: &SharedState, config: &Config) {
    populate_schedule(state, config);

    loop {
        tokio::time::sleep(StdDuration::from_secs(30)).await;

        let now = Local::now();
        let minute_of_hour = now.format("%H:%M").to_string();
        if now.hour_in_window() {
            populate_schedule(state, config);
            log::info!("midnight schedule rerun at {minute_of_hour}");
            tokio::time::sleep(StdDuration::from_secs(3600)).await;
        }
    }
}

trait InWindow {
    fn hour_in_window(&self) -> bool;
}

impl InWindow for chrono::DateTime<Local> {
    fn hour_in_window(&self) -> bool {
        use chrono::Timelike;
        self.hour() == 0 && (10..15).contains(&self.minute())
    }
}

/// Re-exported for callers that only need the maps, not the whole store.
pub fn current_route_maps(state: &SharedState) -> RouteMaps {
    state.schedule_data.snapshot().route_maps
}

#[cfg(test)]
mod tests {
    use super::*;
    use model::input::StartTimesFile;
    use model::route::RouteMaps;
    use model::schedule::TripStart;
    use std::collections::HashMap;

    fn config(amount: i64, interval: i64) -> Config {
        Config {
            api_base_url: "http://example.test".to_owned(),
            query_interval_minutes: interval,
            query_amount: amount,
            db_path: ":memory:".to_owned(),
            input_dir: "./in".to_owned(),
            bind_host: "0.0.0.0".to_owned(),
            bind_port: 0,
        }
    }

    #[test]
    fn fans_out_2q_plus_1_jobs_for_one_trip() {
        let state = SharedState::new();

        let mut children = HashMap::new();
        children.insert("KIA-10 DOWN".to_owned(), 3813);
        let mut parents = HashMap::new();
        parents.insert("KIA-10 DOWN".to_owned(), 2124);
        let mut start_times: StartTimesFile = HashMap::new();
        start_times.insert(
            "KIA-10 DOWN".to_owned(),
            vec![TripStart { start: 450, duration: 120 }],
        );

        state.schedule_data.replace(crate::state::ScheduleData {
            route_maps: RouteMaps { children, parents },
            start_times,
        });

        let inserted = populate_schedule(&state, &config(2, 5));
        assert_eq!(inserted, 5);
        assert_eq!(state.queue.len(), 5);
    }

    #[test]
    fn rerunning_does_not_drop_below_expected_count() {
        let state = SharedState::new();
        let mut children = HashMap::new();
        children.insert("KIA-10 DOWN".to_owned(), 3813);
        let mut parents = HashMap::new();
        parents.insert("KIA-10 DOWN".to_owned(), 2124);
        let mut start_times: StartTimesFile = HashMap::new();
        start_times.insert(
            "KIA-10 DOWN".to_owned(),
            vec![TripStart { start: 450, duration: 120 }],
        );
        state.schedule_data.replace(crate::state::ScheduleData {
            route_maps: RouteMaps { children, parents },
            start_times,
        });

        let config = config(2, 5);
        populate_schedule(&state, &config);
        populate_schedule(&state, &config);
        // no two entries share a fire_time even after rerunning twice
        assert_eq!(state.queue.len(), 10);
    }
}
