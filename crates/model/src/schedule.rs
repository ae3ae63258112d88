use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use utility::trip_id::TripIdAllocator;

use crate::input::{RouteChildrenIds, StartTimesFile};
use crate::route::RouteKey;

/// One scheduled trip departure, as given by `start_times.json`: an `HHMM`
/// integer start (e.g. `905` for `09:05`) and a duration in minutes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TripStart {
    pub start: i64,
    pub duration: i64,
}

/// A trip start already bound to a synthesized trip_id, as produced by the
/// shared trip-numbering scheme.
#[derive(Debug, Clone)]
pub struct TimedTrip {
    pub trip_id: String,
    pub start: i64,
    pub duration: i64,
}

/// Assigns `trip_id`s to every trip in `start_times`, keyed by `route_key`.
/// This is the single source of truth for the `"<child_id>_<n>"` numbering
/// scheme; both the scheduler and the static bundle builder call it so the
/// realtime feed and the static bundle agree on trip identity.
///
/// A fresh [`TripIdAllocator`] is used per call: since a `child_id` is
/// normally only addressed by one `route_key`, re-running this for the same
/// `start_times` snapshot always reproduces the same assignment.
pub fn assign_trip_ids(
    route_children: &RouteChildrenIds,
    start_times: &StartTimesFile,
) -> HashMap<RouteKey, Vec<TimedTrip>> {
    let mut allocator = TripIdAllocator::new();
    let mut result = HashMap::new();

    for (route_key, child_id) in route_children {
        let Some(trips) = start_times.get(route_key) else {
            continue;
        };
        let timed = trips
            .iter()
            .map(|trip| TimedTrip {
                trip_id: allocator.allocate(*child_id),
                start: trip.start,
                duration: trip.duration,
            })
            .collect();
        result.insert(route_key.clone(), timed);
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assigns_ordinals_scoped_to_child_id() {
        let mut route_children = HashMap::new();
        route_children.insert("KIA-10 DOWN".to_owned(), 3813);
        route_children.insert("KIA-10 UP".to_owned(), 4200);

        let mut start_times = HashMap::new();
        start_times.insert(
            "KIA-10 DOWN".to_owned(),
            vec![
                TripStart {
                    start: 450,
                    duration: 120,
                },
                TripStart {
                    start: 600,
                    duration: 120,
                },
            ],
        );
        start_times.insert(
            "KIA-10 UP".to_owned(),
            vec![TripStart {
                start: 500,
                duration: 100,
            }],
        );

        let timed = assign_trip_ids(&route_children, &start_times);
        let down = &timed["KIA-10 DOWN"];
        assert_eq!(down[0].trip_id, "3813_1");
        assert_eq!(down[1].trip_id, "3813_2");
        assert_eq!(timed["KIA-10 UP"][0].trip_id, "4200_1");
    }
}
