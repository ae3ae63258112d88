use std::collections::{BTreeMap, HashSet};
use std::sync::Mutex;
use std::sync::RwLock;

use chrono::{DateTime, Duration, Local};
use model::input::StartTimesFile;
use model::job::Job;
use model::route::{ParentId, RouteMaps};

/// `routes_children`, `routes_parent` and `start_times`, grouped under one
/// lock so a reader never observes one updated without the others.
#[derive(Debug, Clone, Default)]
pub struct ScheduleData {
    pub route_maps: RouteMaps,
    pub start_times: StartTimesFile,
}

#[derive(Default)]
pub struct ScheduleDataStore {
    inner: RwLock<ScheduleData>,
}

impl ScheduleDataStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear-then-fill under a single write lock.
    pub fn replace(&self, data: ScheduleData) {
        *self.inner.write().unwrap() = data;
    }

    pub fn snapshot(&self) -> ScheduleData {
        self.inner.read().unwrap().clone()
    }
}

/// A min-priority queue of `(fire_time, Job)` pairs. No two entries ever
/// share the same key: an insert that collides with an existing fire_time
/// is bumped forward one second until it finds a free slot.
#[derive(Default)]
pub struct ScheduleQueue {
    entries: Mutex<BTreeMap<DateTime<Local>, Job>>,
}

impl ScheduleQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, mut fire_time: DateTime<Local>, job: Job) {
        let mut entries = self.entries.lock().unwrap();
        while entries.contains_key(&fire_time) {
            fire_time += Duration::seconds(1);
        }
        entries.insert(fire_time, job);
    }

    /// Removes and returns the queue head if its fire_time has arrived.
    pub fn pop_due(&self, now: DateTime<Local>) -> Option<(DateTime<Local>, Job)> {
        let mut entries = self.entries.lock().unwrap();
        let head = *entries.keys().next()?;
        if head > now {
            return None;
        }
        entries.remove_entry(&head)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().unwrap().is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }
}

/// The set of `parent_id`s currently being polled. Enforces at most one
/// poller per parent.
#[derive(Default)]
pub struct ActiveSet {
    parents: Mutex<HashSet<ParentId>>,
}

impl ActiveSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Atomic membership-check-and-insert. Returns `true` if `parent_id`
    /// was newly claimed, `false` if a poller already owns it.
    pub fn try_claim(&self, parent_id: ParentId) -> bool {
        self.parents.lock().unwrap().insert(parent_id)
    }

    pub fn release(&self, parent_id: ParentId) {
        self.parents.lock().unwrap().remove(&parent_id);
    }

    pub fn len(&self) -> usize {
        self.parents.lock().unwrap().len()
    }

    pub fn contains(&self, parent_id: ParentId) -> bool {
        self.parents.lock().unwrap().contains(&parent_id)
    }
}

/// The handle threaded through every component constructor in place of the
/// process-wide singletons the original pipeline relied on.
#[derive(Default)]
pub struct SharedState {
    pub schedule_data: ScheduleDataStore,
    pub queue: ScheduleQueue,
    pub active_set: ActiveSet,
}

impl SharedState {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn queue_bumps_colliding_fire_times() {
        let queue = ScheduleQueue::new();
        let at = Local::now();
        let job = |trip_id: &str| Job {
            trip_id: trip_id.to_owned(),
            trip_time: at,
            route_id: 1,
            parent_id: 1,
        };
        queue.insert(at, job("a"));
        queue.insert(at, job("b"));
        assert_eq!(queue.len(), 2);

        let (first, _) = queue.pop_due(at + Duration::seconds(5)).unwrap();
        let (second, _) = queue.pop_due(at + Duration::seconds(5)).unwrap();
        assert!(second > first);
    }

    #[test]
    fn active_set_claims_exactly_once() {
        let set = ActiveSet::new();
        assert!(set.try_claim(42));
        assert!(!set.try_claim(42));
        set.release(42);
        assert!(set.try_claim(42));
    }
}
