use chrono::{DateTime, Local};

use crate::route::{ChildId, ParentId};

/// A single scheduled poll opportunity, as stored in the priority queue and
/// handed to the transformer once a poller has fetched upstream data for
/// the job's parent.
#[derive(Debug, Clone)]
pub struct Job {
    pub trip_id: String,
    /// The trip's scheduled start, already anchored to a concrete calendar
    /// instant by the scheduler. Carried through unchanged rather than
    /// recomputed, so a poller firing just after midnight cannot end up
    /// one day off from the anchor the scheduler used.
    pub trip_time: DateTime<Local>,
    pub route_id: ChildId,
    pub parent_id: ParentId,
}
