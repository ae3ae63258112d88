use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Textual route identifier incorporating direction, e.g. `"KIA-10 DOWN"`.
pub type RouteKey = String;

/// Numeric id of one direction of a route in the upstream system.
pub type ChildId = i64;

/// Numeric id of a bidirectional route, shared by an up and a down child.
pub type ParentId = i64;

/// The `route_key -> child_id` and `route_key -> parent_id` mappings,
/// populated once at startup and re-populated once per day by the static
/// bundle builder. Both maps are always replaced together so readers never
/// observe one updated without the other.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RouteMaps {
    pub children: HashMap<RouteKey, ChildId>,
    pub parents: HashMap<RouteKey, ParentId>,
}

impl RouteMaps {
    pub fn child_id(&self, route_key: &str) -> Option<ChildId> {
        self.children.get(route_key).copied()
    }

    pub fn parent_id(&self, route_key: &str) -> Option<ParentId> {
        self.parents.get(route_key).copied()
    }

    /// All route_keys whose parent matches `parent_id`.
    pub fn route_keys_for_parent<'a>(
        &'a self,
        parent_id: ParentId,
    ) -> impl Iterator<Item = &'a RouteKey> + 'a {
        self.parents
            .iter()
            .filter(move |(_, id)| **id == parent_id)
            .map(|(key, _)| key)
    }
}
