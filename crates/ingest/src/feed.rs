use std::collections::HashSet;
use std::sync::Mutex;

use chrono::Local;
use gtfs::realtime::{self, FeedEntity, FeedMessage};

/// Holds the current realtime feed behind a single mutex. Publication is
/// atomic from a reader's perspective: `serialize()` always observes either
/// the pre- or post-`publish` feed in full, never a partial one.
#[derive(Default)]
pub struct FeedPublisher {
    message: Mutex<FeedMessage>,
}

impl FeedPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears the feed, sets a fresh header, and appends `entities` while
    /// dropping later duplicates of any `entity.id` already seen.
    pub fn publish(&self, entities: Vec<FeedEntity>) {
        let mut seen = HashSet::with_capacity(entities.len());
        let mut deduped = Vec::with_capacity(entities.len());
        for entity in entities {
            if seen.insert(entity.id.clone()) {
                deduped.push(entity);
            }
        }

        let header = realtime::new_header(Local::now().timestamp());
        let mut message = self.message.lock().unwrap();
        *message = FeedMessage {
            header: Some(header),
            entity: deduped,
        };
    }

    /// Encodes the current feed as `gtfs-realtime` wire bytes, holding the
    /// feed mutex for the duration of serialization.
    pub fn serialize(&self) -> Vec<u8> {
        let message = self.message.lock().unwrap();
        realtime::encode(&message)
    }

    pub fn entity_count(&self) -> usize {
        self.message.lock().unwrap().entity.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entity(id: &str) -> FeedEntity {
        FeedEntity {
            id: id.to_owned(),
            is_deleted: None,
            trip_update: None,
            vehicle: None,
            alert: None,
        }
    }

    #[test]
    fn first_id_wins_on_duplicate() {
        let publisher = FeedPublisher::new();
        publisher.publish(vec![entity("e1"), entity("e2"), entity("e1")]);
        assert_eq!(publisher.entity_count(), 2);
    }

    #[test]
    fn republish_overwrites_wholesale() {
        let publisher = FeedPublisher::new();
        publisher.publish(vec![entity("e1"), entity("e2")]);
        publisher.publish(vec![entity("e3")]);
        assert_eq!(publisher.entity_count(), 1);
    }
}
