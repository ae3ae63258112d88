use std::collections::HashSet;

/// Assigns `"<child_id>_<n>"` trip ids, with `n` a 1-based ordinal scoped to
/// each `child_id`. Shared between the scheduler and the static bundle
/// builder so both agree on the same trip identity for the same trip.
#[derive(Debug, Default)]
pub struct TripIdAllocator {
    used: HashSet<String>,
}

impl TripIdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allocate(&mut self, child_id: i64) -> String {
        let mut ordinal = 1u32;
        loop {
            let candidate = format!("{}_{}", child_id, ordinal);
            if !self.used.contains(&candidate) {
                self.used.insert(candidate.clone());
                return candidate;
            }
            ordinal += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_ordinals_per_child_id() {
        let mut allocator = TripIdAllocator::new();
        assert_eq!(allocator.allocate(3813), "3813_1");
        assert_eq!(allocator.allocate(3813), "3813_2");
        assert_eq!(allocator.allocate(4200), "4200_1");
        assert_eq!(allocator.allocate(3813), "3813_3");
    }
}
