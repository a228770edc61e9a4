//! Pending triggered abilities.

use serde::{Deserialize, Serialize};

use crate::stack::StackEntry;

/// Triggered abilities that have fired but are not yet on the stack.
///
/// Entries are drained in ascending timestamp order. Rules-accurate
/// ordering would group the active player's triggers before the
/// non-active player's and let each controller order their own; that
/// grouping is not implemented.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerQueue {
    pending: Vec<StackEntry>,
}

impl TriggerQueue {
    /// Create an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an already-stamped entry.
    pub fn add(&mut self, entry: StackEntry) {
        self.pending.push(entry);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Pending entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &StackEntry> {
        self.pending.iter()
    }

    /// Remove and return every pending entry, oldest timestamp first.
    pub fn drain_ordered(&mut self) -> Vec<StackEntry> {
        let mut drained = std::mem::take(&mut self.pending);
        drained.sort_by_key(StackEntry::timestamp);
        drained
    }

    /// Drop every pending entry.
    pub fn clear(&mut self) {
        self.pending.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{EntityId, PlayerId};

    fn stamped(name: &str, timestamp: u64) -> StackEntry {
        let mut entry = StackEntry::triggered(EntityId(5), PlayerId::One, name);
        entry.stamp(timestamp);
        entry
    }

    #[test]
    fn test_drain_orders_by_timestamp() {
        let mut queue = TriggerQueue::new();
        queue.add(stamped("third", 30));
        queue.add(stamped("first", 10));
        queue.add(stamped("second", 20));

        let names: Vec<_> = queue.drain_ordered().iter().map(|e| e.name().to_string()).collect();
        assert_eq!(names, vec!["first", "second", "third"]);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_drain_empty() {
        let mut queue = TriggerQueue::new();
        assert!(queue.drain_ordered().is_empty());
        assert_eq!(queue.len(), 0);
    }
}
