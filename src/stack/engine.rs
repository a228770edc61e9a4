//! LIFO storage for pending stack entries.

use im::Vector;
use serde::{Deserialize, Serialize};

use crate::error::ResolutionError;

use super::entry::{StackEntry, StackEntryId};

/// The stack of pending spells and abilities.
///
/// Index 0 is the bottom; the last element is the top and resolves next.
/// Resolution order is purely structural: `pop_top` always removes the
/// last element, whatever timestamps the entries carry.
///
/// Backed by `im::Vector` so `snapshot` is an O(1) clone that can never
/// alias the engine's own storage.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackEngine {
    entries: Vector<StackEntry>,
}

impl StackEngine {
    /// Create an empty stack.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries on the stack.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The entry that resolves next.
    #[must_use]
    pub fn top(&self) -> Option<&StackEntry> {
        self.entries.back()
    }

    /// Find an entry by ID.
    #[must_use]
    pub fn get(&self, id: StackEntryId) -> Option<&StackEntry> {
        self.entries.iter().find(|e| e.id() == id)
    }

    /// Immutable bottom-to-top snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Vector<StackEntry> {
        self.entries.clone()
    }

    /// Put an entry on top, recording its insertion position.
    pub fn push(&mut self, mut entry: StackEntry) {
        entry.set_stack_index(self.entries.len());
        self.entries.push_back(entry);
    }

    /// Remove the top entry.
    pub fn pop_top(&mut self) -> Option<StackEntry> {
        self.entries.pop_back()
    }

    /// Remove an entry that is being countered.
    ///
    /// Entries marked uncounterable stay on the stack.
    pub fn counter(&mut self, id: StackEntryId) -> Result<StackEntry, ResolutionError> {
        let index = self
            .entries
            .iter()
            .position(|e| e.id() == id)
            .ok_or(ResolutionError::NotOnStack(id))?;

        if !self.entries[index].can_be_countered() {
            return Err(ResolutionError::Uncounterable(id));
        }

        Ok(self.entries.remove(index))
    }

    /// Remove every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{EntityId, PlayerId};

    fn entry(id: u32) -> StackEntry {
        StackEntry::spell(EntityId(10 + id), PlayerId::One, format!("Spell {id}"))
            .with_id(StackEntryId::new(id))
    }

    #[test]
    fn test_new_stack_is_empty() {
        let stack = StackEngine::new();
        assert!(stack.is_empty());
        assert_eq!(stack.len(), 0);
        assert!(stack.top().is_none());
    }

    #[test]
    fn test_push_records_index() {
        let mut stack = StackEngine::new();
        stack.push(entry(1));
        stack.push(entry(2));

        assert_eq!(stack.len(), 2);
        assert_eq!(stack.get(StackEntryId::new(1)).unwrap().stack_index(), 0);
        assert_eq!(stack.top().unwrap().stack_index(), 1);
    }

    #[test]
    fn test_pop_is_lifo() {
        let mut stack = StackEngine::new();
        for id in 1..=3 {
            stack.push(entry(id));
        }

        let popped: Vec<_> = std::iter::from_fn(|| stack.pop_top()).map(|e| e.id().raw()).collect();
        assert_eq!(popped, vec![3, 2, 1]);
    }

    #[test]
    fn test_snapshot_is_detached() {
        let mut stack = StackEngine::new();
        stack.push(entry(1));

        let snapshot = stack.snapshot();
        stack.push(entry(2));
        stack.pop_top();
        stack.pop_top();

        assert!(stack.is_empty());
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].id(), StackEntryId::new(1));
    }

    #[test]
    fn test_counter_removes_entry_below_top() {
        let mut stack = StackEngine::new();
        stack.push(entry(1));
        stack.push(entry(2));

        let countered = stack.counter(StackEntryId::new(1)).unwrap();
        assert_eq!(countered.id(), StackEntryId::new(1));
        assert_eq!(stack.len(), 1);
        assert_eq!(stack.top().unwrap().id(), StackEntryId::new(2));
    }

    #[test]
    fn test_counter_respects_uncounterable() {
        let mut stack = StackEngine::new();
        stack.push(entry(1).uncounterable());

        assert_eq!(
            stack.counter(StackEntryId::new(1)),
            Err(ResolutionError::Uncounterable(StackEntryId::new(1)))
        );
        assert_eq!(
            stack.counter(StackEntryId::new(9)),
            Err(ResolutionError::NotOnStack(StackEntryId::new(9)))
        );
        assert_eq!(stack.len(), 1);
    }
}
