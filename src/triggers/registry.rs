//! Trigger definitions and registry.
//!
//! A [`Trigger`] is a template: "whenever EVENT (and CONDITION), put an
//! entry with EFFECT on the stack". When an event fires, the registry
//! turns every matching trigger into a triggered-ability [`StackEntry`]
//! for the trigger queue.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::core::{EntityId, PlayerId};
use crate::effects::Effect;
use crate::stack::StackEntry;

use super::condition::TriggerCondition;
use super::event::{EventTypeId, GameEvent};

/// Unique identifier for a trigger.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TriggerId(pub u32);

impl TriggerId {
    /// Create a new trigger ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for TriggerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Trigger({})", self.0)
    }
}

/// How the triggered entry picks its targets from the event.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TriggerTargeting {
    /// No targets; player effects apply to the controller.
    #[default]
    None,
    /// Target the event's player.
    EventPlayer,
    /// Target the event's target entity.
    EventTarget,
    /// Target the event's source entity.
    EventSource,
}

/// A trigger definition.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trigger {
    /// Unique identifier. `TriggerId(0)` asks the registry to allocate one.
    pub id: TriggerId,

    /// Human-readable name, used as the stack entry name.
    pub name: String,

    /// The source entity that owns this trigger.
    /// `None` for global/game triggers (the controller becomes the source).
    pub source: Option<EntityId>,

    /// Who controls the triggered entry.
    pub controller: PlayerId,

    /// Event types this trigger listens for.
    pub event_types: Vec<EventTypeId>,

    /// Additional conditions beyond event type.
    pub condition: TriggerCondition,

    /// Target selection from the event.
    pub targeting: TriggerTargeting,

    /// Effect of the triggered entry.
    pub effect: Effect,

    /// Is this trigger currently active?
    pub enabled: bool,

    /// How many times can this trigger fire? `None` = unlimited.
    pub uses_remaining: Option<u32>,

    /// Can the triggered entry be countered?
    pub can_be_countered: bool,
}

impl Trigger {
    /// Create a new trigger.
    pub fn new(
        id: TriggerId,
        name: impl Into<String>,
        event_type: EventTypeId,
        controller: PlayerId,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            source: None,
            controller,
            event_types: vec![event_type],
            condition: TriggerCondition::Always,
            targeting: TriggerTargeting::None,
            effect: Effect::Noop,
            enabled: true,
            uses_remaining: None,
            can_be_countered: true,
        }
    }

    /// Set the source entity (builder pattern).
    #[must_use]
    pub fn with_source(mut self, source: EntityId) -> Self {
        self.source = Some(source);
        self
    }

    /// Add an event type to listen for (builder pattern).
    #[must_use]
    pub fn also_on(mut self, event_type: EventTypeId) -> Self {
        if !self.event_types.contains(&event_type) {
            self.event_types.push(event_type);
        }
        self
    }

    /// Set the condition (builder pattern).
    #[must_use]
    pub fn with_condition(mut self, condition: TriggerCondition) -> Self {
        self.condition = condition;
        self
    }

    /// Set target selection (builder pattern).
    #[must_use]
    pub fn with_targeting(mut self, targeting: TriggerTargeting) -> Self {
        self.targeting = targeting;
        self
    }

    /// Set the effect (builder pattern).
    #[must_use]
    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effect = effect;
        self
    }

    /// Set limited uses (builder pattern).
    #[must_use]
    pub fn with_uses(mut self, uses: u32) -> Self {
        self.uses_remaining = Some(uses);
        self
    }

    /// Make the triggered entry uncounterable (builder pattern).
    #[must_use]
    pub fn uncounterable(mut self) -> Self {
        self.can_be_countered = false;
        self
    }

    /// Check if this trigger can fire (enabled and has uses).
    #[must_use]
    pub fn can_fire(&self) -> bool {
        self.enabled && self.uses_remaining.is_none_or(|u| u > 0)
    }

    /// Consume one use of this trigger.
    pub fn use_trigger(&mut self) {
        if let Some(ref mut uses) = self.uses_remaining {
            *uses = uses.saturating_sub(1);
        }
    }

    /// Build the stack entry this trigger produces for `event`.
    #[must_use]
    pub fn to_entry(&self, event: &GameEvent) -> StackEntry {
        let source = self.source.unwrap_or(EntityId::player(self.controller));
        let mut entry = StackEntry::triggered(source, self.controller, self.name.clone())
            .with_effect(self.effect.clone())
            .with_description(format!("{} ({})", self.name, event.event_type));

        let target = match self.targeting {
            TriggerTargeting::None => None,
            TriggerTargeting::EventPlayer => event.player.map(EntityId::player),
            TriggerTargeting::EventTarget => event.target,
            TriggerTargeting::EventSource => event.source,
        };
        if let Some(target) = target {
            entry = entry.with_target(target);
        }
        if !self.can_be_countered {
            entry = entry.uncounterable();
        }
        entry
    }
}

/// Registry for triggers.
///
/// Stores triggers and indexes them by event type for fast lookup.
#[derive(Clone, Debug, Default)]
pub struct TriggerRegistry {
    /// All registered triggers.
    triggers: FxHashMap<TriggerId, Trigger>,

    /// Index by event type for fast lookup.
    by_event_type: FxHashMap<EventTypeId, Vec<TriggerId>>,

    /// Next trigger ID to allocate.
    next_id: u32,
}

impl TriggerRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            next_id: 1,
            ..Self::default()
        }
    }

    /// Register a trigger, returns its ID.
    ///
    /// A trigger with `TriggerId(0)` gets a freshly allocated ID; an
    /// explicit ID is kept (and replaces any trigger with the same ID).
    pub fn register(&mut self, mut trigger: Trigger) -> TriggerId {
        if trigger.id.0 == 0 {
            trigger.id = self.allocate_id();
        } else if let Some(next) = trigger.id.0.checked_add(1) {
            self.next_id = self.next_id.max(next);
        }
        let id = trigger.id;

        self.unregister(id);
        for event_type in &trigger.event_types {
            self.by_event_type.entry(*event_type).or_default().push(id);
        }
        self.triggers.insert(id, trigger);
        id
    }

    /// Next unused ID, wrapping past `u32::MAX` back to 1.
    fn allocate_id(&mut self) -> TriggerId {
        loop {
            let candidate = TriggerId::new(self.next_id.max(1));
            self.next_id = candidate.0.checked_add(1).unwrap_or(1);
            if !self.triggers.contains_key(&candidate) {
                return candidate;
            }
        }
    }

    /// Unregister a trigger.
    pub fn unregister(&mut self, id: TriggerId) -> Option<Trigger> {
        let trigger = self.triggers.remove(&id)?;
        for event_type in &trigger.event_types {
            if let Some(list) = self.by_event_type.get_mut(event_type) {
                list.retain(|&tid| tid != id);
                if list.is_empty() {
                    self.by_event_type.remove(event_type);
                }
            }
        }
        Some(trigger)
    }

    /// Get a trigger by ID.
    #[must_use]
    pub fn get(&self, id: TriggerId) -> Option<&Trigger> {
        self.triggers.get(&id)
    }

    /// Enable or disable a trigger.
    pub fn set_enabled(&mut self, id: TriggerId, enabled: bool) {
        if let Some(trigger) = self.triggers.get_mut(&id) {
            trigger.enabled = enabled;
        }
    }

    /// Remove all triggers owned by a source entity (it left play).
    pub fn remove_for_source(&mut self, source: EntityId) {
        let to_remove: Vec<_> = self
            .triggers
            .iter()
            .filter(|(_, t)| t.source == Some(source))
            .map(|(&id, _)| id)
            .collect();

        for id in to_remove {
            self.unregister(id);
        }
    }

    /// Get total trigger count.
    #[must_use]
    pub fn len(&self) -> usize {
        self.triggers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.triggers.is_empty()
    }

    /// Fire an event: build an entry for every matching trigger.
    ///
    /// Matching triggers consume one use each. Entries come back in
    /// trigger-ID order so firing is deterministic.
    pub fn fire(&mut self, event: &GameEvent) -> Vec<StackEntry> {
        let Some(trigger_ids) = self.by_event_type.get(&event.event_type) else {
            return Vec::new();
        };

        let mut matching: Vec<TriggerId> = trigger_ids
            .iter()
            .copied()
            .filter(|id| {
                self.triggers
                    .get(id)
                    .is_some_and(|t| t.can_fire() && t.condition.evaluate(event, t.controller))
            })
            .collect();
        matching.sort_unstable();

        matching
            .into_iter()
            .filter_map(|id| {
                let trigger = self.triggers.get_mut(&id)?;
                trigger.use_trigger();
                Some(trigger.to_entry(event))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stack::EntryKind;

    const SPELL_CAST: EventTypeId = EventTypeId::new(1);
    const LIFE_GAINED: EventTypeId = EventTypeId::new(2);

    #[test]
    fn test_register_allocates_ids() {
        let mut registry = TriggerRegistry::new();
        let a = registry.register(Trigger::new(TriggerId::new(0), "A", SPELL_CAST, PlayerId::One));
        let b = registry.register(Trigger::new(TriggerId::new(0), "B", SPELL_CAST, PlayerId::One));
        assert_ne!(a, b);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_register_explicit_id_bumps_allocator() {
        let mut registry = TriggerRegistry::new();
        registry.register(Trigger::new(TriggerId::new(10), "A", SPELL_CAST, PlayerId::One));
        let next = registry.register(Trigger::new(TriggerId::new(0), "B", SPELL_CAST, PlayerId::One));
        assert_eq!(next, TriggerId::new(11));
    }

    #[test]
    fn test_register_max_id_then_allocate() {
        let mut registry = TriggerRegistry::new();
        let watcher =
            |id: u32, name: &str| Trigger::new(TriggerId::new(id), name, SPELL_CAST, PlayerId::One);
        let first = registry.register(watcher(0, "A"));
        let last = registry.register(watcher(u32::MAX, "B"));
        let next = registry.register(watcher(0, "C"));

        assert_eq!(last, TriggerId::new(u32::MAX));
        assert_ne!(next, first);
        assert_ne!(next, last);
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_fire_builds_triggered_entry() {
        let mut registry = TriggerRegistry::new();
        registry.register(
            Trigger::new(TriggerId::new(1), "Punisher", SPELL_CAST, PlayerId::One)
                .with_source(EntityId(40))
                .with_condition(TriggerCondition::ForOpponent)
                .with_targeting(TriggerTargeting::EventPlayer)
                .with_effect(Effect::damage(1)),
        );

        let mine = GameEvent::new(SPELL_CAST).with_player(PlayerId::One);
        assert!(registry.fire(&mine).is_empty());

        let theirs = GameEvent::new(SPELL_CAST).with_player(PlayerId::Two);
        let entries = registry.fire(&theirs);
        assert_eq!(entries.len(), 1);
        let entry = &entries[0];
        assert_eq!(entry.kind(), EntryKind::TriggeredAbility);
        assert_eq!(entry.controller(), PlayerId::One);
        assert_eq!(entry.source(), EntityId(40));
        assert_eq!(entry.targets(), &[EntityId::player(PlayerId::Two)]);
        assert_eq!(entry.effect(), &Effect::damage(1));
    }

    #[test]
    fn test_fire_in_id_order() {
        let mut registry = TriggerRegistry::new();
        registry.register(Trigger::new(TriggerId::new(5), "Late", LIFE_GAINED, PlayerId::Two));
        registry.register(Trigger::new(TriggerId::new(2), "Early", LIFE_GAINED, PlayerId::One));

        let names: Vec<_> = registry
            .fire(&GameEvent::new(LIFE_GAINED))
            .iter()
            .map(|e| e.name().to_string())
            .collect();
        assert_eq!(names, vec!["Early", "Late"]);
    }

    #[test]
    fn test_limited_uses() {
        let mut registry = TriggerRegistry::new();
        let id = registry.register(
            Trigger::new(TriggerId::new(0), "Once", SPELL_CAST, PlayerId::One).with_uses(1),
        );

        assert_eq!(registry.fire(&GameEvent::new(SPELL_CAST)).len(), 1);
        assert!(registry.fire(&GameEvent::new(SPELL_CAST)).is_empty());
        assert_eq!(registry.get(id).unwrap().uses_remaining, Some(0));
    }

    #[test]
    fn test_disable_and_remove_for_source() {
        let mut registry = TriggerRegistry::new();
        let id = registry.register(
            Trigger::new(TriggerId::new(0), "Watcher", SPELL_CAST, PlayerId::One)
                .with_source(EntityId(9))
                .also_on(LIFE_GAINED),
        );

        registry.set_enabled(id, false);
        assert!(registry.fire(&GameEvent::new(SPELL_CAST)).is_empty());
        registry.set_enabled(id, true);
        assert_eq!(registry.fire(&GameEvent::new(LIFE_GAINED)).len(), 1);

        registry.remove_for_source(EntityId(9));
        assert!(registry.is_empty());
        assert!(registry.fire(&GameEvent::new(LIFE_GAINED)).is_empty());
    }
}
