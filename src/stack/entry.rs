//! Stack entries: spells and abilities waiting to resolve.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{EntityId, PlayerId};
use crate::effects::Effect;

/// Unique identifier for a stack entry.
///
/// `StackEntryId(0)` is reserved as "unassigned"; the session allocates a
/// real ID when the entry is pushed or queued.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StackEntryId(pub u32);

impl StackEntryId {
    /// Placeholder for entries not yet admitted.
    pub const UNASSIGNED: Self = Self(0);

    /// Create a new stack entry ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Has the session allocated this ID?
    #[must_use]
    pub const fn is_assigned(self) -> bool {
        self.0 != 0
    }
}

impl std::fmt::Display for StackEntryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "StackEntry({})", self.0)
    }
}

/// What kind of object an entry is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntryKind {
    /// A cast spell.
    Spell,
    /// An activated ability of a permanent.
    ActivatedAbility,
    /// A triggered ability put on the stack by the game.
    TriggeredAbility,
}

impl std::fmt::Display for EntryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            EntryKind::Spell => "spell",
            EntryKind::ActivatedAbility => "activated ability",
            EntryKind::TriggeredAbility => "triggered ability",
        };
        f.write_str(name)
    }
}

/// An entry on the stack.
///
/// Built by the driving layer with the builder methods below, then handed
/// to `GameSession::push` (or `add_trigger`). Once admitted, only the
/// engine assigns `id`, `timestamp` and `stack_index`; controller and kind
/// are fixed for the entry's lifetime.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackEntry {
    id: StackEntryId,
    source: EntityId,
    controller: PlayerId,
    kind: EntryKind,
    name: String,
    description: String,
    cost_paid: Option<i64>,
    targets: SmallVec<[EntityId; 2]>,
    choices: BTreeMap<String, i64>,
    timestamp: u64,
    stack_index: usize,
    effect: Effect,
    can_be_countered: bool,
}

impl StackEntry {
    /// Create a new entry of the given kind.
    pub fn new(
        kind: EntryKind,
        source: EntityId,
        controller: PlayerId,
        name: impl Into<String>,
    ) -> Self {
        Self {
            id: StackEntryId::UNASSIGNED,
            source,
            controller,
            kind,
            name: name.into(),
            description: String::new(),
            cost_paid: None,
            targets: SmallVec::new(),
            choices: BTreeMap::new(),
            timestamp: 0,
            stack_index: 0,
            effect: Effect::Noop,
            can_be_countered: true,
        }
    }

    /// Create a spell entry.
    pub fn spell(source: EntityId, controller: PlayerId, name: impl Into<String>) -> Self {
        Self::new(EntryKind::Spell, source, controller, name)
    }

    /// Create an activated ability entry.
    pub fn ability(source: EntityId, controller: PlayerId, name: impl Into<String>) -> Self {
        Self::new(EntryKind::ActivatedAbility, source, controller, name)
    }

    /// Create a triggered ability entry.
    pub fn triggered(source: EntityId, controller: PlayerId, name: impl Into<String>) -> Self {
        Self::new(EntryKind::TriggeredAbility, source, controller, name)
    }

    // === Builder ===

    /// Use an explicit ID instead of a session-allocated one.
    #[must_use]
    pub fn with_id(mut self, id: StackEntryId) -> Self {
        self.id = id;
        self
    }

    /// Set the effect applied on resolution.
    #[must_use]
    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effect = effect;
        self
    }

    /// Set the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Record the cost already paid.
    #[must_use]
    pub fn with_cost(mut self, cost: i64) -> Self {
        self.cost_paid = Some(cost);
        self
    }

    /// Add a target.
    #[must_use]
    pub fn with_target(mut self, target: impl Into<EntityId>) -> Self {
        self.targets.push(target.into());
        self
    }

    /// Add several targets.
    #[must_use]
    pub fn with_targets(mut self, targets: impl IntoIterator<Item = EntityId>) -> Self {
        self.targets.extend(targets);
        self
    }

    /// Record a player-made choice.
    #[must_use]
    pub fn with_choice(mut self, key: impl Into<String>, value: i64) -> Self {
        self.choices.insert(key.into(), value);
        self
    }

    /// Mark the entry as impossible to counter.
    #[must_use]
    pub fn uncounterable(mut self) -> Self {
        self.can_be_countered = false;
        self
    }

    // === Accessors ===

    #[must_use]
    pub fn id(&self) -> StackEntryId {
        self.id
    }

    #[must_use]
    pub fn source(&self) -> EntityId {
        self.source
    }

    #[must_use]
    pub fn controller(&self) -> PlayerId {
        self.controller
    }

    #[must_use]
    pub fn kind(&self) -> EntryKind {
        self.kind
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub fn cost_paid(&self) -> Option<i64> {
        self.cost_paid
    }

    #[must_use]
    pub fn targets(&self) -> &[EntityId] {
        &self.targets
    }

    /// Look up a choice by key.
    #[must_use]
    pub fn choice(&self, key: &str) -> Option<i64> {
        self.choices.get(key).copied()
    }

    #[must_use]
    pub fn choices(&self) -> &BTreeMap<String, i64> {
        &self.choices
    }

    /// Monotonic insertion timestamp.
    #[must_use]
    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }

    /// Stack position at insertion (0 = bottom). Display only.
    #[must_use]
    pub fn stack_index(&self) -> usize {
        self.stack_index
    }

    #[must_use]
    pub fn effect(&self) -> &Effect {
        &self.effect
    }

    #[must_use]
    pub fn can_be_countered(&self) -> bool {
        self.can_be_countered
    }

    // === Engine-only ===

    pub(crate) fn assign_id(&mut self, id: StackEntryId) {
        self.id = id;
    }

    pub(crate) fn stamp(&mut self, timestamp: u64) {
        self.timestamp = timestamp;
    }

    pub(crate) fn set_stack_index(&mut self, index: usize) {
        self.stack_index = index;
    }

    pub(crate) fn mark_triggered(&mut self) {
        self.kind = EntryKind::TriggeredAbility;
    }
}
