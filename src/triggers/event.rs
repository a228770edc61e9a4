//! Game event types.
//!
//! Events represent things that happen during a game. Games define what
//! events exist via `EventTypeId`; the engine itself fires only the two
//! built-in events in [`events`].

use serde::{Deserialize, Serialize};

use crate::core::{EntityId, PlayerId};

/// Event type identifier. Games define what event types exist.
///
/// The engine doesn't interpret these. IDs at the top of the `u32` range
/// are reserved for the built-in events.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventTypeId(pub u32);

impl EventTypeId {
    /// Create a new event type ID.
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

impl std::fmt::Display for EventTypeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "EventType({})", self.0)
    }
}

/// Events fired by the engine itself.
pub mod events {
    use super::EventTypeId;

    /// A stack entry finished resolving (successfully or not).
    ///
    /// Source = the entry's source, player = its controller,
    /// values[0] = the entry ID.
    pub const ENTRY_RESOLVED: EventTypeId = EventTypeId(u32::MAX);

    /// A state-based check changed the game.
    ///
    /// Tagged with the check's name.
    pub const STATE_BASED_ACTION: EventTypeId = EventTypeId(u32::MAX - 1);
}

/// A game event with contextual data.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameEvent {
    /// The type of event.
    pub event_type: EventTypeId,

    /// The entity that caused the event.
    pub source: Option<EntityId>,

    /// The entity affected by the event.
    pub target: Option<EntityId>,

    /// The player associated with the event.
    pub player: Option<PlayerId>,

    /// Numeric values; games define the meaning of each index.
    pub values: Vec<i64>,

    /// String keys for custom filtering.
    pub tags: Vec<String>,
}

impl GameEvent {
    /// Create a new event with just a type.
    pub fn new(event_type: EventTypeId) -> Self {
        Self {
            event_type,
            source: None,
            target: None,
            player: None,
            values: Vec::new(),
            tags: Vec::new(),
        }
    }

    /// Set the source entity (builder pattern).
    #[must_use]
    pub fn with_source(mut self, source: EntityId) -> Self {
        self.source = Some(source);
        self
    }

    /// Set the target entity (builder pattern).
    #[must_use]
    pub fn with_target(mut self, target: EntityId) -> Self {
        self.target = Some(target);
        self
    }

    /// Set the associated player (builder pattern).
    #[must_use]
    pub fn with_player(mut self, player: PlayerId) -> Self {
        self.player = Some(player);
        self
    }

    /// Add a numeric value (builder pattern).
    #[must_use]
    pub fn with_value(mut self, value: i64) -> Self {
        self.values.push(value);
        self
    }

    /// Add a tag (builder pattern).
    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Get a value by index, or a default.
    #[must_use]
    pub fn value(&self, index: usize, default: i64) -> i64 {
        self.values.get(index).copied().unwrap_or(default)
    }

    /// Check if event has a specific tag.
    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}
