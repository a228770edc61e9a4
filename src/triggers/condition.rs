//! Trigger conditions.
//!
//! Conditions filter which events fire a trigger, beyond matching the
//! event type. They look only at the event and at the trigger's own
//! controller, so firing never needs the game state.

use serde::{Deserialize, Serialize};

use crate::core::{EntityId, PlayerId};

use super::event::GameEvent;

/// A condition that must be met for a trigger to fire.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TriggerCondition {
    // === Entity Filters ===

    /// Source must be a specific entity.
    SourceIs(EntityId),

    /// Target must be a specific entity.
    TargetIs(EntityId),

    /// Event must be for the specified player.
    ForPlayer(PlayerId),

    /// Event must be for the trigger's controller ("whenever you ...").
    ForController,

    /// Event must be for the controller's opponent ("whenever an opponent ...").
    ForOpponent,

    // === Value Filters ===

    /// Value at index must be at least N.
    ValueAtLeast { index: usize, min: i64 },

    /// Value at index must be at most N.
    ValueAtMost { index: usize, max: i64 },

    // === Tag Filters ===

    /// Event must have specified tag.
    HasTag(String),

    /// Event must not have specified tag.
    NotTag(String),

    // === Combinators ===

    /// All conditions must be true.
    All(Vec<TriggerCondition>),

    /// At least one condition must be true.
    Any(Vec<TriggerCondition>),

    /// Condition must be false.
    Not(Box<TriggerCondition>),

    // === Special ===

    /// Always matches (no filter).
    #[default]
    Always,

    /// Never matches.
    Never,
}

impl TriggerCondition {
    /// Create an AND condition.
    pub fn all(conditions: impl IntoIterator<Item = TriggerCondition>) -> Self {
        Self::All(conditions.into_iter().collect())
    }

    /// Create an OR condition.
    pub fn any(conditions: impl IntoIterator<Item = TriggerCondition>) -> Self {
        Self::Any(conditions.into_iter().collect())
    }

    /// Negate this condition.
    #[must_use]
    pub fn negate(self) -> Self {
        Self::Not(Box::new(self))
    }

    /// Add another condition with AND.
    #[must_use]
    pub fn and(self, other: TriggerCondition) -> Self {
        match self {
            Self::All(mut conditions) => {
                conditions.push(other);
                Self::All(conditions)
            }
            _ => Self::All(vec![self, other]),
        }
    }

    /// Check the condition against an event for a trigger controlled by
    /// `controller`.
    #[must_use]
    pub fn evaluate(&self, event: &GameEvent, controller: PlayerId) -> bool {
        match self {
            Self::SourceIs(entity) => event.source == Some(*entity),

            Self::TargetIs(entity) => event.target == Some(*entity),

            Self::ForPlayer(player) => event.player == Some(*player),

            Self::ForController => event.player == Some(controller),

            Self::ForOpponent => event.player == Some(controller.opponent()),

            Self::ValueAtLeast { index, min } => event.value(*index, i64::MIN) >= *min,

            Self::ValueAtMost { index, max } => event.value(*index, i64::MAX) <= *max,

            Self::HasTag(tag) => event.has_tag(tag),

            Self::NotTag(tag) => !event.has_tag(tag),

            Self::All(conditions) => conditions.iter().all(|c| c.evaluate(event, controller)),

            Self::Any(conditions) => conditions.iter().any(|c| c.evaluate(event, controller)),

            Self::Not(inner) => !inner.evaluate(event, controller),

            Self::Always => true,

            Self::Never => false,
        }
    }
}
