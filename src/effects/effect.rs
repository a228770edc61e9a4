//! Effect descriptors.
//!
//! A stack entry's resolution is described by an [`Effect`]: a closed,
//! serializable set of tagged operations with typed payloads. Games give
//! meaning to state keys; the engine only applies them.

use serde::{Deserialize, Serialize};

use crate::error::ResolutionError;
use crate::stack::{StackEntry, StackEntryId};
use crate::triggers::EventTypeId;

/// A numeric amount, fixed or taken from the entry being resolved.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Amount {
    /// A constant.
    Fixed(i64),
    /// The cost paid when the entry was put on the stack (X spells).
    CostPaid,
    /// A value the controller chose when the entry was put on the stack.
    Choice(String),
    /// The negation of another amount.
    Negated(Box<Amount>),
}

impl Amount {
    /// Evaluate against the entry being resolved.
    pub fn evaluate(&self, entry: &StackEntry) -> Result<i64, ResolutionError> {
        match self {
            Amount::Fixed(value) => Ok(*value),
            Amount::CostPaid => entry.cost_paid().ok_or(ResolutionError::MissingCost),
            Amount::Choice(key) => entry
                .choice(key)
                .ok_or_else(|| ResolutionError::MissingChoice(key.clone())),
            Amount::Negated(inner) => inner
                .evaluate(entry)?
                .checked_neg()
                .ok_or(ResolutionError::Overflow),
        }
    }

    /// The negation of this amount.
    ///
    /// `Fixed(i64::MIN)` stays wrapped and faults when evaluated.
    #[must_use]
    pub fn negate(self) -> Self {
        match self {
            Amount::Fixed(value) => match value.checked_neg() {
                Some(negated) => Amount::Fixed(negated),
                None => Amount::Negated(Box::new(Amount::Fixed(value))),
            },
            Amount::Negated(inner) => *inner,
            other => Amount::Negated(Box::new(other)),
        }
    }
}

impl From<i64> for Amount {
    fn from(value: i64) -> Self {
        Amount::Fixed(value)
    }
}

/// An effect applied when a stack entry resolves.
///
/// ## Targets
///
/// Player effects apply to every player among the entry's targets, or to
/// the controller when the entry has no targets. Card effects apply to
/// every card target, or to the entry's source when it has none.
///
/// ## Stack Effects
///
/// - `Counter`: remove another entry from the stack before it resolves
///
/// ## Composite
///
/// - `Batch`: run effects in order, stopping at the first fault
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Effect {
    /// Does nothing.
    #[default]
    Noop,

    /// Add `delta` to a player state value.
    ModifyPlayerState { key: String, delta: Amount },

    /// Set a player state value.
    SetPlayerState { key: String, value: Amount },

    /// Add `delta` to a card state value.
    ModifyCardState { key: String, delta: Amount },

    /// Set a card state value.
    SetCardState { key: String, value: Amount },

    /// Add `delta` to a turn state value.
    ModifyTurnState { key: String, delta: Amount },

    /// Counter another entry on the stack.
    Counter(StackEntryId),

    /// Fire a game event so watching triggers are queued.
    Emit(EventTypeId),

    /// Execute multiple effects in sequence.
    Batch(Vec<Effect>),
}

impl Effect {
    /// Reduce each target's "life" by a fixed amount.
    pub fn damage(amount: i64) -> Self {
        Self::ModifyPlayerState {
            key: "life".to_string(),
            delta: Amount::Fixed(amount).negate(),
        }
    }

    /// Increase each target's "life" by a fixed amount.
    pub fn heal(amount: i64) -> Self {
        Self::ModifyPlayerState {
            key: "life".to_string(),
            delta: Amount::Fixed(amount),
        }
    }

    /// Reduce each target's "life" by the cost paid (X damage).
    pub fn damage_x() -> Self {
        Self::ModifyPlayerState {
            key: "life".to_string(),
            delta: Amount::CostPaid.negate(),
        }
    }

    /// Create a modify player state effect.
    pub fn modify_player(key: impl Into<String>, delta: impl Into<Amount>) -> Self {
        Self::ModifyPlayerState {
            key: key.into(),
            delta: delta.into(),
        }
    }

    /// Create a set player state effect.
    pub fn set_player(key: impl Into<String>, value: impl Into<Amount>) -> Self {
        Self::SetPlayerState {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Create a modify card state effect.
    pub fn modify_card(key: impl Into<String>, delta: impl Into<Amount>) -> Self {
        Self::ModifyCardState {
            key: key.into(),
            delta: delta.into(),
        }
    }

    /// Create a set card state effect.
    pub fn set_card(key: impl Into<String>, value: impl Into<Amount>) -> Self {
        Self::SetCardState {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Create a modify turn state effect.
    pub fn modify_turn(key: impl Into<String>, delta: impl Into<Amount>) -> Self {
        Self::ModifyTurnState {
            key: key.into(),
            delta: delta.into(),
        }
    }

    /// Counter the given stack entry.
    pub fn counter(target: StackEntryId) -> Self {
        Self::Counter(target)
    }

    /// Fire an event.
    pub fn emit(event_type: EventTypeId) -> Self {
        Self::Emit(event_type)
    }

    /// Combine multiple effects.
    pub fn batch(effects: impl IntoIterator<Item = Effect>) -> Self {
        Self::Batch(effects.into_iter().collect())
    }

    /// Chain this effect with another.
    #[must_use]
    pub fn then(self, other: Effect) -> Self {
        match self {
            Self::Batch(mut effects) => {
                effects.push(other);
                Self::Batch(effects)
            }
            Self::Noop => other,
            _ => Self::Batch(vec![self, other]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{EntityId, PlayerId};

    #[test]
    fn test_damage_heal() {
        assert_eq!(
            Effect::damage(3),
            Effect::ModifyPlayerState { key: "life".into(), delta: Amount::Fixed(-3) }
        );
        assert_eq!(
            Effect::heal(2),
            Effect::ModifyPlayerState { key: "life".into(), delta: Amount::Fixed(2) }
        );
    }

    #[test]
    fn test_then_flattens() {
        let effect = Effect::damage(1).then(Effect::heal(1)).then(Effect::Noop);
        match effect {
            Effect::Batch(effects) => assert_eq!(effects.len(), 3),
            other => panic!("expected batch, got {other:?}"),
        }
        assert_eq!(Effect::Noop.then(Effect::heal(1)), Effect::heal(1));
    }

    #[test]
    fn test_amount_evaluate() {
        let entry = StackEntry::spell(EntityId(5), PlayerId::One, "Fireball")
            .with_cost(4)
            .with_choice("mode", 2);

        assert_eq!(Amount::Fixed(7).evaluate(&entry), Ok(7));
        assert_eq!(Amount::CostPaid.evaluate(&entry), Ok(4));
        assert_eq!(Amount::Choice("mode".into()).evaluate(&entry), Ok(2));
        assert_eq!(
            Amount::Choice("color".into()).evaluate(&entry),
            Err(ResolutionError::MissingChoice("color".into()))
        );
    }

    #[test]
    fn test_negated_cost() {
        let entry = StackEntry::spell(EntityId(5), PlayerId::One, "Blaze").with_cost(3);
        assert_eq!(Amount::CostPaid.negate().evaluate(&entry), Ok(-3));
        assert_eq!(Amount::CostPaid.negate().negate(), Amount::CostPaid);
        assert_eq!(Amount::Fixed(2).negate(), Amount::Fixed(-2));
    }

    #[test]
    fn test_negating_min_faults_on_evaluate() {
        let entry = StackEntry::spell(EntityId(5), PlayerId::One, "Overload");
        let amount = Amount::Fixed(i64::MIN).negate();
        assert_eq!(amount, Amount::Negated(Box::new(Amount::Fixed(i64::MIN))));
        assert_eq!(amount.evaluate(&entry), Err(ResolutionError::Overflow));

        let huge = StackEntry::spell(EntityId(5), PlayerId::One, "Blaze").with_cost(i64::MIN);
        assert_eq!(Amount::CostPaid.negate().evaluate(&huge), Err(ResolutionError::Overflow));
    }

    #[test]
    fn test_missing_cost() {
        let entry = StackEntry::spell(EntityId(5), PlayerId::One, "Fireball");
        assert_eq!(Amount::CostPaid.evaluate(&entry), Err(ResolutionError::MissingCost));
    }
}
