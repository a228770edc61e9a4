//! Auto-pass policy.

use serde::{Deserialize, Serialize};

use crate::core::EntityId;
use crate::timing::{ActionKind, Phase};

/// A card in the priority player's hand, as seen by the auto-pass check.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandCard {
    pub card: EntityId,
    /// Fastest speed this card can be played at.
    pub speed: ActionKind,
}

impl HandCard {
    /// A card playable only at sorcery speed.
    #[must_use]
    pub const fn sorcery(card: EntityId) -> Self {
        Self { card, speed: ActionKind::SorcerySpeed }
    }

    /// A card playable at instant speed (instants, flash).
    #[must_use]
    pub const fn instant(card: EntityId) -> Self {
        Self { card, speed: ActionKind::InstantSpeed }
    }

    /// Could this card be played in response to something?
    #[must_use]
    pub const fn is_response(&self) -> bool {
        !matches!(self.speed, ActionKind::SorcerySpeed)
    }
}

/// The four auto-pass toggles.
///
/// Each toggle can only forbid an automatic pass; with `enabled` set and
/// every restriction satisfied, priority is passed automatically.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutoPassPolicy {
    /// Global switch.
    pub enabled: bool,
    /// Only auto-pass while the stack is empty.
    pub only_when_stack_empty: bool,
    /// Only auto-pass when the hand holds no instant-speed responses.
    pub only_without_responses: bool,
    /// Allow auto-passing during combat.
    pub during_combat: bool,
}

impl Default for AutoPassPolicy {
    fn default() -> Self {
        Self {
            enabled: false,
            only_when_stack_empty: true,
            only_without_responses: true,
            during_combat: false,
        }
    }
}

impl AutoPassPolicy {
    /// The default restrictions with the global switch turned on.
    #[must_use]
    pub fn enabled() -> Self {
        Self {
            enabled: true,
            ..Self::default()
        }
    }
}

/// What the auto-pass decision looks at.
#[derive(Clone, Copy, Debug)]
pub struct AutoPassView<'a> {
    pub stack_empty: bool,
    pub triggers_pending: bool,
    pub phase: Phase,
    pub hand: &'a [HandCard],
}

impl AutoPassPolicy {
    /// Should priority be passed without asking the player?
    ///
    /// Pure: never mutates anything. Short-circuits on the first toggle
    /// that forbids the pass.
    #[must_use]
    pub fn allows(&self, full_control: bool, view: &AutoPassView<'_>) -> bool {
        if !self.enabled || full_control {
            return false;
        }
        if self.only_when_stack_empty && !view.stack_empty {
            return false;
        }
        if view.triggers_pending {
            return false;
        }
        if self.only_without_responses && view.hand.iter().any(HandCard::is_response) {
            return false;
        }
        if view.phase == Phase::Combat && !self.during_combat {
            return false;
        }
        true
    }
}
