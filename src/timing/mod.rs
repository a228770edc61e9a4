//! Timing gate.
//!
//! Answers "may player P take an action of this speed right now?" from the
//! current phase, the active player, the priority holder and whether the
//! stack is empty.
//!
//! The driving layer owns phase progression: it calls
//! `GameSession::update_timing` on every phase/step transition. The engine
//! never infers a transition on its own.

mod phase;

pub use phase::{ActionKind, Phase};

use serde::{Deserialize, Serialize};

use crate::core::PlayerId;

/// Turn/phase position plus the legality flags derived from it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameTiming {
    /// Turn number (starts at 1).
    pub turn: u32,

    /// Whose turn it is.
    pub active_player: PlayerId,

    /// Current phase.
    pub phase: Phase,

    /// Current step (free-form label).
    pub step: String,

    can_play_sorcery_speed: bool,
    can_play_instant_speed: bool,
    can_activate_abilities: bool,
}

impl GameTiming {
    /// Create timing for the first turn.
    ///
    /// Flags start closed until the first `refresh`.
    pub fn new(active_player: PlayerId, phase: Phase, step: impl Into<String>) -> Self {
        Self {
            turn: 1,
            active_player,
            phase,
            step: step.into(),
            can_play_sorcery_speed: false,
            can_play_instant_speed: false,
            can_activate_abilities: false,
        }
    }

    /// Store a new phase/step/active player.
    ///
    /// Derived flags are stale until `refresh` is called.
    pub(crate) fn update(&mut self, phase: Phase, step: impl Into<String>, active_player: PlayerId) {
        self.phase = phase;
        self.step = step.into();
        self.active_player = active_player;
    }

    /// Recompute the derived legality flags.
    ///
    /// Sorcery speed needs a main phase, an empty stack, and the active
    /// player holding priority. Instant speed and abilities are legal
    /// whenever priority is held.
    pub(crate) fn refresh(&mut self, priority_player: PlayerId, stack_empty: bool) {
        self.can_play_sorcery_speed =
            self.phase.is_main() && stack_empty && priority_player == self.active_player;
        self.can_play_instant_speed = true;
        self.can_activate_abilities = true;
    }

    #[must_use]
    pub fn can_play_sorcery_speed(&self) -> bool {
        self.can_play_sorcery_speed
    }

    #[must_use]
    pub fn can_play_instant_speed(&self) -> bool {
        self.can_play_instant_speed
    }

    #[must_use]
    pub fn can_activate_abilities(&self) -> bool {
        self.can_activate_abilities
    }

    /// Does the current window admit an action of `kind`?
    #[must_use]
    pub fn permits(&self, kind: ActionKind) -> bool {
        match kind {
            ActionKind::SorcerySpeed => self.can_play_sorcery_speed,
            ActionKind::InstantSpeed => self.can_play_instant_speed,
            ActionKind::Ability => self.can_activate_abilities,
        }
    }
}

/// Can `player` take an action of `kind` right now?
///
/// Fails unless `player` holds priority, then defers to the derived flag
/// for `kind`.
#[must_use]
pub fn can_play(
    timing: &GameTiming,
    kind: ActionKind,
    player: PlayerId,
    priority_player: PlayerId,
) -> bool {
    player == priority_player && timing.permits(kind)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn main_phase_timing() -> GameTiming {
        let mut timing = GameTiming::new(PlayerId::One, Phase::PrecombatMain, "main1");
        timing.refresh(PlayerId::One, true);
        timing
    }

    #[test]
    fn test_new_timing_is_closed() {
        let timing = GameTiming::new(PlayerId::One, Phase::PrecombatMain, "main1");
        assert!(!timing.permits(ActionKind::SorcerySpeed));
        assert!(!timing.permits(ActionKind::InstantSpeed));
        assert_eq!(timing.turn, 1);
    }

    #[test]
    fn test_sorcery_speed_open_in_main() {
        let timing = main_phase_timing();
        assert!(can_play(&timing, ActionKind::SorcerySpeed, PlayerId::One, PlayerId::One));
    }

    #[test]
    fn test_sorcery_speed_needs_empty_stack() {
        let mut timing = main_phase_timing();
        timing.refresh(PlayerId::One, false);
        assert!(!timing.can_play_sorcery_speed());
        assert!(timing.can_play_instant_speed());
    }

    #[test]
    fn test_sorcery_speed_needs_active_priority() {
        let mut timing = main_phase_timing();
        timing.refresh(PlayerId::Two, true);
        assert!(!can_play(&timing, ActionKind::SorcerySpeed, PlayerId::Two, PlayerId::Two));
        assert!(can_play(&timing, ActionKind::InstantSpeed, PlayerId::Two, PlayerId::Two));
    }

    #[test]
    fn test_requires_priority_for_every_kind() {
        let timing = main_phase_timing();
        for kind in [ActionKind::SorcerySpeed, ActionKind::InstantSpeed, ActionKind::Ability] {
            assert!(!can_play(&timing, kind, PlayerId::Two, PlayerId::One));
        }
    }

    #[test]
    fn test_update_stores_and_refresh_recomputes() {
        let mut timing = main_phase_timing();
        timing.update(Phase::Combat, "declare_attackers", PlayerId::One);
        assert_eq!(timing.step, "declare_attackers");
        // stale until refresh
        assert!(timing.can_play_sorcery_speed());

        timing.refresh(PlayerId::One, true);
        assert!(!timing.can_play_sorcery_speed());
        assert!(timing.can_activate_abilities());
    }
}
