//! Priority tracking.
//!
//! The active player (whose turn it is) and the priority player (who must
//! act now) are separate. Priority alternates on every pass; two
//! consecutive passes produce an outcome: resolve the top of the stack,
//! or, on an empty stack, advance the phase.

mod auto_pass;

pub use auto_pass::{AutoPassPolicy, AutoPassView, HandCard};

use serde::{Deserialize, Serialize};

use crate::core::PlayerId;

/// Consecutive passes that end a round of priority.
pub const PASSES_TO_END_ROUND: u8 = 2;

/// Result of a priority pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PassOutcome {
    /// Priority moved to the other player.
    Continue,
    /// Both players passed; the top of the stack resolved.
    Resolve,
    /// Both players passed on an empty stack; the driving layer should
    /// move to the next step/phase.
    AdvancePhase,
    /// The pass counter was corrupt; it was reset and nothing happened.
    NoOp,
}

/// What `record_pass` observed, before the session acts on it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum PassStep {
    /// Priority flipped.
    Flipped,
    /// Both players passed; the counter must be consumed.
    BothPassed,
    /// The counter was out of range and has been reset.
    Invalid,
}

/// Priority state for one game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorityState {
    active_player: PlayerId,
    priority_player: PlayerId,
    consecutive_passes: u8,
    full_control: bool,
    auto_pass: AutoPassPolicy,
}

impl PriorityState {
    /// Start with `active_player` holding priority.
    pub fn new(active_player: PlayerId, auto_pass: AutoPassPolicy, full_control: bool) -> Self {
        Self {
            active_player,
            priority_player: active_player,
            consecutive_passes: 0,
            full_control,
            auto_pass,
        }
    }

    #[must_use]
    pub fn active_player(&self) -> PlayerId {
        self.active_player
    }

    #[must_use]
    pub fn priority_player(&self) -> PlayerId {
        self.priority_player
    }

    #[must_use]
    pub fn consecutive_passes(&self) -> u8 {
        self.consecutive_passes
    }

    #[must_use]
    pub fn full_control(&self) -> bool {
        self.full_control
    }

    #[must_use]
    pub fn auto_pass(&self) -> AutoPassPolicy {
        self.auto_pass
    }

    pub fn set_auto_pass(&mut self, policy: AutoPassPolicy) {
        self.auto_pass = policy;
    }

    /// Flip full control mode and return the new value.
    pub fn toggle_full_control(&mut self) -> bool {
        self.full_control = !self.full_control;
        self.full_control
    }

    /// Set the active player (turn change).
    pub fn set_active_player(&mut self, player: PlayerId) {
        self.active_player = player;
    }

    /// Give `player` priority with a fresh pass count.
    pub fn grant(&mut self, player: PlayerId) {
        self.priority_player = player;
        self.consecutive_passes = 0;
    }

    /// Give priority back to the active player with a fresh pass count.
    pub fn grant_to_active(&mut self) {
        self.grant(self.active_player);
    }

    /// Reset the pass count, keeping the holder.
    pub fn reset_passes(&mut self) {
        self.consecutive_passes = 0;
    }

    /// Record a pass by the current holder.
    pub(crate) fn record_pass(&mut self) -> PassStep {
        if self.consecutive_passes >= PASSES_TO_END_ROUND {
            self.consecutive_passes = 0;
            return PassStep::Invalid;
        }

        self.consecutive_passes += 1;
        if self.consecutive_passes < PASSES_TO_END_ROUND {
            self.priority_player = self.priority_player.opponent();
            PassStep::Flipped
        } else {
            PassStep::BothPassed
        }
    }

    /// Auto-pass decision for the current holder. Never mutates.
    #[must_use]
    pub fn should_auto_pass(&self, view: &AutoPassView<'_>) -> bool {
        self.auto_pass.allows(self.full_control, view)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> PriorityState {
        PriorityState::new(PlayerId::One, AutoPassPolicy::default(), false)
    }

    #[test]
    fn test_new_gives_active_priority() {
        let priority = state();
        assert_eq!(priority.active_player(), PlayerId::One);
        assert_eq!(priority.priority_player(), PlayerId::One);
        assert_eq!(priority.consecutive_passes(), 0);
    }

    #[test]
    fn test_first_pass_flips() {
        let mut priority = state();
        assert_eq!(priority.record_pass(), PassStep::Flipped);
        assert_eq!(priority.priority_player(), PlayerId::Two);
        assert_eq!(priority.consecutive_passes(), 1);
    }

    #[test]
    fn test_second_pass_ends_round_without_flipping() {
        let mut priority = state();
        priority.record_pass();
        assert_eq!(priority.record_pass(), PassStep::BothPassed);
        assert_eq!(priority.priority_player(), PlayerId::Two);
        assert_eq!(priority.consecutive_passes(), 2);
    }

    #[test]
    fn test_unconsumed_round_is_invalid() {
        let mut priority = state();
        priority.record_pass();
        priority.record_pass();
        assert_eq!(priority.record_pass(), PassStep::Invalid);
        assert_eq!(priority.consecutive_passes(), 0);
    }

    #[test]
    fn test_grant_resets_passes() {
        let mut priority = state();
        priority.record_pass();
        priority.grant(PlayerId::One);
        assert_eq!(priority.consecutive_passes(), 0);
        assert_eq!(priority.priority_player(), PlayerId::One);
    }

    #[test]
    fn test_toggle_full_control() {
        let mut priority = state();
        assert!(priority.toggle_full_control());
        assert!(priority.full_control());
        assert!(!priority.toggle_full_control());
    }

    #[test]
    fn test_deserialized_corrupt_counter_is_invalid() {
        let json = r#"{"active_player":"One","priority_player":"Two","consecutive_passes":7,
            "full_control":false,"auto_pass":{}}"#;
        let mut priority: PriorityState = serde_json::from_str(json).unwrap();
        assert_eq!(priority.record_pass(), PassStep::Invalid);
        assert_eq!(priority.consecutive_passes(), 0);
        assert_eq!(priority.priority_player(), PlayerId::Two);
    }
}
