//! Session configuration.
//!
//! Hosts configure a `GameSession` at startup with a `SessionConfig`:
//! who starts, which phase/step the game opens in, the auto-pass policy
//! and which built-in state-based checks to register.

use serde::{Deserialize, Serialize};

use super::PlayerId;
use crate::priority::AutoPassPolicy;
use crate::timing::Phase;

/// Configuration for a `GameSession`.
///
/// ```
/// use ccg_stack::core::{PlayerId, SessionConfig};
/// use ccg_stack::timing::Phase;
///
/// let config = SessionConfig::new()
///     .with_starting_player(PlayerId::Two)
///     .with_phase(Phase::PrecombatMain, "main")
///     .with_lethal_life_check();
///
/// assert_eq!(config.starting_player, PlayerId::Two);
/// assert!(config.lethal_life_check);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Player taking the first turn. Starts with priority.
    pub starting_player: PlayerId,

    /// Phase the game opens in.
    pub initial_phase: Phase,

    /// Step label the game opens in.
    pub initial_step: String,

    /// Auto-pass toggles.
    pub auto_pass: AutoPassPolicy,

    /// Start with full control (auto-pass suppressed).
    pub full_control: bool,

    /// Register the built-in "player at 0 life loses" check.
    pub lethal_life_check: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            starting_player: PlayerId::One,
            initial_phase: Phase::Beginning,
            initial_step: Phase::Beginning.default_step().to_string(),
            auto_pass: AutoPassPolicy::default(),
            full_control: false,
            lethal_life_check: false,
        }
    }
}

impl SessionConfig {
    /// Create the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the starting player.
    #[must_use]
    pub fn with_starting_player(mut self, player: PlayerId) -> Self {
        self.starting_player = player;
        self
    }

    /// Set the opening phase and step.
    #[must_use]
    pub fn with_phase(mut self, phase: Phase, step: impl Into<String>) -> Self {
        self.initial_phase = phase;
        self.initial_step = step.into();
        self
    }

    /// Set the auto-pass policy.
    #[must_use]
    pub fn with_auto_pass(mut self, policy: AutoPassPolicy) -> Self {
        self.auto_pass = policy;
        self
    }

    /// Start in full control mode.
    #[must_use]
    pub fn with_full_control(mut self) -> Self {
        self.full_control = true;
        self
    }

    /// Register the built-in lethal life check.
    #[must_use]
    pub fn with_lethal_life_check(mut self) -> Self {
        self.lethal_life_check = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SessionConfig::default();
        assert_eq!(config.starting_player, PlayerId::One);
        assert_eq!(config.initial_phase, Phase::Beginning);
        assert!(!config.full_control);
        assert!(!config.auto_pass.enabled);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: SessionConfig =
            serde_json::from_str(r#"{"starting_player":"Two","full_control":true}"#).unwrap();
        assert_eq!(config.starting_player, PlayerId::Two);
        assert!(config.full_control);
        assert_eq!(config.initial_phase, Phase::Beginning);
    }

    #[test]
    fn test_config_roundtrip() {
        let config = SessionConfig::new()
            .with_phase(Phase::PostcombatMain, "main 2")
            .with_full_control();
        let json = serde_json::to_string(&config).unwrap();
        let back: SessionConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, back);
    }
}
