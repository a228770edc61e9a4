//! The authoritative game state threaded into resolution effects.
//!
//! The resolution engine never inspects this state itself. It only hands
//! it to stack entry effects and state-based checks, which read and write
//! the values games define.
//!
//! ## State Values (i64 only)
//!
//! Player, card and turn state are string-keyed `i64` maps:
//! - Booleans: use 0/1
//! - Entity references: use `EntityId.0` as i64
//! - Enums: use discriminant values

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::entity::EntityId;
use super::player::{PlayerId, PlayerMap};

/// Game state mutated by resolving effects.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    /// Per-player state (life, resources, flags) - games define keys.
    pub player_state: PlayerMap<FxHashMap<String, i64>>,

    /// Per-card state (damage, counters, flags) - games define keys.
    pub card_state: FxHashMap<EntityId, FxHashMap<String, i64>>,

    /// Per-turn state.
    pub turn_state: FxHashMap<String, i64>,
}

impl GameState {
    /// Create an empty game state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a state where both players start at `life`.
    #[must_use]
    pub fn with_life(life: i64) -> Self {
        let mut state = Self::new();
        for player in PlayerId::all() {
            state.set_player_state(player, "life", life);
        }
        state
    }

    // === Player State ===

    /// Get a player state value with default.
    #[must_use]
    pub fn get_player_state(&self, player: PlayerId, key: &str, default: i64) -> i64 {
        self.player_state[player].get(key).copied().unwrap_or(default)
    }

    /// Set a player state value.
    pub fn set_player_state(&mut self, player: PlayerId, key: impl Into<String>, value: i64) {
        self.player_state[player].insert(key.into(), value);
    }

    /// Modify a player state value by delta, saturating at the `i64` bounds.
    pub fn modify_player_state(&mut self, player: PlayerId, key: &str, delta: i64) {
        let value = self.player_state[player].entry(key.to_string()).or_insert(0);
        *value = value.saturating_add(delta);
    }

    // === Card State ===

    /// Get a card state value with default.
    #[must_use]
    pub fn get_card_state(&self, card: EntityId, key: &str, default: i64) -> i64 {
        self.card_state
            .get(&card)
            .and_then(|values| values.get(key).copied())
            .unwrap_or(default)
    }

    /// Set a card state value.
    pub fn set_card_state(&mut self, card: EntityId, key: impl Into<String>, value: i64) {
        self.card_state.entry(card).or_default().insert(key.into(), value);
    }

    /// Modify a card state value by delta, saturating at the `i64` bounds.
    pub fn modify_card_state(&mut self, card: EntityId, key: &str, delta: i64) {
        let value = self
            .card_state
            .entry(card)
            .or_default()
            .entry(key.to_string())
            .or_insert(0);
        *value = value.saturating_add(delta);
    }

    // === Turn State ===

    /// Get a turn state value with default.
    #[must_use]
    pub fn get_turn_state(&self, key: &str, default: i64) -> i64 {
        self.turn_state.get(key).copied().unwrap_or(default)
    }

    /// Set a turn state value.
    pub fn set_turn_state(&mut self, key: impl Into<String>, value: i64) {
        self.turn_state.insert(key.into(), value);
    }

    /// Modify a turn state value by delta, saturating at the `i64` bounds.
    pub fn modify_turn_state(&mut self, key: &str, delta: i64) {
        let value = self.turn_state.entry(key.to_string()).or_insert(0);
        *value = value.saturating_add(delta);
    }

    /// Clear per-turn state.
    pub fn clear_turn_state(&mut self) {
        self.turn_state.clear();
    }
}
