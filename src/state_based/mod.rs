//! State-based effect checks.
//!
//! A state-based effect is a game rule applied automatically whenever its
//! condition holds ("a player at 0 life loses"). Each registered check
//! inspects the state, applies its rule if needed, and reports whether it
//! changed anything.
//!
//! `check_all` runs every check exactly once. It does not loop to a fixed
//! point; the driving loop calls it again when it needs to.

use smallvec::SmallVec;

use crate::core::{GameState, PlayerId};

type CheckFn = Box<dyn Fn(&mut GameState) -> bool>;

/// A named state-based check.
pub struct StateBasedCheck {
    name: String,
    check: CheckFn,
}

impl StateBasedCheck {
    /// Create a check from a closure returning whether it changed the state.
    pub fn new(name: impl Into<String>, check: impl Fn(&mut GameState) -> bool + 'static) -> Self {
        Self {
            name: name.into(),
            check: Box::new(check),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Run the check once.
    pub fn apply(&self, state: &mut GameState) -> bool {
        (self.check)(state)
    }
}

impl std::fmt::Debug for StateBasedCheck {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateBasedCheck").field("name", &self.name).finish()
    }
}

/// Registry of state-based checks, run in registration order.
#[derive(Debug, Default)]
pub struct StateBasedEffects {
    checks: Vec<StateBasedCheck>,
}

impl StateBasedEffects {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a check.
    pub fn register(&mut self, check: StateBasedCheck) {
        self.checks.push(check);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.checks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }

    /// Run every check once. Returns the names of the checks that
    /// changed the state, in registration order.
    pub fn check_all(&self, state: &mut GameState) -> SmallVec<[String; 2]> {
        self.checks
            .iter()
            .filter(|check| check.apply(state))
            .map(|check| check.name.clone())
            .collect()
    }
}

/// Name of the built-in lethal life check.
pub const LETHAL_LIFE: &str = "lethal_life";

/// Built-in check: a player at or below 0 life gets `lost = 1`.
///
/// Reports a change only the first time a player is marked.
#[must_use]
pub fn lethal_life() -> StateBasedCheck {
    StateBasedCheck::new(LETHAL_LIFE, |state| {
        let mut changed = false;
        for player in PlayerId::all() {
            let dead = state.get_player_state(player, "life", 1) <= 0;
            if dead && state.get_player_state(player, "lost", 0) == 0 {
                state.set_player_state(player, "lost", 1);
                changed = true;
            }
        }
        changed
    })
}
