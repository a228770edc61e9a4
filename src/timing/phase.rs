//! Turn phases and action speeds.

use serde::{Deserialize, Serialize};

/// A phase of the turn.
///
/// The set is closed: an unknown phase cannot be constructed, so timing
/// updates never need runtime validation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Untap, upkeep, draw.
    Beginning,
    /// First main phase.
    PrecombatMain,
    /// Beginning of combat through end of combat.
    Combat,
    /// Second main phase.
    PostcombatMain,
    /// End step and cleanup.
    Ending,
}

impl Phase {
    /// All phases in turn order.
    pub const ALL: [Phase; 5] = [
        Phase::Beginning,
        Phase::PrecombatMain,
        Phase::Combat,
        Phase::PostcombatMain,
        Phase::Ending,
    ];

    /// Is this one of the two main phases?
    #[must_use]
    pub const fn is_main(self) -> bool {
        matches!(self, Phase::PrecombatMain | Phase::PostcombatMain)
    }

    /// The phase that follows this one. `Ending` wraps to `Beginning`.
    #[must_use]
    pub const fn next(self) -> Phase {
        match self {
            Phase::Beginning => Phase::PrecombatMain,
            Phase::PrecombatMain => Phase::Combat,
            Phase::Combat => Phase::PostcombatMain,
            Phase::PostcombatMain => Phase::Ending,
            Phase::Ending => Phase::Beginning,
        }
    }

    /// Step label a phase opens with.
    #[must_use]
    pub const fn default_step(self) -> &'static str {
        match self {
            Phase::Beginning => "upkeep",
            Phase::PrecombatMain => "main1",
            Phase::Combat => "begin_combat",
            Phase::PostcombatMain => "main2",
            Phase::Ending => "end",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Phase::Beginning => "beginning",
            Phase::PrecombatMain => "precombat main",
            Phase::Combat => "combat",
            Phase::PostcombatMain => "postcombat main",
            Phase::Ending => "ending",
        };
        f.write_str(name)
    }
}

/// The speed class of an action a player wants to take.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionKind {
    /// Own main phase, empty stack, holding priority.
    SorcerySpeed,
    /// Any time priority is held.
    InstantSpeed,
    /// Activating an ability of a permanent.
    Ability,
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ActionKind::SorcerySpeed => "sorcery-speed",
            ActionKind::InstantSpeed => "instant-speed",
            ActionKind::Ability => "ability",
        };
        f.write_str(name)
    }
}
