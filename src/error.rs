//! Error types for the resolution engine.
//!
//! Two families exist:
//! - [`EngineError`]: a driving-layer request that violates the priority or
//!   timing contract. Returned to the caller; nothing is mutated.
//! - [`ResolutionError`]: an effect that could not be applied while an entry
//!   resolved. Logged and swallowed by the engine; the entry is still removed.

use thiserror::Error;

use crate::core::{EntityId, PlayerId};
use crate::stack::StackEntryId;
use crate::timing::ActionKind;

/// Caller-contract violations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("{player} does not hold priority ({holder} does)")]
    PriorityNotHeld { player: PlayerId, holder: PlayerId },

    #[error("{player} cannot take a {kind} action now")]
    IllegalTiming { player: PlayerId, kind: ActionKind },

    #[error("{0} is already in use")]
    DuplicateEntryId(StackEntryId),
}

/// Faults raised by an effect during resolution.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolutionError {
    #[error("invalid target {target}: {reason}")]
    InvalidTarget { target: EntityId, reason: &'static str },

    #[error("missing choice '{0}'")]
    MissingChoice(String),

    #[error("no cost was paid")]
    MissingCost,

    #[error("{0} is not on the stack")]
    NotOnStack(StackEntryId),

    #[error("{0} cannot be countered")]
    Uncounterable(StackEntryId),

    #[error("arithmetic overflow")]
    Overflow,
}

pub type Result<T> = std::result::Result<T, EngineError>;
