//! # ccg-stack
//!
//! A stack-based spell and ability resolution engine for two-player card
//! games: the part of a rules engine that decides who may act, in what
//! order pending spells and abilities resolve, and what happens when both
//! players pass.
//!
//! ## Design Principles
//!
//! 1. **One Aggregate**: All mutable engine state lives in a
//!    [`GameSession`]. No globals; sessions never share anything.
//!
//! 2. **Strict LIFO**: The most recently added entry always resolves next,
//!    whatever its timestamp.
//!
//! 3. **Faults Stay Inside**: An effect that cannot be applied is logged
//!    and traced; the entry still leaves the stack and play continues.
//!
//! ## Architecture
//!
//! - **Persistent Data Structures**: `im::Vector` backs the stack, so
//!   `peek_all` snapshots are O(1) and never alias engine storage.
//!
//! - **Closed Effect Set**: Effects are plain data ([`Effect`]) applied by
//!   the resolver, so entries can be serialized and compared.
//!
//! - **State Values**: Game state is a set of `i64` key/value maps the
//!   host interprets ("life", "power", "lost").
//!
//! ## Modules
//!
//! - `core`: Entity IDs, players, game state, configuration
//! - `effects`: Effect descriptors and the resolver
//! - `stack`: Stack entries and LIFO storage
//! - `priority`: Priority passing and auto-pass policy
//! - `timing`: Phases and the sorcery/instant timing gate
//! - `triggers`: Events, trigger templates and the pending-trigger queue
//! - `state_based`: State-based effect checks
//! - `trace`: Structured engine events for observers
//! - `session`: The `GameSession` aggregate

pub mod core;
pub mod error;
pub mod effects;
pub mod stack;
pub mod priority;
pub mod timing;
pub mod triggers;
pub mod state_based;
pub mod trace;
pub mod session;

// Re-export commonly used types
pub use crate::core::{EntityId, GameState, PlayerId, PlayerMap, SessionConfig};

pub use crate::effects::{Amount, Effect};

pub use crate::error::{EngineError, ResolutionError};

pub use crate::stack::{EntryKind, StackEntry, StackEntryId};

pub use crate::priority::{AutoPassPolicy, HandCard, PassOutcome};

pub use crate::timing::{ActionKind, GameTiming, Phase};

pub use crate::triggers::{events, EventTypeId, GameEvent, Trigger, TriggerCondition, TriggerId};

pub use crate::state_based::StateBasedCheck;

pub use crate::trace::{EngineEvent, TraceBuffer, TraceSubscriber};

pub use crate::session::{GameSession, ResolveOutcome};
