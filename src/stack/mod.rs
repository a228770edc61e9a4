//! The resolution stack.
//!
//! Spells and abilities are pushed onto a stack and resolve in LIFO
//! order, one entry per resolution. This module holds the entry type and
//! the storage; `GameSession` drives pushes and resolutions together with
//! priority, triggers and state-based effects.
//!
//! ## Example Usage
//!
//! ```
//! use ccg_stack::core::{EntityId, GameState, PlayerId};
//! use ccg_stack::effects::Effect;
//! use ccg_stack::session::{GameSession, ResolveOutcome};
//! use ccg_stack::stack::StackEntry;
//!
//! let mut session = GameSession::default();
//! let mut state = GameState::with_life(20);
//!
//! let bolt = StackEntry::spell(EntityId(10), PlayerId::One, "Lightning Bolt")
//!     .with_effect(Effect::damage(3))
//!     .with_target(PlayerId::Two);
//! let id = session.push(bolt).unwrap();
//!
//! assert_eq!(session.resolve_top(&mut state), ResolveOutcome::Resolved(id));
//! assert_eq!(state.get_player_state(PlayerId::Two, "life", 0), 17);
//! ```

mod engine;
mod entry;

pub use engine::StackEngine;
pub use entry::{EntryKind, StackEntry, StackEntryId};
