//! Trigger system for event-driven abilities.
//!
//! ## Key Components
//!
//! - [`EventTypeId`]: Opaque identifier for event types (game-defined)
//! - [`GameEvent`]: An event that occurred with contextual data
//! - [`TriggerCondition`]: Filters on the event
//! - [`Trigger`]: A trigger definition
//! - [`TriggerRegistry`]: Storage and lookup for triggers
//! - [`TriggerQueue`]: Fired triggers waiting to be put on the stack
//!
//! ## Flow
//!
//! An event fires (from an effect, from the engine after a resolution, or
//! from a state-based check). The registry builds a triggered-ability
//! entry for each matching trigger; the session stamps them and places
//! them in the queue. The queue is flushed onto the stack in one batch.
//!
//! ## Example Usage
//!
//! ```
//! use ccg_stack::core::{EntityId, PlayerId};
//! use ccg_stack::effects::Effect;
//! use ccg_stack::session::GameSession;
//! use ccg_stack::triggers::{EventTypeId, GameEvent, Trigger, TriggerCondition, TriggerId};
//!
//! const CARD_DRAWN: EventTypeId = EventTypeId::new(1);
//!
//! let mut session = GameSession::default();
//! session.register_trigger(
//!     Trigger::new(TriggerId::new(0), "Underworld Dreams", CARD_DRAWN, PlayerId::One)
//!         .with_source(EntityId(20))
//!         .with_condition(TriggerCondition::ForOpponent)
//!         .with_effect(Effect::damage(1)),
//! );
//!
//! session.fire_event(GameEvent::new(CARD_DRAWN).with_player(PlayerId::Two));
//! assert_eq!(session.pending_triggers().count(), 1);
//!
//! session.flush();
//! assert_eq!(session.peek_all().len(), 1);
//! ```

mod condition;
mod event;
mod queue;
mod registry;

pub use condition::TriggerCondition;
pub use event::{events, EventTypeId, GameEvent};
pub use queue::TriggerQueue;
pub use registry::{Trigger, TriggerId, TriggerRegistry, TriggerTargeting};
