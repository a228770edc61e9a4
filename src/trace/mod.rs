//! Structured trace channel.
//!
//! Every significant engine step is published as an [`EngineEvent`] to
//! the session's subscribers and mirrored to `tracing` at debug level.
//! Nothing is printed; hosts attach a [`TraceSubscriber`] (or the
//! ready-made [`TraceBuffer`]) to observe the engine.

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::core::PlayerId;
use crate::error::ResolutionError;
use crate::priority::PassOutcome;
use crate::stack::{EntryKind, StackEntryId};
use crate::timing::Phase;

/// One observable engine step.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineEvent {
    /// An entry went on the stack.
    Pushed {
        entry: StackEntryId,
        kind: EntryKind,
        controller: PlayerId,
        name: String,
        depth: usize,
    },
    /// A player passed priority.
    Passed {
        player: PlayerId,
        passes: u8,
        outcome: PassOutcome,
    },
    /// An entry left the stack through resolution.
    Resolved { entry: StackEntryId, name: String },
    /// An entry's effect faulted. The entry is gone regardless.
    ResolutionFailed { entry: StackEntryId, error: String },
    /// A counter effect removed an entry.
    Countered {
        entry: StackEntryId,
        by: StackEntryId,
    },
    /// A triggered ability was queued.
    TriggerQueued { entry: StackEntryId, name: String },
    /// The trigger queue was moved onto the stack.
    TriggersFlushed { count: usize },
    /// A state-based check changed the game.
    StateBasedApplied { check: String },
    /// The driving layer moved the game to a new phase/step.
    TimingUpdated {
        turn: u32,
        phase: Phase,
        step: String,
        active_player: PlayerId,
    },
    /// Full control mode changed.
    FullControlToggled { enabled: bool },
}

impl EngineEvent {
    pub(crate) fn resolution_failed(entry: StackEntryId, error: &ResolutionError) -> Self {
        Self::ResolutionFailed {
            entry,
            error: error.to_string(),
        }
    }
}

/// Receives engine events.
pub trait TraceSubscriber {
    fn on_event(&mut self, event: &EngineEvent);
}

impl<F> TraceSubscriber for F
where
    F: FnMut(&EngineEvent),
{
    fn on_event(&mut self, event: &EngineEvent) {
        self(event)
    }
}

/// Shared in-memory collector.
///
/// Clones share one buffer: hand one clone to `GameSession::subscribe`
/// and keep the other to read what was recorded.
#[derive(Clone, Debug, Default)]
pub struct TraceBuffer {
    events: Rc<RefCell<Vec<EngineEvent>>>,
}

impl TraceBuffer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything recorded so far.
    #[must_use]
    pub fn events(&self) -> Vec<EngineEvent> {
        self.events.borrow().clone()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.events.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }

    /// Take every recorded event, leaving the buffer empty.
    pub fn drain(&self) -> Vec<EngineEvent> {
        std::mem::take(&mut *self.events.borrow_mut())
    }

    /// Count recorded events matching a predicate.
    pub fn count(&self, predicate: impl Fn(&EngineEvent) -> bool) -> usize {
        self.events.borrow().iter().filter(|e| predicate(e)).count()
    }
}

impl TraceSubscriber for TraceBuffer {
    fn on_event(&mut self, event: &EngineEvent) {
        self.events.borrow_mut().push(event.clone());
    }
}

/// Fan-out to the session's subscribers.
#[derive(Default)]
pub(crate) struct Tracer {
    subscribers: Vec<Box<dyn TraceSubscriber>>,
}

impl Tracer {
    pub(crate) fn subscribe(&mut self, subscriber: Box<dyn TraceSubscriber>) {
        self.subscribers.push(subscriber);
    }

    pub(crate) fn emit(&mut self, event: EngineEvent) {
        tracing::debug!(?event, "engine event");
        for subscriber in &mut self.subscribers {
            subscriber.on_event(&event);
        }
    }
}

impl std::fmt::Debug for Tracer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tracer")
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_clones_share_storage() {
        let buffer = TraceBuffer::new();
        let mut tracer = Tracer::default();
        tracer.subscribe(Box::new(buffer.clone()));

        tracer.emit(EngineEvent::TriggersFlushed { count: 2 });
        tracer.emit(EngineEvent::FullControlToggled { enabled: true });

        assert_eq!(buffer.len(), 2);
        assert_eq!(buffer.events()[0], EngineEvent::TriggersFlushed { count: 2 });

        let drained = buffer.drain();
        assert_eq!(drained.len(), 2);
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_closure_subscriber() {
        let seen = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&seen);

        let mut tracer = Tracer::default();
        tracer.subscribe(Box::new(move |_: &EngineEvent| *counter.borrow_mut() += 1));
        tracer.emit(EngineEvent::StateBasedApplied { check: "lethal_life".into() });

        assert_eq!(*seen.borrow(), 1);
    }

    #[test]
    fn test_event_serialization() {
        let event = EngineEvent::Passed {
            player: PlayerId::Two,
            passes: 1,
            outcome: PassOutcome::Continue,
        };
        let json = serde_json::to_string(&event).unwrap();
        let back: EngineEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(event, back);
    }

    #[test]
    fn test_count_filters() {
        let buffer = TraceBuffer::new();
        let mut tracer = Tracer::default();
        tracer.subscribe(Box::new(buffer.clone()));
        tracer.emit(EngineEvent::TriggersFlushed { count: 1 });
        tracer.emit(EngineEvent::TriggersFlushed { count: 3 });
        tracer.emit(EngineEvent::FullControlToggled { enabled: false });

        assert_eq!(
            buffer.count(|e| matches!(e, EngineEvent::TriggersFlushed { .. })),
            2
        );
    }
}
