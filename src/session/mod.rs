//! The game session: one aggregate owning the stack, priority, timing,
//! trigger queue and state-based checks for a single game.
//!
//! Every operation the driving layer performs goes through a
//! [`GameSession`]. There is no global state; two sessions never share
//! anything.
//!
//! ## Example
//!
//! ```
//! use ccg_stack::core::{EntityId, GameState, PlayerId};
//! use ccg_stack::effects::Effect;
//! use ccg_stack::priority::PassOutcome;
//! use ccg_stack::session::GameSession;
//! use ccg_stack::stack::StackEntry;
//!
//! let mut session = GameSession::default();
//! let mut state = GameState::with_life(20);
//!
//! let bolt = StackEntry::spell(EntityId(10), PlayerId::One, "Lightning Bolt")
//!     .with_effect(Effect::damage(3))
//!     .with_target(PlayerId::Two);
//! session.push(bolt).unwrap();
//!
//! assert_eq!(session.pass_priority(&mut state), PassOutcome::Continue);
//! assert_eq!(session.pass_priority(&mut state), PassOutcome::Resolve);
//! assert_eq!(state.get_player_state(PlayerId::Two, "life", 0), 17);
//! ```

use im::Vector;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::{GameState, PlayerId, SessionConfig};
use crate::effects::{EffectResolver, ResolverContext};
use crate::error::{EngineError, Result};
use crate::priority::{AutoPassPolicy, AutoPassView, HandCard, PassOutcome, PassStep, PriorityState};
use crate::stack::{StackEngine, StackEntry, StackEntryId};
use crate::state_based::{self, StateBasedCheck, StateBasedEffects};
use crate::timing::{self, ActionKind, GameTiming, Phase};
use crate::trace::{EngineEvent, TraceSubscriber, Tracer};
use crate::triggers::{events, GameEvent, Trigger, TriggerId, TriggerQueue, TriggerRegistry};

/// Result of `resolve_top`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResolveOutcome {
    /// The entry with this ID left the stack.
    Resolved(StackEntryId),
    /// The stack was empty.
    NoOp,
}

/// A single game's resolution engine.
#[derive(Debug)]
pub struct GameSession {
    stack: StackEngine,
    priority: PriorityState,
    timing: GameTiming,
    queue: TriggerQueue,
    registry: TriggerRegistry,
    checks: StateBasedEffects,
    tracer: Tracer,
    /// Next stack entry ID to hand out.
    next_id: u32,
    /// Last timestamp handed out.
    clock: u64,
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

impl GameSession {
    /// Create a session from configuration.
    pub fn new(config: SessionConfig) -> Self {
        let SessionConfig {
            starting_player,
            initial_phase,
            initial_step,
            auto_pass,
            full_control,
            lethal_life_check,
        } = config;

        let mut checks = StateBasedEffects::new();
        if lethal_life_check {
            checks.register(state_based::lethal_life());
        }

        let mut session = Self {
            stack: StackEngine::new(),
            priority: PriorityState::new(starting_player, auto_pass, full_control),
            timing: GameTiming::new(starting_player, initial_phase, initial_step),
            queue: TriggerQueue::new(),
            registry: TriggerRegistry::new(),
            checks,
            tracer: Tracer::default(),
            next_id: 1,
            clock: 0,
        };
        session.refresh_timing();
        session
    }

    // === Stack ===

    /// Put an entry on the stack on behalf of its controller.
    ///
    /// The controller must hold priority, and an explicit ID must not
    /// belong to an entry already on the stack or queued. On success the
    /// controller keeps priority (so they may respond to their own entry)
    /// and the pass count restarts. Returns the entry's ID.
    pub fn push(&mut self, mut entry: StackEntry) -> Result<StackEntryId> {
        let holder = self.priority.priority_player();
        if entry.controller() != holder {
            return Err(EngineError::PriorityNotHeld {
                player: entry.controller(),
                holder,
            });
        }
        if entry.id().is_assigned() && self.id_in_use(entry.id()) {
            return Err(EngineError::DuplicateEntryId(entry.id()));
        }

        self.admit(&mut entry);
        Ok(self.place(entry))
    }

    /// Check timing for `kind`, then push.
    pub fn play(&mut self, kind: ActionKind, entry: StackEntry) -> Result<StackEntryId> {
        let player = entry.controller();
        let holder = self.priority.priority_player();
        if player != holder {
            return Err(EngineError::PriorityNotHeld { player, holder });
        }
        if !self.can_play(kind, player) {
            return Err(EngineError::IllegalTiming { player, kind });
        }
        self.push(entry)
    }

    /// Resolve the top entry of the stack.
    ///
    /// A fault raised by the entry's effect is logged and swallowed; the
    /// entry is removed either way. Afterwards events fired by the
    /// resolution are matched against registered triggers, state-based
    /// checks run once, pending triggers are flushed and priority goes
    /// back to the active player.
    pub fn resolve_top(&mut self, state: &mut GameState) -> ResolveOutcome {
        let Some(entry) = self.stack.pop_top() else {
            return ResolveOutcome::NoOp;
        };
        let id = entry.id();
        debug!(entry = %id, name = entry.name(), controller = %entry.controller(), "resolving");

        let mut ctx = ResolverContext::new(state, &mut self.stack, &entry);
        let result = EffectResolver::resolve_entry(&mut ctx);
        let ResolverContext { events: fired, countered, .. } = ctx;

        if let Err(error) = &result {
            warn!(entry = %id, %error, "resolution failed");
            self.tracer.emit(EngineEvent::resolution_failed(id, error));
        }
        for removed in &countered {
            debug!(entry = %removed.id(), by = %id, "countered");
            self.tracer.emit(EngineEvent::Countered { entry: removed.id(), by: id });
        }
        self.tracer.emit(EngineEvent::Resolved {
            entry: id,
            name: entry.name().to_string(),
        });

        self.priority.reset_passes();

        for event in fired {
            self.fire_event(event);
        }
        self.fire_event(
            GameEvent::new(events::ENTRY_RESOLVED)
                .with_source(entry.source())
                .with_player(entry.controller())
                .with_value(i64::from(id.raw())),
        );

        self.check_all(state);
        self.flush();

        self.priority.grant_to_active();
        self.refresh_timing();
        ResolveOutcome::Resolved(id)
    }

    /// Clear the stack, the trigger queue and the pass counter.
    ///
    /// Registered triggers and checks are kept.
    pub fn reset(&mut self) {
        self.stack.clear();
        self.queue.clear();
        self.priority.reset_passes();
        self.refresh_timing();
    }

    /// Bottom-to-top snapshot of the stack; the last element resolves next.
    #[must_use]
    pub fn peek_all(&self) -> Vector<StackEntry> {
        self.stack.snapshot()
    }

    /// Read-only view of the stack.
    #[must_use]
    pub fn stack(&self) -> &StackEngine {
        &self.stack
    }

    // === Priority ===

    /// The current holder passes priority.
    ///
    /// The first pass hands priority to the opponent. The second
    /// consecutive pass resolves the top of the stack, or, on an empty
    /// stack, tells the caller to advance the phase.
    pub fn pass_priority(&mut self, state: &mut GameState) -> PassOutcome {
        let player = self.priority.priority_player();

        let outcome = match self.priority.record_pass() {
            PassStep::Invalid => {
                warn!(player = %player, "pass counter out of range; reset");
                PassOutcome::NoOp
            }
            PassStep::Flipped => PassOutcome::Continue,
            PassStep::BothPassed if self.stack.is_empty() => PassOutcome::AdvancePhase,
            PassStep::BothPassed => PassOutcome::Resolve,
        };

        let passes = self.priority.consecutive_passes();
        debug!(player = %player, passes, ?outcome, "priority passed");
        self.tracer.emit(EngineEvent::Passed { player, passes, outcome });

        match outcome {
            PassOutcome::Resolve => {
                self.resolve_top(state);
                self.priority.reset_passes();
            }
            PassOutcome::AdvancePhase => self.priority.reset_passes(),
            PassOutcome::Continue | PassOutcome::NoOp => {}
        }
        self.refresh_timing();
        outcome
    }

    /// Should the current holder pass automatically?
    ///
    /// `hand` is the holder's hand at the moment of the call. Pure.
    #[must_use]
    pub fn should_auto_pass(&self, hand: &[HandCard]) -> bool {
        let view = AutoPassView {
            stack_empty: self.stack.is_empty(),
            triggers_pending: !self.queue.is_empty(),
            phase: self.timing.phase,
            hand,
        };
        self.priority.should_auto_pass(&view)
    }

    /// Flip full control mode. Returns the new value.
    pub fn toggle_full_control(&mut self) -> bool {
        let enabled = self.priority.toggle_full_control();
        self.tracer.emit(EngineEvent::FullControlToggled { enabled });
        enabled
    }

    /// Replace the auto-pass policy.
    pub fn set_auto_pass(&mut self, policy: AutoPassPolicy) {
        self.priority.set_auto_pass(policy);
    }

    #[must_use]
    pub fn auto_pass(&self) -> AutoPassPolicy {
        self.priority.auto_pass()
    }

    #[must_use]
    pub fn full_control(&self) -> bool {
        self.priority.full_control()
    }

    #[must_use]
    pub fn priority_player(&self) -> PlayerId {
        self.priority.priority_player()
    }

    #[must_use]
    pub fn active_player(&self) -> PlayerId {
        self.priority.active_player()
    }

    #[must_use]
    pub fn consecutive_passes(&self) -> u8 {
        self.priority.consecutive_passes()
    }

    // === Timing ===

    /// May `player` take an action of `kind` right now?
    #[must_use]
    pub fn can_play(&self, kind: ActionKind, player: PlayerId) -> bool {
        timing::can_play(&self.timing, kind, player, self.priority.priority_player())
    }

    /// Move to a new phase/step.
    ///
    /// The new active player receives priority with a fresh pass count.
    pub fn update_timing(&mut self, phase: Phase, step: impl Into<String>, active_player: PlayerId) {
        self.timing.update(phase, step, active_player);
        self.priority.set_active_player(active_player);
        self.priority.grant(active_player);
        self.refresh_timing();

        debug!(turn = self.timing.turn, %phase, step = %self.timing.step, %active_player, "timing updated");
        self.tracer.emit(EngineEvent::TimingUpdated {
            turn: self.timing.turn,
            phase,
            step: self.timing.step.clone(),
            active_player,
        });
    }

    /// Move to the next phase at its default step.
    ///
    /// Leaving the ending phase starts the opponent's turn.
    pub fn advance_phase(&mut self) -> Phase {
        let current = self.timing.phase;
        let next = current.next();
        let mut active = self.timing.active_player;
        if current == Phase::Ending {
            active = active.opponent();
            self.timing.turn += 1;
        }
        self.update_timing(next, next.default_step(), active);
        next
    }

    #[must_use]
    pub fn current_timing(&self) -> &GameTiming {
        &self.timing
    }

    // === Triggers ===

    /// Queue a triggered ability. The stack is not touched until `flush`.
    ///
    /// An explicit ID already in use is replaced by a fresh one.
    pub fn add_trigger(&mut self, mut entry: StackEntry) -> StackEntryId {
        self.admit(&mut entry);
        entry.mark_triggered();

        let id = entry.id();
        debug!(entry = %id, name = entry.name(), timestamp = entry.timestamp(), "trigger queued");
        self.tracer.emit(EngineEvent::TriggerQueued {
            entry: id,
            name: entry.name().to_string(),
        });
        self.queue.add(entry);
        id
    }

    /// Move every pending trigger onto the stack, oldest first.
    ///
    /// Returns how many entries were pushed. An empty queue does nothing.
    pub fn flush(&mut self) -> usize {
        if self.queue.is_empty() {
            return 0;
        }

        let pending = self.queue.drain_ordered();
        let count = pending.len();
        for entry in pending {
            self.place(entry);
        }

        debug!(count, "triggers flushed");
        self.tracer.emit(EngineEvent::TriggersFlushed { count });
        count
    }

    /// Queue an entry for every registered trigger matching `event`.
    ///
    /// Returns how many triggers fired.
    pub fn fire_event(&mut self, event: GameEvent) -> usize {
        let fired = self.registry.fire(&event);
        let count = fired.len();
        for entry in fired {
            self.add_trigger(entry);
        }
        count
    }

    /// Register a trigger template.
    pub fn register_trigger(&mut self, trigger: Trigger) -> TriggerId {
        self.registry.register(trigger)
    }

    /// Remove a trigger template.
    pub fn unregister_trigger(&mut self, id: TriggerId) -> Option<Trigger> {
        self.registry.unregister(id)
    }

    /// Registered trigger templates.
    #[must_use]
    pub fn triggers(&self) -> &TriggerRegistry {
        &self.registry
    }

    /// Mutable access to the templates, e.g. to enable or disable one.
    pub fn triggers_mut(&mut self) -> &mut TriggerRegistry {
        &mut self.registry
    }

    /// Triggered abilities waiting for the next `flush`.
    pub fn pending_triggers(&self) -> impl Iterator<Item = &StackEntry> {
        self.queue.iter()
    }

    // === State-based effects ===

    /// Register a state-based check.
    pub fn register_check(&mut self, check: StateBasedCheck) {
        self.checks.register(check);
    }

    /// Run every state-based check once.
    ///
    /// Each check that changed the game fires `STATE_BASED_ACTION` so
    /// watching triggers are queued. Returns true if anything changed.
    pub fn check_all(&mut self, state: &mut GameState) -> bool {
        let changed = self.checks.check_all(state);
        let any = !changed.is_empty();

        for check in changed {
            debug!(check = %check, "state-based action");
            self.tracer.emit(EngineEvent::StateBasedApplied { check: check.clone() });
            self.fire_event(GameEvent::new(events::STATE_BASED_ACTION).with_tag(check));
        }
        any
    }

    // === Trace ===

    /// Attach a trace subscriber.
    pub fn subscribe(&mut self, subscriber: impl TraceSubscriber + 'static) {
        self.tracer.subscribe(Box::new(subscriber));
    }

    // === Internals ===

    /// Give a new entry its ID and timestamp.
    fn admit(&mut self, entry: &mut StackEntry) {
        let requested = entry.id();
        if requested.is_assigned() && !self.id_in_use(requested) {
            if let Some(next) = requested.raw().checked_add(1) {
                self.next_id = self.next_id.max(next);
            }
        } else {
            let id = self.allocate_id();
            entry.assign_id(id);
        }
        self.clock = self.clock.saturating_add(1);
        entry.stamp(self.clock);
    }

    /// Next free ID. Wraps past `u32::MAX` back to 1, skipping IDs held by
    /// live entries.
    fn allocate_id(&mut self) -> StackEntryId {
        loop {
            let candidate = StackEntryId::new(self.next_id);
            self.next_id = self.next_id.checked_add(1).unwrap_or(1);
            if !self.id_in_use(candidate) {
                return candidate;
            }
        }
    }

    /// Is `id` held by an entry on the stack or in the trigger queue?
    fn id_in_use(&self, id: StackEntryId) -> bool {
        self.stack.get(id).is_some() || self.queue.iter().any(|e| e.id() == id)
    }

    /// Put an admitted entry on top and hand priority to its controller.
    fn place(&mut self, entry: StackEntry) -> StackEntryId {
        let id = entry.id();
        let controller = entry.controller();
        let kind = entry.kind();
        let name = entry.name().to_string();

        self.stack.push(entry);
        self.priority.grant(controller);
        self.refresh_timing();

        let depth = self.stack.len();
        debug!(entry = %id, %controller, %kind, depth, "pushed");
        self.tracer.emit(EngineEvent::Pushed {
            entry: id,
            kind,
            controller,
            name,
            depth,
        });
        id
    }

    fn refresh_timing(&mut self) {
        self.timing
            .refresh(self.priority.priority_player(), self.stack.is_empty());
    }
}
