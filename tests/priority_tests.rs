//! Priority integration tests.
//!
//! These tests drive full priority rounds: alternation, the two-pass
//! outcomes, pass-counter resets and the auto-pass policy.

use ccg_stack::core::{EntityId, GameState, PlayerId, SessionConfig};
use ccg_stack::effects::Effect;
use ccg_stack::priority::{AutoPassPolicy, HandCard, PassOutcome};
use ccg_stack::session::GameSession;
use ccg_stack::stack::StackEntry;
use ccg_stack::timing::Phase;
use ccg_stack::trace::{EngineEvent, TraceBuffer};

fn counting_spell(controller: PlayerId, name: &str) -> StackEntry {
    StackEntry::spell(EntityId(10), controller, name).with_effect(Effect::modify_turn(name, 1))
}

// =============================================================================
// Alternation
// =============================================================================

/// Priority alternates on each pass without an outcome.
#[test]
fn test_priority_alternates() {
    let mut session = GameSession::default();
    let mut state = GameState::new();

    assert_eq!(session.priority_player(), PlayerId::One);
    assert_eq!(session.pass_priority(&mut state), PassOutcome::Continue);
    assert_eq!(session.priority_player(), PlayerId::Two);
    assert_eq!(session.consecutive_passes(), 1);
}

/// Two passes on an empty stack ask the caller to advance the phase.
#[test]
fn test_two_passes_on_empty_stack_advance() {
    let mut session = GameSession::default();
    let mut state = GameState::new();

    assert_eq!(session.pass_priority(&mut state), PassOutcome::Continue);
    assert_eq!(session.pass_priority(&mut state), PassOutcome::AdvancePhase);
    assert_eq!(session.consecutive_passes(), 0);
    assert!(session.peek_all().is_empty());
}

/// Push, respond, then pass twice: only the top resolves, once.
#[test]
fn test_respond_then_resolve_scenario() {
    let mut session = GameSession::default();
    let mut state = GameState::new();

    session.push(counting_spell(PlayerId::One, "x")).unwrap();
    assert_eq!(session.pass_priority(&mut state), PassOutcome::Continue);
    assert_eq!(session.priority_player(), PlayerId::Two);

    session.push(counting_spell(PlayerId::Two, "b")).unwrap();
    assert_eq!(session.priority_player(), PlayerId::Two);

    assert_eq!(session.pass_priority(&mut state), PassOutcome::Continue);
    assert_eq!(session.pass_priority(&mut state), PassOutcome::Resolve);

    assert_eq!(state.get_turn_state("b", 0), 1);
    assert_eq!(state.get_turn_state("x", 0), 0);
    assert_eq!(session.peek_all().len(), 1);
    assert_eq!(session.priority_player(), PlayerId::One);
    assert_eq!(session.consecutive_passes(), 0);

    assert_eq!(session.pass_priority(&mut state), PassOutcome::Continue);
    assert_eq!(session.pass_priority(&mut state), PassOutcome::Resolve);
    assert_eq!(state.get_turn_state("x", 0), 1);
    assert_eq!(state.get_turn_state("b", 0), 1);
}

// =============================================================================
// Pass Counter
// =============================================================================

/// Any push resets the pass counter.
#[test]
fn test_push_resets_passes() {
    let mut session = GameSession::default();
    let mut state = GameState::new();

    session.pass_priority(&mut state);
    assert_eq!(session.consecutive_passes(), 1);

    session.push(counting_spell(PlayerId::Two, "response")).unwrap();
    assert_eq!(session.consecutive_passes(), 0);
}

/// Any resolution resets the pass counter.
#[test]
fn test_resolution_resets_passes() {
    let mut session = GameSession::default();
    let mut state = GameState::new();

    session.push(counting_spell(PlayerId::One, "x")).unwrap();
    session.pass_priority(&mut state);
    session.resolve_top(&mut state);
    assert_eq!(session.consecutive_passes(), 0);
}

/// A phase change resets the pass counter.
#[test]
fn test_update_timing_resets_passes() {
    let mut session = GameSession::default();
    let mut state = GameState::new();

    session.pass_priority(&mut state);
    session.update_timing(Phase::PrecombatMain, "main", PlayerId::One);
    assert_eq!(session.consecutive_passes(), 0);
    assert_eq!(session.priority_player(), PlayerId::One);
}

/// Every pass is traced with the outcome.
#[test]
fn test_passes_are_traced() {
    let mut session = GameSession::default();
    let buffer = TraceBuffer::new();
    session.subscribe(buffer.clone());
    let mut state = GameState::new();

    session.pass_priority(&mut state);
    session.pass_priority(&mut state);

    let passes: Vec<_> = buffer
        .events()
        .into_iter()
        .filter_map(|e| match e {
            EngineEvent::Passed { player, outcome, .. } => Some((player, outcome)),
            _ => None,
        })
        .collect();
    assert_eq!(
        passes,
        vec![
            (PlayerId::One, PassOutcome::Continue),
            (PlayerId::Two, PassOutcome::AdvancePhase),
        ]
    );
}

// =============================================================================
// Auto-Pass
// =============================================================================

fn auto_pass_session(policy: AutoPassPolicy) -> GameSession {
    GameSession::new(
        SessionConfig::new()
            .with_phase(Phase::PrecombatMain, "main")
            .with_auto_pass(policy),
    )
}

/// Disabled by default.
#[test]
fn test_auto_pass_disabled_by_default() {
    let session = GameSession::default();
    assert!(!session.should_auto_pass(&[]));
}

/// Full control suppresses auto-pass until toggled back.
#[test]
fn test_full_control_overrides_auto_pass() {
    let mut session = auto_pass_session(AutoPassPolicy::enabled());
    assert!(session.should_auto_pass(&[]));

    assert!(session.toggle_full_control());
    assert!(!session.should_auto_pass(&[]));

    assert!(!session.toggle_full_control());
    assert!(session.should_auto_pass(&[]));
}

/// A non-empty stack blocks auto-pass unless allowed.
#[test]
fn test_auto_pass_stack_restriction() {
    let mut session = auto_pass_session(AutoPassPolicy::enabled());
    session.push(counting_spell(PlayerId::One, "x")).unwrap();
    assert!(!session.should_auto_pass(&[]));

    session.set_auto_pass(AutoPassPolicy {
        only_when_stack_empty: false,
        ..AutoPassPolicy::enabled()
    });
    assert!(session.should_auto_pass(&[]));
}

/// Instant-speed cards in hand block auto-pass; sorceries do not.
#[test]
fn test_auto_pass_respects_responses() {
    let session = auto_pass_session(AutoPassPolicy::enabled());
    assert!(session.should_auto_pass(&[HandCard::sorcery(EntityId(20))]));
    assert!(!session.should_auto_pass(&[
        HandCard::sorcery(EntityId(20)),
        HandCard::instant(EntityId(21)),
    ]));
}

/// Combat blocks auto-pass unless allowed.
#[test]
fn test_auto_pass_during_combat() {
    let mut session = auto_pass_session(AutoPassPolicy::enabled());
    session.update_timing(Phase::Combat, "declare attackers", PlayerId::One);
    assert!(!session.should_auto_pass(&[]));

    session.set_auto_pass(AutoPassPolicy {
        during_combat: true,
        ..AutoPassPolicy::enabled()
    });
    assert!(session.should_auto_pass(&[]));
}

/// The predicate is pure.
#[test]
fn test_should_auto_pass_does_not_mutate() {
    let mut session = auto_pass_session(AutoPassPolicy::enabled());
    let mut state = GameState::new();
    session.pass_priority(&mut state);

    let before = (session.priority_player(), session.consecutive_passes());
    let _ = session.should_auto_pass(&[]);
    let _ = session.should_auto_pass(&[HandCard::instant(EntityId(3))]);
    assert_eq!(before, (session.priority_player(), session.consecutive_passes()));
}
