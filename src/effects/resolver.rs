//! Effect resolution - applying a resolving entry's effect.
//!
//! The resolver applies an [`Effect`] on behalf of the entry that is
//! resolving. It writes game state, may counter other stack entries, and
//! collects the events the effect fires so the session can queue watching
//! triggers afterwards.

use smallvec::SmallVec;

use crate::core::{EntityId, GameState, PlayerId};
use crate::error::ResolutionError;
use crate::stack::{StackEngine, StackEntry};
use crate::triggers::GameEvent;

use super::Effect;

/// Everything an effect may touch while its entry resolves.
pub struct ResolverContext<'a> {
    /// The authoritative game state.
    pub state: &'a mut GameState,
    /// The stack, minus the resolving entry.
    pub stack: &'a mut StackEngine,
    /// The entry being resolved.
    pub entry: &'a StackEntry,
    /// Events fired by the effect, in order.
    pub events: Vec<GameEvent>,
    /// Entries removed by counter effects, in order.
    pub countered: Vec<StackEntry>,
}

impl<'a> ResolverContext<'a> {
    /// Create a context for resolving `entry`.
    pub fn new(state: &'a mut GameState, stack: &'a mut StackEngine, entry: &'a StackEntry) -> Self {
        Self {
            state,
            stack,
            entry,
            events: Vec::new(),
            countered: Vec::new(),
        }
    }

    /// Player targets, or the controller when the entry has none.
    fn player_targets(&self) -> Result<SmallVec<[PlayerId; 2]>, ResolutionError> {
        if self.entry.targets().is_empty() {
            return Ok(SmallVec::from_elem(self.entry.controller(), 1));
        }
        self.entry
            .targets()
            .iter()
            .map(|&target| {
                target.as_player().ok_or(ResolutionError::InvalidTarget {
                    target,
                    reason: "not a player",
                })
            })
            .collect()
    }

    /// Card targets, or the source when the entry has none.
    fn card_targets(&self) -> Result<SmallVec<[EntityId; 2]>, ResolutionError> {
        if self.entry.targets().is_empty() {
            return Ok(SmallVec::from_elem(self.entry.source(), 1));
        }
        self.entry
            .targets()
            .iter()
            .map(|&target| {
                if target.is_player() {
                    Err(ResolutionError::InvalidTarget {
                        target,
                        reason: "not a card",
                    })
                } else {
                    Ok(target)
                }
            })
            .collect()
    }
}

fn checked_sum(current: i64, delta: i64) -> Result<i64, ResolutionError> {
    current.checked_add(delta).ok_or(ResolutionError::Overflow)
}

/// Applies effects.
pub struct EffectResolver;

impl EffectResolver {
    /// Apply the resolving entry's own effect.
    pub fn resolve_entry(ctx: &mut ResolverContext<'_>) -> Result<(), ResolutionError> {
        let entry = ctx.entry;
        Self::resolve(entry.effect(), ctx)
    }

    /// Apply an effect.
    ///
    /// Targets and arithmetic are validated before anything is written,
    /// so a single effect either applies fully or not at all. A `Batch` stops at the
    /// first fault; earlier effects in the batch stay applied.
    pub fn resolve(effect: &Effect, ctx: &mut ResolverContext<'_>) -> Result<(), ResolutionError> {
        match effect {
            Effect::Noop => Ok(()),

            Effect::ModifyPlayerState { key, delta } => {
                let delta = delta.evaluate(ctx.entry)?;
                let updates = ctx
                    .player_targets()?
                    .into_iter()
                    .map(|player| {
                        let current = ctx.state.get_player_state(player, key, 0);
                        checked_sum(current, delta).map(|value| (player, value))
                    })
                    .collect::<Result<SmallVec<[_; 2]>, _>>()?;
                for (player, value) in updates {
                    ctx.state.set_player_state(player, key.as_str(), value);
                }
                Ok(())
            }

            Effect::SetPlayerState { key, value } => {
                let value = value.evaluate(ctx.entry)?;
                for player in ctx.player_targets()? {
                    ctx.state.set_player_state(player, key.as_str(), value);
                }
                Ok(())
            }

            Effect::ModifyCardState { key, delta } => {
                let delta = delta.evaluate(ctx.entry)?;
                let updates = ctx
                    .card_targets()?
                    .into_iter()
                    .map(|card| {
                        let current = ctx.state.get_card_state(card, key, 0);
                        checked_sum(current, delta).map(|value| (card, value))
                    })
                    .collect::<Result<SmallVec<[_; 2]>, _>>()?;
                for (card, value) in updates {
                    ctx.state.set_card_state(card, key.as_str(), value);
                }
                Ok(())
            }

            Effect::SetCardState { key, value } => {
                let value = value.evaluate(ctx.entry)?;
                for card in ctx.card_targets()? {
                    ctx.state.set_card_state(card, key.as_str(), value);
                }
                Ok(())
            }

            Effect::ModifyTurnState { key, delta } => {
                let delta = delta.evaluate(ctx.entry)?;
                let value = checked_sum(ctx.state.get_turn_state(key, 0), delta)?;
                ctx.state.set_turn_state(key.as_str(), value);
                Ok(())
            }

            Effect::Counter(target) => {
                let countered = ctx.stack.counter(*target)?;
                ctx.countered.push(countered);
                Ok(())
            }

            Effect::Emit(event_type) => {
                let mut event = GameEvent::new(*event_type)
                    .with_source(ctx.entry.source())
                    .with_player(ctx.entry.controller());
                if let Some(&target) = ctx.entry.targets().first() {
                    event = event.with_target(target);
                }
                ctx.events.push(event);
                Ok(())
            }

            Effect::Batch(effects) => {
                for effect in effects {
                    Self::resolve(effect, ctx)?;
                }
                Ok(())
            }
        }
    }
}
