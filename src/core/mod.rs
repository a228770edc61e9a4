//! Core engine types: players, entities, game state, configuration.
//!
//! This module contains the building blocks the resolution engine threads
//! through every call without interpreting them.

pub mod entity;
pub mod player;
pub mod config;
pub mod state;

pub use entity::EntityId;
pub use player::{PlayerId, PlayerMap, PLAYER_COUNT};
pub use config::SessionConfig;
pub use state::GameState;
