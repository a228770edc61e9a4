//! Entity identification system.
//!
//! Every game object (player, card, token, ability source) has an `EntityId`.
//!
//! ## ID Layout
//!
//! - `0` and `1`: reserved for the two players
//! - `2..`: cards and other objects
//!
//! ```
//! use ccg_stack::core::{EntityId, PlayerId};
//!
//! let player = EntityId::player(PlayerId::Two);
//! assert!(player.is_player());
//! assert_eq!(player.as_player(), Some(PlayerId::Two));
//!
//! let card = EntityId(10);
//! assert!(!card.is_player());
//! ```

use serde::{Deserialize, Serialize};

use super::player::{PlayerId, PLAYER_COUNT};

/// Unique identifier for any game entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u32);

impl EntityId {
    /// First entity ID available for non-player objects.
    pub const FIRST_NON_PLAYER: u32 = PLAYER_COUNT as u32;

    /// Create the entity ID of a player.
    #[must_use]
    pub const fn player(id: PlayerId) -> Self {
        Self(id.index() as u32)
    }

    /// Check if this entity ID refers to a player.
    #[must_use]
    pub const fn is_player(self) -> bool {
        self.0 < Self::FIRST_NON_PLAYER
    }

    /// Convert to `PlayerId` if this is a player entity.
    #[must_use]
    pub const fn as_player(self) -> Option<PlayerId> {
        PlayerId::from_index(self.0 as usize)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl From<u32> for EntityId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl From<PlayerId> for EntityId {
    fn from(player: PlayerId) -> Self {
        Self::player(player)
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Entity({})", self.0)
    }
}
