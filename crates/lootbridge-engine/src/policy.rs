//! Take/give rules for each game mode.
//!
//! The rules are pure functions of the pickup, the local identity and the
//! current inventory. They never touch the game or mutate anything; the
//! engine applies whatever [`Decision`] comes out.

use std::fmt;

use lootbridge_inventory::Inventory;
use lootbridge_protocol::{ItemId, OutboundMessage, PendingPickup, WorldId};
use serde::{Deserialize, Serialize};

use crate::MessageFactory;

// ---------------------------------------------------------------------------
// GameMode
// ---------------------------------------------------------------------------

/// How pickups are shared between players. Chosen once per session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum GameMode {
    /// Every player receives every pickup.
    #[default]
    Coop,
    /// Each pickup belongs to exactly one world and is routed there.
    Multiworld,
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Coop => write!(f, "Coop"),
            Self::Multiworld => write!(f, "Multiworld"),
        }
    }
}

// ---------------------------------------------------------------------------
// Decision
// ---------------------------------------------------------------------------

/// What the engine should do with a pickup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Decision {
    /// Not ours: clear it from the game, leave the inventory alone.
    Take,
    /// Ours: credit it to the inventory, leave the pickup in the game.
    Give,
    /// Neither rule fired. The pickup is still reported but nothing else
    /// happens, and the game slot is left as is.
    Ignore,
}

// ---------------------------------------------------------------------------
// ModePolicy
// ---------------------------------------------------------------------------

/// The rules a game mode applies to a pending pickup.
pub trait ModePolicy {
    /// `true` if the pickup must be removed from the local game.
    fn should_take(&self, item: ItemId, target: WorldId, inventory: &Inventory) -> bool;

    /// `true` if the pickup should be credited to the local inventory.
    fn should_give(&self, item: ItemId, target: WorldId, inventory: &Inventory) -> bool;

    /// The message reporting this pickup to peers.
    fn build_message(&self, item: ItemId, target: WorldId) -> OutboundMessage;

    /// Evaluates `should_take` first, then `should_give`.
    fn decide(&self, pickup: PendingPickup, inventory: &Inventory) -> Decision {
        let PendingPickup {
            target_world,
            item_id,
        } = pickup;
        if self.should_take(item_id, target_world, inventory) {
            Decision::Take
        } else if self.should_give(item_id, target_world, inventory) {
            Decision::Give
        } else {
            Decision::Ignore
        }
    }
}

/// Coop rules: never take, give while the item is not maxed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoopPolicy {
    factory: MessageFactory,
}

impl CoopPolicy {
    pub fn new(player_name: impl Into<String>) -> Self {
        Self {
            factory: MessageFactory::coop(player_name),
        }
    }
}

impl ModePolicy for CoopPolicy {
    fn should_take(&self, _item: ItemId, _target: WorldId, _inventory: &Inventory) -> bool {
        false
    }

    fn should_give(&self, item: ItemId, _target: WorldId, inventory: &Inventory) -> bool {
        !inventory.item_maxed(item)
    }

    fn build_message(&self, item: ItemId, target: WorldId) -> OutboundMessage {
        self.factory.build(item, target)
    }
}

/// Multiworld rules: take what is addressed elsewhere, give what is
/// addressed here, both only while the item is not maxed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiworldPolicy {
    world_id: WorldId,
    factory: MessageFactory,
}

impl MultiworldPolicy {
    pub fn new(world_id: WorldId) -> Self {
        Self {
            world_id,
            factory: MessageFactory::multiworld(world_id),
        }
    }

    pub fn world_id(&self) -> WorldId {
        self.world_id
    }
}

impl ModePolicy for MultiworldPolicy {
    fn should_take(&self, item: ItemId, target: WorldId, inventory: &Inventory) -> bool {
        target != self.world_id && !inventory.item_maxed(item)
    }

    fn should_give(&self, item: ItemId, target: WorldId, inventory: &Inventory) -> bool {
        target == self.world_id && !inventory.item_maxed(item)
    }

    fn build_message(&self, item: ItemId, target: WorldId) -> OutboundMessage {
        self.factory.build(item, target)
    }
}

// ---------------------------------------------------------------------------
// SessionPolicy
// ---------------------------------------------------------------------------

/// The policy a session runs with: one of the two modes, fixed at
/// construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionPolicy {
    Coop(CoopPolicy),
    Multiworld(MultiworldPolicy),
}

impl SessionPolicy {
    /// Selects the policy for `mode`. The player name only matters for Coop
    /// and the world id only for Multiworld.
    pub fn new(mode: GameMode, world_id: WorldId, player_name: impl Into<String>) -> Self {
        tracing::debug!(%mode, %world_id, "session policy selected");
        match mode {
            GameMode::Coop => Self::Coop(CoopPolicy::new(player_name)),
            GameMode::Multiworld => Self::Multiworld(MultiworldPolicy::new(world_id)),
        }
    }

    pub fn mode(&self) -> GameMode {
        match self {
            Self::Coop(_) => GameMode::Coop,
            Self::Multiworld(_) => GameMode::Multiworld,
        }
    }
}

impl ModePolicy for SessionPolicy {
    fn should_take(&self, item: ItemId, target: WorldId, inventory: &Inventory) -> bool {
        match self {
            Self::Coop(p) => p.should_take(item, target, inventory),
            Self::Multiworld(p) => p.should_take(item, target, inventory),
        }
    }

    fn should_give(&self, item: ItemId, target: WorldId, inventory: &Inventory) -> bool {
        match self {
            Self::Coop(p) => p.should_give(item, target, inventory),
            Self::Multiworld(p) => p.should_give(item, target, inventory),
        }
    }

    fn build_message(&self, item: ItemId, target: WorldId) -> OutboundMessage {
        match self {
            Self::Coop(p) => p.build_message(item, target),
            Self::Multiworld(p) => p.build_message(item, target),
        }
    }
}

// =========================================================================
// Tests
// =========================================================================
