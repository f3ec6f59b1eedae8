//! Builds the outbound message for a reconciled pickup.

use lootbridge_protocol::{ItemId, OutboundMessage, WorldId};

/// Stateless message builder, bound once to the local identity.
///
/// Coop sessions are identified by player name and drop the target world;
/// Multiworld sessions stamp their own world id as the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageFactory {
    Coop { player_name: String },
    Multiworld { source_world: WorldId },
}

impl MessageFactory {
    pub fn coop(player_name: impl Into<String>) -> Self {
        Self::Coop {
            player_name: player_name.into(),
        }
    }

    pub fn multiworld(source_world: WorldId) -> Self {
        Self::Multiworld { source_world }
    }

    /// Builds the message for `item` addressed to `target`.
    pub fn build(&self, item: ItemId, target: WorldId) -> OutboundMessage {
        match self {
            Self::Coop { player_name } => OutboundMessage::coop(player_name.clone(), item),
            Self::Multiworld { source_world } => {
                OutboundMessage::multiworld(*source_world, target, item)
            }
        }
    }
}
