//! Core types shared by every Lootbridge crate.
//!
//! Everything here is either read from the game ([`PendingPickup`]) or sent
//! between player sessions ([`OutboundMessage`]). Field names on the wire
//! are camelCase because peers already speak that shape.

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// Identifier of an item that can be picked up.
///
/// The numbering belongs to the game; Lootbridge treats it as an opaque
/// key. `ItemId(0)` is reserved and only appears inside the empty pickup
/// slot.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ItemId(pub u32);

impl ItemId {
    /// The reserved "no item" value.
    pub const NONE: Self = Self(0);

    /// Returns `true` for the reserved id 0.
    pub fn is_reserved(self) -> bool {
        self == Self::NONE
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "I-{}", self.0)
    }
}

/// Identifier of one player's game session in a multiworld.
///
/// `WorldId(0)` is reserved for the empty pickup slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorldId(pub u32);

impl WorldId {
    /// The reserved "no world" value.
    pub const NONE: Self = Self(0);
}

impl fmt::Display for WorldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "W-{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// PendingPickup
// ---------------------------------------------------------------------------

/// The single pickup slot read from the game on every poll.
///
/// The game exposes at most one pending pickup at a time, so this is a
/// value, not a queue entry. It is never persisted: the next poll reads the
/// slot again, which is why the same pickup can be observed more than once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingPickup {
    /// The world this pickup is addressed to.
    pub target_world: WorldId,
    /// The item that was picked up.
    pub item_id: ItemId,
}

impl PendingPickup {
    /// The `(0, 0)` sentinel: nothing is pending.
    pub const EMPTY: Self = Self {
        target_world: WorldId::NONE,
        item_id: ItemId::NONE,
    };

    pub fn new(target_world: WorldId, item_id: ItemId) -> Self {
        Self {
            target_world,
            item_id,
        }
    }

    /// Returns `true` for the `(0, 0)` sentinel only.
    ///
    /// A slot with one half zeroed is still treated as a real event.
    pub fn is_empty(&self) -> bool {
        *self == Self::EMPTY
    }
}

impl Default for PendingPickup {
    fn default() -> Self {
        Self::EMPTY
    }
}

// ---------------------------------------------------------------------------
// OutboundMessage
// ---------------------------------------------------------------------------

/// Coop announcement: "I, the named player, received this item."
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoopMessage {
    pub source_player_name: String,
    pub item_id: ItemId,
}

/// Multiworld forward: "this item was generated in world S and belongs in
/// world T."
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MultiworldMessage {
    pub source_player_world_id: WorldId,
    pub target_player_world_id: WorldId,
    pub item_id: ItemId,
}

/// What a session hands to the transport after reconciling a pickup.
///
/// Only one variant is ever produced by a given session; which one is fixed
/// by the game mode at construction. On the wire the variant is recognised
/// by its field set (`#[serde(untagged)]`), so a Coop message is simply
/// `{"sourcePlayerName": "Alice", "itemId": 7}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OutboundMessage {
    Coop(CoopMessage),
    Multiworld(MultiworldMessage),
}

impl OutboundMessage {
    /// Builds a Coop message.
    pub fn coop(source_player_name: impl Into<String>, item_id: ItemId) -> Self {
        Self::Coop(CoopMessage {
            source_player_name: source_player_name.into(),
            item_id,
        })
    }

    /// Builds a Multiworld message.
    pub fn multiworld(source: WorldId, target: WorldId, item_id: ItemId) -> Self {
        Self::Multiworld(MultiworldMessage {
            source_player_world_id: source,
            target_player_world_id: target,
            item_id,
        })
    }

    /// The item carried by either variant.
    pub fn item_id(&self) -> ItemId {
        match self {
            Self::Coop(msg) => msg.item_id,
            Self::Multiworld(msg) => msg.item_id,
        }
    }

    /// The destination world, if this is a Multiworld message.
    pub fn target_world(&self) -> Option<WorldId> {
        match self {
            Self::Coop(_) => None,
            Self::Multiworld(msg) => Some(msg.target_player_world_id),
        }
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    //! The JSON shapes here are what peers parse, so the tests pin field
    //! names rather than just round-tripping.

    use super::*;

    #[test]
    fn test_item_id_serializes_as_plain_number() {
        let json = serde_json::to_string(&ItemId(42)).unwrap();
        assert_eq!(json, "42");
    }

    #[test]
    fn test_item_id_display() {
        assert_eq!(ItemId(7).to_string(), "I-7");
        assert_eq!(WorldId(3).to_string(), "W-3");
    }

    #[test]
    fn test_item_id_zero_is_reserved() {
        assert!(ItemId(0).is_reserved());
        assert!(!ItemId(1).is_reserved());
    }

    #[test]
    fn test_pending_pickup_sentinel_is_empty() {
        assert!(PendingPickup::EMPTY.is_empty());
        assert!(PendingPickup::default().is_empty());
        assert!(PendingPickup::new(WorldId(0), ItemId(0)).is_empty());
    }

    #[test]
    fn test_pending_pickup_half_zero_is_not_empty() {
        // Only the full (0, 0) pair is the sentinel.
        assert!(!PendingPickup::new(WorldId(0), ItemId(5)).is_empty());
        assert!(!PendingPickup::new(WorldId(2), ItemId(0)).is_empty());
    }

    #[test]
    fn test_coop_message_json_format() {
        let msg = OutboundMessage::coop("Alice", ItemId(7));
        let json: serde_json::Value = serde_json::to_value(&msg).unwrap();

        assert_eq!(
            json,
            serde_json::json!({ "sourcePlayerName": "Alice", "itemId": 7 })
        );
    }

    #[test]
    fn test_multiworld_message_json_format() {
        let msg = OutboundMessage::multiworld(WorldId(1), WorldId(2), ItemId(40));
        let json: serde_json::Value = serde_json::to_value(&msg).unwrap();

        assert_eq!(json["sourcePlayerWorldId"], 1);
        assert_eq!(json["targetPlayerWorldId"], 2);
        assert_eq!(json["itemId"], 40);
    }

    #[test]
    fn test_untagged_decode_picks_variant_by_fields() {
        let coop: OutboundMessage =
            serde_json::from_str(r#"{"sourcePlayerName":"Bob","itemId":3}"#).unwrap();
        assert!(matches!(coop, OutboundMessage::Coop(_)));

        let multi: OutboundMessage = serde_json::from_str(
            r#"{"sourcePlayerWorldId":4,"targetPlayerWorldId":5,"itemId":3}"#,
        )
        .unwrap();
        assert_eq!(multi.target_world(), Some(WorldId(5)));
    }

    #[test]
    fn test_outbound_message_accessors() {
        let coop = OutboundMessage::coop("Alice", ItemId(9));
        assert_eq!(coop.item_id(), ItemId(9));
        assert_eq!(coop.target_world(), None);
    }

    #[test]
    fn test_decode_unknown_shape_returns_error() {
        let result: Result<OutboundMessage, _> =
            serde_json::from_str(r#"{"flyTo":"moon"}"#);
        assert!(result.is_err());
    }
}
