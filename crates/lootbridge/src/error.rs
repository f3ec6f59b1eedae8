//! Unified error type for Lootbridge.

use lootbridge_engine::SourceError;
use lootbridge_inventory::InventoryError;
use lootbridge_protocol::ProtocolError;
use lootbridge_session::SessionError;

/// Wraps the error of every Lootbridge crate.
///
/// Hosts that use the `lootbridge` facade handle this one type; `?`
/// converts the per-crate errors through the `#[from]` impls.
#[derive(Debug, thiserror::Error)]
pub enum LootbridgeError {
    /// Encoding or decoding an item message.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// An inventory operation hit a cap.
    #[error(transparent)]
    Inventory(#[from] InventoryError),

    /// The game hook failed.
    #[error(transparent)]
    Source(#[from] SourceError),

    /// The session could not start or keep running.
    #[error(transparent)]
    Session(#[from] SessionError),
}

#[cfg(test)]
mod tests {
    use lootbridge_protocol::ItemId;

    use super::*;

    #[test]
    fn test_from_protocol_error() {
        let err = ProtocolError::InvalidMessage("bad".into());
        let lb_err: LootbridgeError = err.into();
        assert!(matches!(lb_err, LootbridgeError::Protocol(_)));
        assert!(lb_err.to_string().contains("bad"));
    }

    #[test]
    fn test_from_inventory_error() {
        let err = InventoryError::Maxed {
            item: ItemId(7),
            cap: 1,
        };
        let lb_err: LootbridgeError = err.into();
        assert!(matches!(lb_err, LootbridgeError::Inventory(_)));
    }

    #[test]
    fn test_from_source_error() {
        let err = SourceError::TransientState("title screen".into());
        let lb_err: LootbridgeError = err.into();
        assert!(matches!(lb_err, LootbridgeError::Source(_)));
        assert!(lb_err.to_string().contains("title screen"));
    }

    #[test]
    fn test_from_session_error() {
        let err = SessionError::Config("player_name is required".into());
        let lb_err: LootbridgeError = err.into();
        assert!(matches!(lb_err, LootbridgeError::Session(_)));
    }

    #[test]
    fn test_question_mark_converts_session_error() {
        fn load() -> Result<(), LootbridgeError> {
            lootbridge_session::SessionConfig::from_json_str("{ nope")?;
            Ok(())
        }

        assert!(matches!(load(), Err(LootbridgeError::Session(_))));
    }
}
