//! Error types for the inventory layer.

use lootbridge_protocol::ItemId;

/// Errors that can occur while crediting or restoring items.
#[derive(Debug, thiserror::Error)]
pub enum InventoryError {
    /// The item already reached its cap. Callers are expected to check
    /// [`Inventory::item_maxed`](crate::Inventory::item_maxed) first, so
    /// seeing this means a caller skipped that check.
    #[error("item {item} is already at its cap of {cap}")]
    Maxed { item: ItemId, cap: u32 },

    /// A restored snapshot holds more copies than the configured cap allows.
    #[error("snapshot holds {count} of item {item}, cap is {cap}")]
    ExceedsCap { item: ItemId, count: u32, cap: u32 },
}
