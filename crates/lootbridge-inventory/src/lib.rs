//! Per-player inventory tracking for Lootbridge.
//!
//! An [`Inventory`] remembers how many copies of each item one player has
//! been credited with, and how many copies they may hold at most
//! ([`ItemCaps`]). It is the only thing the reconciliation engine mutates.
//!
//! # How it fits in the stack
//!
//! ```text
//! Engine (above)      ← asks item_maxed(), then calls give_item()
//!     ↕
//! Inventory (this crate)
//!     ↕
//! Protocol (below)    ← provides ItemId
//! ```

mod error;
mod inventory;

pub use error::InventoryError;
pub use inventory::{Inventory, InventorySnapshot, ItemCaps};
