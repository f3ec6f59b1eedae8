//! The inventory store: item counts plus their caps.
//!
//! # Ownership note
//!
//! `Inventory` is a plain struct over `HashMap`s with no interior locking.
//! Exactly one reconciliation engine owns it for the lifetime of a session;
//! nothing else holds a reference, so there is nothing to synchronise.

use std::collections::{BTreeMap, HashMap};

use lootbridge_protocol::ItemId;
use serde::{Deserialize, Serialize};

use crate::InventoryError;

// ---------------------------------------------------------------------------
// ItemCaps
// ---------------------------------------------------------------------------

/// Maximum copies a player may hold, per item.
///
/// Items without an entry are unbounded and never report as maxed. In JSON
/// this is a plain object keyed by item id: `{"7": 1, "12": 3}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemCaps(HashMap<ItemId, u32>);

impl ItemCaps {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style cap registration.
    pub fn with(mut self, item: ItemId, max: u32) -> Self {
        self.0.insert(item, max);
        self
    }

    /// The cap for `item`, or `None` if it is unbounded.
    pub fn get(&self, item: ItemId) -> Option<u32> {
        self.0.get(&item).copied()
    }

    pub fn set(&mut self, item: ItemId, max: u32) {
        self.0.insert(item, max);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(ItemId, u32)> for ItemCaps {
    fn from_iter<I: IntoIterator<Item = (ItemId, u32)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

// ---------------------------------------------------------------------------
// InventorySnapshot
// ---------------------------------------------------------------------------

/// Serializable copy of an inventory's counts.
///
/// Lootbridge does not persist anything itself. Whoever saves and restores
/// sessions stores this snapshot and hands it back to
/// [`Inventory::from_snapshot`]. A `BTreeMap` keeps the output stable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventorySnapshot {
    pub counts: BTreeMap<ItemId, u32>,
}

// ---------------------------------------------------------------------------
// Inventory
// ---------------------------------------------------------------------------

/// Item counts for one player.
///
/// Invariant: for every capped item, `count(item) <= cap(item)`.
/// [`item_maxed`](Self::item_maxed) is the single answer to "does this
/// player want more copies?".
#[derive(Debug, Clone, Default)]
pub struct Inventory {
    counts: HashMap<ItemId, u32>,
    caps: ItemCaps,
}

impl Inventory {
    /// Creates an empty inventory with the given caps.
    pub fn new(caps: ItemCaps) -> Self {
        Self {
            counts: HashMap::new(),
            caps,
        }
    }

    /// Restores an inventory from a saved snapshot.
    ///
    /// Zero counts are dropped so that `len()` only reflects held items.
    ///
    /// # Errors
    /// Returns [`InventoryError::ExceedsCap`] if the snapshot holds more
    /// copies of an item than its cap allows.
    pub fn from_snapshot(
        snapshot: InventorySnapshot,
        caps: ItemCaps,
    ) -> Result<Self, InventoryError> {
        for (&item, &count) in &snapshot.counts {
            if let Some(cap) = caps.get(item) {
                if count > cap {
                    return Err(InventoryError::ExceedsCap { item, count, cap });
                }
            }
        }

        let counts: HashMap<ItemId, u32> = snapshot
            .counts
            .into_iter()
            .filter(|&(_, count)| count > 0)
            .collect();

        tracing::debug!(items = counts.len(), "inventory restored from snapshot");

        Ok(Self { counts, caps })
    }

    /// Copies the current counts out for persistence.
    pub fn snapshot(&self) -> InventorySnapshot {
        InventorySnapshot {
            counts: self.counts.iter().map(|(&k, &v)| (k, v)).collect(),
        }
    }

    /// Returns `true` once `item` has reached its cap.
    ///
    /// Uncapped items are never maxed.
    pub fn item_maxed(&self, item: ItemId) -> bool {
        match self.caps.get(item) {
            Some(cap) => self.count(item) >= cap,
            None => false,
        }
    }

    /// Credits one copy of `item` and returns the new count.
    ///
    /// # Errors
    /// Returns [`InventoryError::Maxed`] instead of exceeding the cap.
    pub fn give_item(&mut self, item: ItemId) -> Result<u32, InventoryError> {
        if let Some(cap) = self.caps.get(item) {
            if self.count(item) >= cap {
                return Err(InventoryError::Maxed { item, cap });
            }
        }

        let count = self.counts.entry(item).or_insert(0);
        *count = count.saturating_add(1);

        tracing::debug!(%item, count = *count, "item credited");
        Ok(*count)
    }

    /// Copies of `item` currently held.
    pub fn count(&self, item: ItemId) -> u32 {
        self.counts.get(&item).copied().unwrap_or(0)
    }

    /// The cap for `item`, or `None` if it is unbounded.
    pub fn cap(&self, item: ItemId) -> Option<u32> {
        self.caps.get(item)
    }

    /// Changes the cap for `item`.
    ///
    /// Lowering a cap below the current count keeps the count as is; the
    /// item simply reports as maxed from then on.
    pub fn set_cap(&mut self, item: ItemId, max: u32) {
        self.caps.set(item, max);
    }

    /// Number of distinct items held.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

// =========================================================================
// Tests
// =========================================================================
