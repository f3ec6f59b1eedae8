//! An in-memory pickup source.
//!
//! [`MemorySource`] stands in for a real game hook. Tests and demos script
//! it (put a pickup in the slot, pretend the game is on the title screen)
//! and then inspect what the engine did to it. Clones share state, so one
//! handle can be given to the engine while another is kept for inspection.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use lootbridge_protocol::{ItemId, PendingPickup};

use crate::{PickupSource, SourceError};

#[derive(Debug, Default)]
struct MemoryState {
    pending: PendingPickup,
    attached: bool,
    attach_refusals: u32,
    attach_calls: u32,
    title_screen: bool,
    scripted_read_errors: VecDeque<SourceError>,
    scripted_clear_errors: VecDeque<SourceError>,
    clears: u32,
    applied: Vec<ItemId>,
}

/// A scriptable [`PickupSource`] backed by shared memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    state: Arc<Mutex<MemoryState>>,
}

impl MemorySource {
    /// A source that is already attached with an empty slot.
    pub fn attached() -> Self {
        let source = Self::default();
        source.lock().attached = true;
        source
    }

    /// A detached source whose first `refusals` attach attempts fail.
    pub fn refusing_attach(refusals: u32) -> Self {
        let source = Self::default();
        source.lock().attach_refusals = refusals;
        source
    }

    /// Puts a pickup into the game's slot, as if the player just opened a
    /// chest.
    pub fn set_pending(&self, pickup: PendingPickup) {
        self.lock().pending = pickup;
    }

    /// The current slot contents.
    pub fn pending(&self) -> PendingPickup {
        self.lock().pending
    }

    /// While `true`, [`apply_item_effect`](PickupSource::apply_item_effect)
    /// fails with [`SourceError::TransientState`].
    pub fn set_title_screen(&self, on_title: bool) {
        self.lock().title_screen = on_title;
    }

    /// Makes the next read fail with `error`.
    pub fn fail_next_read(&self, error: SourceError) {
        self.lock().scripted_read_errors.push_back(error);
    }

    /// Makes the next clear fail with `error`.
    pub fn fail_next_clear(&self, error: SourceError) {
        self.lock().scripted_clear_errors.push_back(error);
    }

    /// Drops the hook, as if the game closed.
    pub fn detach(&self) {
        self.lock().attached = false;
    }

    /// How many times the slot was cleared.
    pub fn clear_count(&self) -> u32 {
        self.lock().clears
    }

    /// How many times `attach` was called.
    pub fn attach_calls(&self) -> u32 {
        self.lock().attach_calls
    }

    /// Items applied through `apply_item_effect`, in order.
    pub fn applied_items(&self) -> Vec<ItemId> {
        self.lock().applied.clone()
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        // A panicking test thread must not hide the state from the others.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn check_attached(state: &MemoryState) -> Result<(), SourceError> {
        if state.attached {
            Ok(())
        } else {
            Err(SourceError::Detached("memory source not attached".into()))
        }
    }
}

impl PickupSource for MemorySource {
    async fn read_pending_pickup(&mut self) -> Result<PendingPickup, SourceError> {
        let mut state = self.lock();
        Self::check_attached(&state)?;
        if let Some(err) = state.scripted_read_errors.pop_front() {
            return Err(err);
        }
        Ok(state.pending)
    }

    async fn clear_pending_pickup(&mut self) -> Result<(), SourceError> {
        let mut state = self.lock();
        Self::check_attached(&state)?;
        if let Some(err) = state.scripted_clear_errors.pop_front() {
            return Err(err);
        }
        state.pending = PendingPickup::EMPTY;
        state.clears += 1;
        Ok(())
    }

    async fn apply_item_effect(&mut self, item: ItemId) -> Result<(), SourceError> {
        let mut state = self.lock();
        Self::check_attached(&state)?;
        if state.title_screen {
            return Err(SourceError::TransientState("title screen".into()));
        }
        state.applied.push(item);
        Ok(())
    }

    async fn attach(&mut self) -> Result<(), SourceError> {
        let mut state = self.lock();
        state.attach_calls += 1;
        if state.attach_refusals > 0 {
            state.attach_refusals -= 1;
            return Err(SourceError::Detached("game not running".into()));
        }
        state.attached = true;
        Ok(())
    }

    async fn is_attached(&self) -> bool {
        self.lock().attached
    }
}
