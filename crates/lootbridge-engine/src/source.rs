//! The game-side collaborator the engine polls.
//!
//! Lootbridge does not know how pickups are detected. Memory hooks, save
//! file watchers and emulator scripting all end up behind the
//! [`PickupSource`] trait, and the engine only ever talks to that trait.

use std::future::Future;

use lootbridge_protocol::{ItemId, PendingPickup};

use crate::SourceError;

/// Access to the game's pending-pickup slot.
///
/// # Trait bounds
///
/// - `Send + 'static` so a session owning its source can be spawned onto a
///   Tokio task.
/// - Each method returns a `Send` future for the same reason. Implementors
///   can still write `async fn` in their `impl` block.
///
/// # Example
///
/// ```rust
/// use lootbridge_engine::{PickupSource, SourceError};
/// use lootbridge_protocol::{ItemId, PendingPickup};
///
/// /// A game that never has anything pending.
/// struct QuietGame;
///
/// impl PickupSource for QuietGame {
///     async fn read_pending_pickup(&mut self) -> Result<PendingPickup, SourceError> {
///         Ok(PendingPickup::EMPTY)
///     }
///
///     async fn clear_pending_pickup(&mut self) -> Result<(), SourceError> {
///         Ok(())
///     }
///
///     async fn apply_item_effect(&mut self, _item: ItemId) -> Result<(), SourceError> {
///         Err(SourceError::TransientState("title screen".into()))
///     }
///
///     async fn attach(&mut self) -> Result<(), SourceError> {
///         Ok(())
///     }
///
///     async fn is_attached(&self) -> bool {
///         true
///     }
/// }
/// ```
pub trait PickupSource: Send + 'static {
    /// Reads the pending pickup slot. Returns [`PendingPickup::EMPTY`] when
    /// nothing is pending.
    fn read_pending_pickup(
        &mut self,
    ) -> impl Future<Output = Result<PendingPickup, SourceError>> + Send;

    /// Removes the pending pickup from the game so the local player does
    /// not receive it.
    fn clear_pending_pickup(&mut self) -> impl Future<Output = Result<(), SourceError>> + Send;

    /// Makes `item` take effect in the game (used for items arriving from
    /// peers).
    ///
    /// # Errors
    /// [`SourceError::TransientState`] when the game cannot accept items
    /// right now.
    fn apply_item_effect(
        &mut self,
        item: ItemId,
    ) -> impl Future<Output = Result<(), SourceError>> + Send;

    /// Hooks into the running game.
    fn attach(&mut self) -> impl Future<Output = Result<(), SourceError>> + Send;

    /// Whether the hook is currently live.
    fn is_attached(&self) -> impl Future<Output = bool> + Send;
}
