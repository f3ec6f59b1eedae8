//! Item ownership reconciliation for Lootbridge.
//!
//! Every poll, a session asks the game for its single pending pickup and
//! has to decide what that pickup means for this player:
//!
//! - **Take** — it belongs to another world; clear it here, forward it.
//! - **Give** — it is ours; credit it to the [`Inventory`](lootbridge_inventory::Inventory).
//! - **Ignore** — we already hold as many copies as we want.
//!
//! Whatever the decision, the pickup is reported as an
//! [`OutboundMessage`](lootbridge_protocol::OutboundMessage) so peers can
//! deduplicate on their side.
//!
//! # Key types
//!
//! - [`PickupSource`] — the game-side collaborator (read / clear / apply)
//! - [`ModePolicy`] — take/give rules, implemented by [`CoopPolicy`] and
//!   [`MultiworldPolicy`] and selected once through [`SessionPolicy`]
//! - [`MessageFactory`] — builds the outbound message for the active mode
//! - [`ReconciliationEngine`] — runs one reconcile cycle per call
//! - [`MemorySource`] — an in-memory [`PickupSource`] for tests and demos

mod engine;
mod error;
mod factory;
mod memory;
mod policy;
mod source;

pub use engine::{CycleOutcome, PassOutcome, Reconciled, ReconciliationEngine};
pub use error::SourceError;
pub use factory::MessageFactory;
pub use memory::MemorySource;
pub use policy::{CoopPolicy, Decision, GameMode, ModePolicy, MultiworldPolicy, SessionPolicy};
pub use source::PickupSource;
