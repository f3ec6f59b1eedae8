//! Wire-level types for Lootbridge.
//!
//! This crate defines what a session talks about:
//!
//! - **Identity** ([`ItemId`], [`WorldId`]) — opaque keys owned by the game.
//! - **Pickups** ([`PendingPickup`]) — the single slot read from the game on
//!   every poll.
//! - **Messages** ([`OutboundMessage`]) — what a session hands to the
//!   network after reconciling a pickup.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]) — how messages become bytes.
//!
//! # Architecture
//!
//! ```text
//! Pickup source → Engine (decision) → Protocol (OutboundMessage) → Transport
//! ```
//!
//! The protocol layer knows nothing about inventories or game modes. It only
//! knows the shapes that travel between player sessions.

mod codec;
mod error;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use types::{
    CoopMessage, ItemId, MultiworldMessage, OutboundMessage, PendingPickup, WorldId,
};
