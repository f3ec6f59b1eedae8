//! # Lootbridge
//!
//! Item ownership reconciliation for games whose players share items.
//!
//! Each player runs one session. On every poll the session reads the item
//! the player just picked up, decides whether it stays (Coop, or Multiworld
//! when it belongs to this world) or is taken away (Multiworld, another
//! world's item), keeps the player's inventory in step, and hands a message
//! to the network so peers learn about it.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use lootbridge::prelude::*;
//!
//! # async fn start() -> Result<(), LootbridgeError> {
//! lootbridge::init_tracing("info");
//!
//! let config = SessionConfig::from_json_str(r#"{"mode": "Multiworld", "world_id": 2}"#)?;
//! let mut session = GameConnection::new(MemorySource::attached(), config)?;
//!
//! let (handle, signal) = shutdown_channel();
//! // Keep `handle` wherever shutdown is decided, then:
//! session.run(signal).await?;
//! # drop(handle);
//! # Ok(())
//! # }
//! ```
//!
//! ## Crates
//!
//! | Crate | Role |
//! |-------|------|
//! | `lootbridge-protocol` | ids, pickups, outbound messages, codec |
//! | `lootbridge-inventory` | item counts and caps |
//! | `lootbridge-engine` | mode policy and the reconcile cycle |
//! | `lootbridge-poll` | fixed-interval poll scheduler |
//! | `lootbridge-session` | attach, poll loop, queues, config |

mod error;

pub use error::LootbridgeError;

pub use lootbridge_engine as engine;
pub use lootbridge_inventory as inventory;
pub use lootbridge_poll as poll;
pub use lootbridge_protocol as protocol;
pub use lootbridge_session as session;

use tracing_subscriber::EnvFilter;

/// Installs a `tracing` subscriber that prints to stderr.
///
/// `RUST_LOG` wins when set; otherwise `default_directive` (e.g. `"info"` or
/// `"lootbridge_engine=debug"`) is used. Calling this twice is harmless;
/// the second call leaves the first subscriber in place.
pub fn init_tracing(default_directive: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    if tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .is_err()
    {
        tracing::debug!("tracing subscriber already installed");
    }
}

/// Everything a typical session host needs.
pub mod prelude {
    pub use crate::LootbridgeError;

    pub use lootbridge_engine::{
        CycleOutcome, Decision, GameMode, MemorySource, PassOutcome, PickupSource,
        ReconciliationEngine, SessionPolicy, SourceError,
    };
    pub use lootbridge_inventory::{Inventory, InventoryError, InventorySnapshot, ItemCaps};
    pub use lootbridge_poll::{MissedPollPolicy, PollConfig, PollScheduler};
    pub use lootbridge_protocol::{
        Codec, ItemId, JsonCodec, OutboundMessage, PendingPickup, ProtocolError, WorldId,
    };
    pub use lootbridge_session::{
        shutdown_channel, GameConnection, InboundReceiver, OutboundSender, SessionConfig,
        SessionError, ShutdownHandle, ShutdownSignal,
    };
}
