//! Session lifecycle for Lootbridge.
//!
//! This crate wraps a [`ReconciliationEngine`](lootbridge_engine::ReconciliationEngine)
//! in everything a running player session needs:
//!
//! 1. **Configuration** — mode, identity, poll timing, item caps
//!    ([`SessionConfig`])
//! 2. **Attaching** — hooking into the game with bounded retries
//! 3. **Polling** — one reconcile cycle per poll until shut down
//!    ([`GameConnection::run`], [`ShutdownHandle`])
//! 4. **Queues** — messages waiting for the network and items from peers
//!    waiting to be applied
//!
//! # How it fits in the stack
//!
//! ```text
//! Network (outside)   ← drains items_to_send, pushes items_to_process
//!     ↕
//! Session (this crate)
//!     ↕
//! Engine (below)      ← reconcile(), pass_item()
//! ```

mod config;
mod connection;
mod error;
mod shutdown;

pub use config::SessionConfig;
pub use connection::{GameConnection, InboundReceiver, OutboundSender};
pub use error::SessionError;
pub use shutdown::{shutdown_channel, ShutdownHandle, ShutdownSignal};
