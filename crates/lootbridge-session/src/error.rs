//! Error types for the session layer.

use lootbridge_engine::SourceError;
use lootbridge_inventory::InventoryError;

/// Errors that end a session.
///
/// Per-poll problems never show up here; the engine absorbs them. These
/// are the failures that happen before polling can start, or that make
/// continuing pointless.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The pickup source could not be attached within the allowed number
    /// of attempts.
    #[error("pickup source failed to attach after {attempts} attempts: {last_error}")]
    AttachFailed {
        attempts: u32,
        last_error: SourceError,
    },

    /// The configuration is unusable.
    #[error("invalid session config: {0}")]
    Config(String),

    /// The configuration file could not be read.
    #[error("failed to read session config: {0}")]
    ConfigIo(#[from] std::io::Error),

    /// The configuration file is not valid JSON for a [`SessionConfig`](crate::SessionConfig).
    #[error("failed to parse session config: {0}")]
    ConfigParse(#[from] serde_json::Error),

    /// A restored inventory snapshot conflicts with the configured caps.
    #[error("inventory restore failed: {0}")]
    Inventory(#[from] InventoryError),
}
