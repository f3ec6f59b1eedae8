//! Error types for the protocol layer.
//!
//! Each Lootbridge crate defines its own error enum, so a `ProtocolError`
//! always points at encoding or decoding, never at the game or the network.

/// Errors that can occur while encoding or decoding messages.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Turning a message into bytes failed.
    #[cfg(feature = "json")]
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// The bytes were malformed or did not match any message shape.
    #[cfg(feature = "json")]
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),

    /// The message decoded but is not a valid item message, e.g. it names
    /// the reserved item id 0.
    #[error("invalid message: {0}")]
    InvalidMessage(String),
}
