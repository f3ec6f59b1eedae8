//! Codec trait and implementations for turning messages into bytes.
//!
//! The engine never serializes anything itself. Whatever hands
//! [`OutboundMessage`]s to the network picks a [`Codec`] and uses it on both
//! ends. [`JsonCodec`] is the only implementation today and matches the
//! JSON shape peers already speak.

use serde::{de::DeserializeOwned, Serialize};

use crate::{OutboundMessage, ProtocolError};

/// Encodes values to bytes and decodes them back.
///
/// `Send + Sync + 'static` so a codec can live inside long-running session
/// tasks.
pub trait Codec: Send + Sync + 'static {
    /// Serializes a value into bytes.
    ///
    /// # Errors
    /// Returns `ProtocolError::Encode` if the value cannot be represented.
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError>;

    /// Deserializes bytes back into a value.
    ///
    /// # Errors
    /// Returns `ProtocolError::Decode` if the bytes are malformed or don't
    /// match the expected type.
    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError>;

    /// Decodes an [`OutboundMessage`] received from a peer and rejects the
    /// reserved item id.
    ///
    /// # Errors
    /// Returns `ProtocolError::InvalidMessage` when the message carries
    /// item id 0, in addition to any decode failure.
    fn decode_message(&self, data: &[u8]) -> Result<OutboundMessage, ProtocolError> {
        let msg: OutboundMessage = self.decode(data)?;
        if msg.item_id().is_reserved() {
            return Err(ProtocolError::InvalidMessage(
                "item id 0 is reserved for the empty pickup slot".into(),
            ));
        }
        Ok(msg)
    }
}

// ---------------------------------------------------------------------------
// JsonCodec
// ---------------------------------------------------------------------------

/// A [`Codec`] backed by `serde_json`.
///
/// ```rust
/// use lootbridge_protocol::{Codec, ItemId, JsonCodec, OutboundMessage};
///
/// let codec = JsonCodec;
/// let msg = OutboundMessage::coop("Alice", ItemId(7));
///
/// let bytes = codec.encode(&msg).unwrap();
/// let decoded = codec.decode_message(&bytes).unwrap();
/// assert_eq!(msg, decoded);
/// ```
#[cfg(feature = "json")]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

#[cfg(feature = "json")]
impl Codec for JsonCodec {
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError> {
        serde_json::to_vec(value).map_err(ProtocolError::Encode)
    }

    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError> {
        serde_json::from_slice(data).map_err(ProtocolError::Decode)
    }
}
