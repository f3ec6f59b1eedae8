//! Error types for the pickup source boundary.

/// Errors a [`PickupSource`](crate::PickupSource) can report.
///
/// None of these end a session on their own. The engine turns every one of
/// them into a deferred cycle; only the connection layer decides when a
/// source that keeps failing to attach is fatal.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SourceError {
    /// The game is not in a state that accepts items right now, e.g. it is
    /// sitting on the title screen or a menu. Retrying on the next poll is
    /// expected to succeed eventually.
    #[error("game not ready: {0}")]
    TransientState(String),

    /// The hook into the game is gone (emulator closed, game swapped).
    #[error("pickup source detached: {0}")]
    Detached(String),
}

impl SourceError {
    /// Returns `true` for [`SourceError::TransientState`].
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::TransientState(_))
    }
}
