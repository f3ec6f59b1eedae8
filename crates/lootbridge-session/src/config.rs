//! Session configuration.

use std::path::Path;
use std::time::Duration;

use lootbridge_engine::GameMode;
use lootbridge_inventory::ItemCaps;
use lootbridge_poll::PollConfig;
use lootbridge_protocol::WorldId;
use serde::{Deserialize, Serialize};

use crate::SessionError;

/// Everything needed to start one player session.
///
/// Missing JSON fields fall back to [`Default`], so a minimal config is
/// `{"mode": "Multiworld", "world_id": 2}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Coop or Multiworld.
    pub mode: GameMode,

    /// This player's world. Required (non-zero) in Multiworld.
    pub world_id: WorldId,

    /// Display name sent with Coop messages. Required in Coop.
    pub player_name: String,

    /// Milliseconds between polls of the pickup slot.
    pub poll_interval_ms: u64,

    /// Random delay (0–max ms) before the first poll.
    pub poll_jitter_ms: u64,

    /// Milliseconds to wait between attach attempts.
    pub attach_retry_ms: u64,

    /// Attach attempts before giving up. 0 retries forever.
    pub max_attach_attempts: u32,

    /// Per-item caps. Uncapped items are never maxed.
    pub item_caps: ItemCaps,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            mode: GameMode::Coop,
            world_id: WorldId(1),
            player_name: String::new(),
            poll_interval_ms: PollConfig::DEFAULT_INTERVAL_MS,
            poll_jitter_ms: 0,
            attach_retry_ms: 1_000,
            max_attach_attempts: 30,
            item_caps: ItemCaps::default(),
        }
    }
}

impl SessionConfig {
    /// Parses a config from JSON and validates it.
    ///
    /// # Errors
    /// [`SessionError::ConfigParse`] for malformed JSON,
    /// [`SessionError::Config`] if validation fails.
    pub fn from_json_str(json: &str) -> Result<Self, SessionError> {
        let config: Self = serde_json::from_str(json)?;
        config.validated()
    }

    /// Reads and validates a JSON config file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SessionError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        tracing::debug!(path = %path.display(), "loaded session config");
        Self::from_json_str(&json)
    }

    /// Checks that the identity fields the chosen mode needs are present.
    ///
    /// # Errors
    /// [`SessionError::Config`] naming the missing field.
    pub fn validated(self) -> Result<Self, SessionError> {
        match self.mode {
            GameMode::Coop if self.player_name.trim().is_empty() => Err(SessionError::Config(
                "player_name is required in Coop mode".into(),
            )),
            GameMode::Multiworld if self.world_id == WorldId::NONE => Err(SessionError::Config(
                "world_id 0 is reserved; Multiworld needs a real world".into(),
            )),
            _ => Ok(self),
        }
    }

    /// Poll timing for [`PollScheduler`](lootbridge_poll::PollScheduler).
    pub fn poll_config(&self) -> PollConfig {
        PollConfig {
            interval: Duration::from_millis(self.poll_interval_ms),
            initial_jitter_ms: self.poll_jitter_ms,
            ..PollConfig::default()
        }
    }

    pub fn attach_retry(&self) -> Duration {
        Duration::from_millis(self.attach_retry_ms)
    }
}
