//! Configuration for the parameter sync service.

use serde::{Deserialize, Serialize};

/// Channel sizing for [`crate::service::SyncService`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SyncConfig {
    /// Pending attach/detach/snapshot commands before senders wait.
    pub command_buffer: usize,

    /// Group events retained for slow subscribers before they lag.
    pub event_buffer: usize,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            command_buffer: 64,
            event_buffer: 256,
        }
    }
}

impl SyncConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("PARAMETER_SYNC_COMMAND_BUFFER") {
            if let Ok(size) = val.parse() {
                config.command_buffer = size;
            }
        }

        if let Ok(val) = std::env::var("PARAMETER_SYNC_EVENT_BUFFER") {
            if let Ok(size) = val.parse() {
                config.event_buffer = size;
            }
        }

        config.validated()
    }

    /// Clamp buffer sizes to values the channels accept.
    pub fn validated(mut self) -> Self {
        self.command_buffer = self.command_buffer.max(1);
        self.event_buffer = self.event_buffer.max(1);
        self
    }
}
