use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Fetch settings handed to the reader at construction.
///
/// There is no process-global settings lookup in this crate; whoever builds
/// readers decides where these values come from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Maximum request attempts per fetch, counting the first one
    #[serde(default = "default_max_fetch_attempts")]
    pub max_fetch_attempts: usize,
    /// Per-request timeout in seconds; there is no overall deadline across
    /// the retry sequence
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,
    /// Read buffer capacity in bytes used while streaming the response body
    #[serde(default = "default_buffer_size")]
    pub buffer_size: usize,
}

fn default_max_fetch_attempts() -> usize {
    2
}

fn default_fetch_timeout_secs() -> u64 {
    6
}

fn default_buffer_size() -> usize {
    1024 * 1024
}

impl Default for FetchConfig {
    fn default() -> Self {
        FetchConfig {
            max_fetch_attempts: default_max_fetch_attempts(),
            fetch_timeout_secs: default_fetch_timeout_secs(),
            buffer_size: default_buffer_size(),
        }
    }
}

impl FetchConfig {
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}
