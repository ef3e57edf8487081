//! Temporal parser configuration.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TemporalConfig {
    /// Timeout for a single parse.
    pub parse_timeout_ms: u64,
}

impl Default for TemporalConfig {
    fn default() -> Self {
        Self { parse_timeout_ms: 100 }
    }
}
