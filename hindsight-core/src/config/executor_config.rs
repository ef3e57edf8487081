//! Bounded worker pool configuration.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutorConfig {
    /// Observation-synthesis workers per process.
    pub worker_count: usize,
    /// Bound on the task channel before `retain` backpressures.
    pub queue_capacity: usize,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            worker_count: 4,
            queue_capacity: 1_024,
        }
    }
}
