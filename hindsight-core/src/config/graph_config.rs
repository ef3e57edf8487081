//! Spreading-activation tunables.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    /// Decay factor `gamma` applied per hop.
    pub decay: f64,
    /// Max hops for the plain graph strategy.
    pub max_hops: u32,
    /// Max hops for the temporal strategy's restricted spreading pass.
    pub temporal_max_hops: u32,
    /// Minimum similarity for a unit to be selected as a seed.
    pub seed_min_similarity: f64,
    /// Priority-queue activation floor below which spreading stops.
    /// Kept configurable rather than hardcoded since no fixed value
    /// is load-bearing for correctness, only for result size.
    pub min_activation: f64,
    /// Wall-clock budget for a single spreading pass regardless of node
    /// budget.
    pub wall_clock_ms: u64,
    /// How far `occurred_*` may drift from the parsed interval while
    /// still counting as "time-adjacent" in the temporal strategy:
    /// `I' = I +/- temporal_broaden_days`.
    pub temporal_broaden_days: i64,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            decay: 0.8,
            max_hops: 5,
            temporal_max_hops: 3,
            seed_min_similarity: 0.3,
            min_activation: 0.05,
            wall_clock_ms: 1_000,
            temporal_broaden_days: 30,
        }
    }
}
