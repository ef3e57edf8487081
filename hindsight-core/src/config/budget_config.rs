//! Recall budget-to-scale mapping and defaults for the
//! public recall interface.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecallBudget {
    Low,
    Mid,
    High,
}

impl Default for RecallBudget {
    fn default() -> Self {
        RecallBudget::Mid
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BudgetConfig {
    pub low_nodes: usize,
    pub mid_nodes: usize,
    pub high_nodes: usize,
    pub default_max_tokens: usize,
    pub default_max_entity_tokens: usize,
    /// RRF's `k` constant.
    pub rrf_k: u32,
}

impl BudgetConfig {
    /// Visited-node budget `B` for the graph strategy.
    pub fn visited_nodes(&self, budget: RecallBudget) -> usize {
        match budget {
            RecallBudget::Low => self.low_nodes,
            RecallBudget::Mid => self.mid_nodes,
            RecallBudget::High => self.high_nodes,
        }
    }
}

impl Default for BudgetConfig {
    fn default() -> Self {
        Self {
            low_nodes: 100,
            mid_nodes: 300,
            high_nodes: 600,
            default_max_tokens: 4_096,
            default_max_entity_tokens: 500,
            rrf_k: 60,
        }
    }
}
